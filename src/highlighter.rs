// ABOUTME: Syntax highlighter for the REPL, coloring keywords, literals, and comments

use rustyline::completion::Completer;
use rustyline::highlight::{CmdKind, Highlighter};
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::Helper;
use std::borrow::Cow;
use std::collections::HashSet;

const COLOR_RESET: &str = "\x1b[0m";
const COLOR_KEYWORD: &str = "\x1b[1;35m"; // Bold magenta
const COLOR_NATIVE: &str = "\x1b[36m"; // Cyan
const COLOR_NUMBER: &str = "\x1b[33m"; // Yellow
const COLOR_STRING: &str = "\x1b[32m"; // Green
const COLOR_BOOLEAN_NIL: &str = "\x1b[33m"; // Yellow
const COLOR_COMMENT: &str = "\x1b[90m"; // Bright black (gray)
const COLOR_PUNCTUATION: &str = "\x1b[1;34m"; // Bold blue

/// REPL helper providing syntax-aware color highlighting for source lines.
pub struct LoxHelper;

impl LoxHelper {
    pub fn new() -> Self {
        LoxHelper
    }
}

impl Default for LoxHelper {
    fn default() -> Self {
        Self::new()
    }
}

impl Helper for LoxHelper {}

impl Completer for LoxHelper {
    type Candidate = String;
}

impl Hinter for LoxHelper {
    type Hint = String;
}

impl Validator for LoxHelper {}

impl Highlighter for LoxHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let keywords = get_keywords();
        let natives = get_natives();
        let highlighted = highlight_line(line, &keywords, &natives);
        if highlighted == line {
            Cow::Borrowed(line)
        } else {
            Cow::Owned(highlighted)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        true
    }
}

fn highlight_line(line: &str, keywords: &HashSet<&'static str>, natives: &HashSet<&'static str>) -> String {
    let mut result = String::new();
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '/' if i + 1 < chars.len() && chars[i + 1] == '/' => {
                result.push_str(COLOR_COMMENT);
                while i < chars.len() && chars[i] != '\n' {
                    result.push(chars[i]);
                    i += 1;
                }
                result.push_str(COLOR_RESET);
            }
            '"' => {
                result.push_str(COLOR_STRING);
                result.push('"');
                i += 1;
                while i < chars.len() && chars[i] != '"' {
                    result.push(chars[i]);
                    i += 1;
                }
                if i < chars.len() {
                    result.push('"');
                    i += 1;
                }
                result.push_str(COLOR_RESET);
            }
            '0'..='9' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let number: String = chars[start..i].iter().collect();
                result.push_str(COLOR_NUMBER);
                result.push_str(&number);
                result.push_str(COLOR_RESET);
            }
            '(' | ')' | '{' | '}' | ',' | ';' => {
                result.push_str(COLOR_PUNCTUATION);
                result.push(chars[i]);
                result.push_str(COLOR_RESET);
                i += 1;
            }
            c if is_identifier_start(c) => {
                let start = i;
                while i < chars.len() && is_identifier_continue(chars[i]) {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                if keywords.contains(word.as_str()) {
                    result.push_str(COLOR_KEYWORD);
                    result.push_str(&word);
                    result.push_str(COLOR_RESET);
                } else if word == "true" || word == "false" || word == "nil" {
                    result.push_str(COLOR_BOOLEAN_NIL);
                    result.push_str(&word);
                    result.push_str(COLOR_RESET);
                } else if natives.contains(word.as_str()) {
                    result.push_str(COLOR_NATIVE);
                    result.push_str(&word);
                    result.push_str(COLOR_RESET);
                } else {
                    result.push_str(&word);
                }
            }
            c => {
                result.push(c);
                i += 1;
            }
        }
    }

    result
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn get_keywords() -> HashSet<&'static str> {
    [
        "and", "or", "if", "else", "while", "for", "fun", "return", "var", "true", "false",
        "nil", "print", "break",
    ]
    .iter()
    .copied()
    .collect()
}

fn get_natives() -> HashSet<&'static str> {
    ["clock"].iter().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_literal_is_highlighted() {
        let highlighted = highlight_line("42", &get_keywords(), &get_natives());
        assert!(highlighted.contains(COLOR_NUMBER));
    }

    #[test]
    fn string_literal_is_highlighted() {
        let highlighted = highlight_line("\"hello\"", &get_keywords(), &get_natives());
        assert!(highlighted.contains(COLOR_STRING));
    }

    #[test]
    fn line_comment_is_highlighted() {
        let highlighted = highlight_line("// a comment", &get_keywords(), &get_natives());
        assert!(highlighted.contains(COLOR_COMMENT));
    }

    #[test]
    fn keyword_is_highlighted() {
        let highlighted = highlight_line("while (true) {}", &get_keywords(), &get_natives());
        assert!(highlighted.contains(COLOR_KEYWORD));
        assert!(highlighted.contains(COLOR_PUNCTUATION));
    }

    #[test]
    fn plain_identifier_is_not_colored() {
        let highlighted = highlight_line("count", &get_keywords(), &get_natives());
        assert_eq!(highlighted, "count");
    }

    #[test]
    fn native_function_name_is_highlighted() {
        let highlighted = highlight_line("clock", &get_keywords(), &get_natives());
        assert!(highlighted.contains(COLOR_NATIVE));
    }
}
