// ABOUTME: Version info and REPL banner/history constants

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const WELCOME_MESSAGE: &str = "rlox REPL";
pub const WELCOME_SUBTITLE: &str = "A tree-walking interpreter for a small scripting language";
pub const HISTORY_FILE: &str = ".rlox_history";
