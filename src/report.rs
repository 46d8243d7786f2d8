//! Operator-facing status lines.
//!
//! Diagnostics go through `tracing`; these macros are for what the person
//! running the installer is meant to read.

#[macro_export]
macro_rules! print_info {
    ($($arg:tt)*) => {
        println!("\x1b[1;34minfo:\x1b[0m {}", format!($($arg)*))
    }
}

#[macro_export]
macro_rules! print_warn {
    ($($arg:tt)*) => {
        println!("\x1b[1;33mwarn:\x1b[0m {}", format!($($arg)*))
    }
}

#[macro_export]
macro_rules! print_success {
    ($($arg:tt)*) => {
        println!("\x1b[1;32mok:\x1b[0m {}", format!($($arg)*))
    }
}

#[macro_export]
macro_rules! print_error {
    ($($arg:tt)*) => {
        eprintln!("\x1b[1;31merror:\x1b[0m {}", format!($($arg)*))
    }
}

/// Highlight a command the way the tour shows it to the user.
pub fn command(text: &str) -> String {
    format!("\x1b[36m{text}\x1b[0m")
}

/// Highlight a message the user is expected to type into the chat.
pub fn quote(text: &str) -> String {
    format!("\x1b[35m{text}\x1b[0m")
}
