//! Moodify Backend Library
//!
//! This library powers a backend-for-frontend that hands out music
//! recommendations, either for an explicit mood label or derived from a
//! logged-in user's Spotify listening history. Catalog and identity data are
//! delegated to the Spotify Web API.
//!
//! # Modules
//!
//! - `api` - HTTP handlers and the authenticated-request extractor
//! - `cli` - Command-line entry points (`serve`, `mood`, `genres`)
//! - `config` - Configuration management and environment variables
//! - `error` - Typed errors and their HTTP mapping
//! - `management` - Token sessions, genre matching, taste profiles and the
//!   recommendation engine
//! - `server` - Shared application state and router construction
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for the binary and CLI glue.
///
/// Library operations return their own typed errors (see [`error`]); this
/// alias is used where those errors only need to be reported to a terminal.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Listening on {}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only meant for the binary's fatal paths, such as an invalid configuration
/// or a listener that cannot bind. Library code returns errors instead.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
