//! # CLI Module
//!
//! Command-line entry points of the `moodify` binary.
//!
//! - [`serve`] - Runs the HTTP backend
//! - [`mood`] - Prints the anonymous playlist for a mood
//! - [`genres`] - Prints how raw genres normalize onto Spotify's seed genres
//!
//! Each command reports through the crate's console macros and terminates
//! the process on fatal errors.

mod genres;
mod mood;
mod serve;

pub use genres::genres;
pub use mood::mood;
pub use serve::serve;
