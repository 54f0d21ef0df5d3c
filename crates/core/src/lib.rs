//! Core types for bookshelf
//!
//! Domain types, input validation and configuration shared by every other crate.

mod book;
mod config;
mod constants;
mod env_config;
mod error;

pub use book::*;
pub use config::*;
pub use constants::*;
pub use env_config::*;
pub use error::*;
