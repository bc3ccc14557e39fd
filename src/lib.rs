//! The core of a personal expense tracker: validating user-entered transactions, searching them
//! with user-supplied regular expressions, and keeping them in a persistent store that can be
//! sorted, filtered, exported and imported.

pub mod args;
pub mod clock;
pub mod commands;
mod config;
mod error;
pub mod export;
mod fs;
pub mod import;
pub mod model;
pub mod search;
pub mod stats;
pub mod storage;
pub mod store;
mod utils;
pub mod validate;
pub mod view;

#[cfg(test)]
mod test;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use error::Error;
pub use error::Result;
pub use store::{Persisted, Store};
