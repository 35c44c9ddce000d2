pub mod config;
pub mod error;
pub mod index;
pub mod server;
pub mod taxonomy;
pub mod tokenize;

pub use error::{Error, Result};
