pub mod catalog;
pub mod error;
pub mod filter;
pub mod loader;
pub mod output;
pub mod raw;
pub mod record;
pub mod shell;
pub mod stats;

pub use error::{BikeshareError, Result};
