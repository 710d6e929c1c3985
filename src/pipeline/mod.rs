//! Pipeline module - load, clean, and summarise the dataset

pub mod cleaner;
pub mod columns;
pub mod correlation;
pub mod describe;
pub mod error;
pub mod grouping;
pub mod loader;

pub use cleaner::*;
pub use columns::*;
pub use correlation::*;
pub use describe::*;
pub use error::*;
pub use grouping::*;
pub use loader::*;
