//! # Built-in subscribers
//!
//! - [`LogWriter`]: logs events in a human-readable form (demo/debug).

mod log;

pub use log::LogWriter;
