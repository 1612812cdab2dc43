pub mod log;
pub mod stats;

pub use log::ResultsLog;
pub use stats::{Bin, Describe, Summary};
