//! Utility modules for ccscan

pub mod timing;

pub use timing::{format_duration, RunTiming, Timer};
