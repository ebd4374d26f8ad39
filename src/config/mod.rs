//! Fee schedule configuration.
//!
//! The service-fee rate for shifts and the job-posting fee schedule are
//! external configuration the cost engine reads, not constants it owns.

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{FeeSchedule, JobPostingFees, ShiftFees};
