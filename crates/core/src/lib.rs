#![forbid(unsafe_code)]

pub mod records;
pub mod sync;
pub mod time;
pub mod validation;

pub use records::{DailySteps, Stats, Workout};
pub use validation::ValidationError;
