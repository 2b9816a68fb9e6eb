pub mod classification;
pub mod constructors;
pub mod conversions;
pub mod helpers;
pub mod types;

// Re-export main types and functions
pub use constructors::*;
pub use helpers::{QueueFull, SchedulerClosed, UpdateRetriesExhausted};
pub use types::{Error, Inner, Kind, Result};

// Type alias used by the facade crate
pub type CacheError = Error;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;
