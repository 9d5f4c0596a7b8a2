//! Memory-aware scheduling for expensive operations.

mod profile;
mod scheduler;
mod single_flight;

pub use profile::PlatformProfile;
pub use scheduler::{OperationQueue, OperationSpec, Priority};
pub use single_flight::SingleFlight;
