pub mod availability;
pub mod disruption;
pub mod error;
pub mod session;
pub mod trend;

pub use availability::AvailabilitySlot;
pub use disruption::{DisruptionEvent, DisruptionType};
pub use error::SchedulingError;
pub use session::{Session, SessionStatus};
pub use trend::TrendDirection;
