pub mod availability;
pub mod conflict;
pub mod continuity;
pub mod rescheduling;

pub use availability::AvailabilityIndex;
pub use conflict::ConflictDetectionService;
pub use continuity::ContinuityScoringService;
pub use rescheduling::ReschedulingService;
