pub mod analyzer;
pub mod profiles;

pub use analyzer::DisruptionAnalysisService;
pub use profiles::DisruptionProfileService;
