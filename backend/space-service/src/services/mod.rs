pub mod abuse_guard;
pub mod ratings;
pub mod reporting;

pub use ratings::RatingService;
pub use reporting::ReportingService;
