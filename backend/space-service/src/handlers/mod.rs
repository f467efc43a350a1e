pub mod ratings;
pub mod reports;
