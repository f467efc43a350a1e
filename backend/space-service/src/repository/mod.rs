pub mod ratings;
pub mod reports;
pub mod spaces;
pub mod users;

pub use ratings::RatingRepository;
pub use spaces::SpaceRepository;
