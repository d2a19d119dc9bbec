pub mod calendar;
pub mod contributors;
pub mod landing_zone;
pub mod scope;
pub mod staleness;
pub mod velocity;
