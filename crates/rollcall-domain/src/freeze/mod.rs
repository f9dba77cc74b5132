mod repository;
mod token;

pub use repository::StreakFreezeRepository;
pub use token::{FreezeStatus, FreezeToken};
