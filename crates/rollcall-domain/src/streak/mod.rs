mod calculator;
mod repository;
mod state;


pub use calculator::{DayGap, LastCheckIn, StreakCalculator, StreakPlan};
pub use repository::StreakStateRepository;
pub use state::StreakState;
