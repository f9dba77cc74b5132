mod directory_queries;
mod leaderboard_queries;
mod streak_queries;

#[cfg(test)]
mod tests;

pub use directory_queries::DirectoryQueries;
pub use leaderboard_queries::LeaderboardQueries;
pub use streak_queries::StreakQueries;
