pub mod bootstrap;
pub mod cli;
pub mod error;
pub mod state;

pub use error::CommandError;
pub use state::AppState;
