mod database;
mod error_mapper;
pub(crate) mod ledger;
mod repository_base;
pub mod repositories;
pub(crate) mod rows;
mod transaction;

pub use database::Database;
pub use error_mapper::RepositoryErrorMapper;
pub use repository_base::SqliteRepositoryBase;
pub use transaction::{SqliteCheckInTransaction, SqliteCheckInUnitOfWork};
