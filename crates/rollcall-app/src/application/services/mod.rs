pub(crate) mod freeze_service;
mod pair_lock;

pub use freeze_service::FreezeService;
pub use pair_lock::PairLocks;
