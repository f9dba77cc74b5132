mod aggregate;
mod repository;


pub use aggregate::{CheckIn, MAX_MOOD_CHARS, MAX_NOTE_CHARS};
pub(crate) use aggregate::normalize_text;
pub use repository::CheckInRepository;
