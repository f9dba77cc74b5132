mod days;
mod paging;
mod result_ext;

pub use days::next_day;
pub use paging::Page;
pub use result_ext::ResultExt;
