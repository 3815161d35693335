pub mod date_filter;
pub mod entry;
pub mod error;
pub mod timetable;

pub use date_filter::*;
pub use entry::*;
pub use error::*;
pub use timetable::*;
