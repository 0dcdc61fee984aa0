//! Ordered record sequence and index resolution.

mod index;
mod list;

pub use index::{resolve, resolve_start};
pub use list::RecordList;
