//! Data model for scan results.
//!
//! An [`Entry`] is one reported file or folder. Sorting lives next to the
//! type so the presenter and the tests share one comparator.
pub mod entry;
pub mod size;

pub use entry::{display_name, sort_entries, Entry, EntryKind, SortKey};
pub use size::{format_count, format_size};
