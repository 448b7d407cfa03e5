//! Platform-specific functionality: hidden-file detection and the
//! "reveal in file manager" shell command.

pub mod hidden;
pub mod reveal;

pub use hidden::is_hidden;
pub use reveal::reveal_in_file_manager;
