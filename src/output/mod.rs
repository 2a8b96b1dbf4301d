//! Output formatting for CLI display
//!
//! - `writer`: the `OutputWriter` abstraction and its stdout/buffer backends
//! - `table`: text rendering of the visible page and status line

pub mod table;
pub mod writer;

pub use table::{format_page, format_status, truncate};
pub use writer::{BufferedWriter, MessageLevel, OutputWriter, StdoutWriter};
