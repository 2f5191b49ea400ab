//! Download Log: the append-only record of what this crate has harvested.

pub mod entry;
pub mod log;

pub use entry::LogEntry;
pub use log::DownloadLog;
