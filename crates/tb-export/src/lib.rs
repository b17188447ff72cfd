//! # tb-export
//!
//! Exports a project's tickets to a downloadable spreadsheet file: a closed
//! column set, CSV rendering, and a storage seam with collision-free
//! filenames.

pub mod columns;
pub mod storage;
pub mod writer;

pub use columns::{ExportColumn, ExportTicket};
pub use storage::{LocalStorage, Storage, StorageError, StorageResult};
pub use writer::{ExportFile, ExportService};
