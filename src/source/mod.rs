pub mod client;
pub mod error;
pub mod json_file;
pub mod memory;

pub use client::{FetchEntriesRequest, JournalSource};
pub use error::InsightError;
pub use json_file::{JournalExport, JsonFileSource};
pub use memory::MemorySource;
