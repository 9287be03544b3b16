//! Remote document-storage and spreadsheet capabilities
//!
//! The pipeline consumes two abstract capabilities: folder/file operations
//! (`DriveOps`) and spreadsheet reads/mutations (`SheetOps`). Production
//! backends implement these against the real remote service with the
//! credential blob handed to their constructor; [`memory::MemoryRemote`]
//! implements both in-process for tests and simulation runs.

pub mod memory;
pub mod types;

pub use memory::MemoryRemote;
pub use types::{CellValue, Credentials, DriveFile, Mutation, SheetInfo};

use async_trait::async_trait;

use crate::error::GenResult;

/// Folder and file operations on the remote document store.
#[async_trait]
pub trait DriveOps: Send + Sync {
    /// Create a folder under `parent_id` and return its id. Create-only;
    /// retrying is the caller's decision, never this layer's.
    async fn create_folder(&self, parent_id: &str, name: &str) -> GenResult<String>;

    /// Deep-copy a document into `dest_folder_id` under a new name and
    /// return the copy's id.
    async fn copy_file(
        &self,
        source_id: &str,
        dest_folder_id: &str,
        name: &str,
    ) -> GenResult<String>;

    /// List the spreadsheet documents directly inside a folder.
    async fn list_spreadsheets(&self, folder_id: &str) -> GenResult<Vec<DriveFile>>;
}

/// Read and mutation operations on a single spreadsheet document.
#[async_trait]
pub trait SheetOps: Send + Sync {
    /// Sheet ids and titles of a spreadsheet, in sheet order.
    async fn sheet_metadata(&self, spreadsheet_id: &str) -> GenResult<Vec<SheetInfo>>;

    /// Read a bounded A1 range (e.g. `"A1:Z200"`) from a named sheet.
    /// Trailing empty rows and trailing empty cells per row are omitted,
    /// so an entirely empty range reads as an empty vector.
    async fn read_range(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
        a1_range: &str,
    ) -> GenResult<Vec<Vec<String>>>;

    /// Apply a batch of mutations atomically-in-order. This is the sole
    /// write path to a spreadsheet.
    async fn batch_update(&self, spreadsheet_id: &str, requests: Vec<Mutation>) -> GenResult<()>;
}
