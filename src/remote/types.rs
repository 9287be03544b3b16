//! Wire-level types shared by every remote backend

use serde::{Deserialize, Serialize};

/// A file entry returned by a folder listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveFile {
    pub id: String,
    pub name: String,
}

/// Sheet properties returned by a spreadsheet metadata query.
///
/// Titles are only unique per spreadsheet and sheet ids change on
/// duplication, so callers rebuild their title → id maps after every
/// mutation that may have created or renamed sheets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetInfo {
    pub sheet_id: i64,
    pub title: String,
}

/// Opaque credential material for backend initialization.
///
/// The pipeline never inspects or persists the bytes; they exist only to be
/// handed to whatever implements the remote traits.
#[derive(Clone)]
pub struct Credentials(Vec<u8>);

impl Credentials {
    pub fn new(blob: impl Into<Vec<u8>>) -> Self {
        Self(blob.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never echo credential bytes into logs
        write!(f, "Credentials({} bytes)", self.0.len())
    }
}

/// A user-entered cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    Text(String),
    Number(f64),
    Formula(String),
}

impl CellValue {
    /// Classify a string the way the remote service classifies user input:
    /// a leading '=' makes it a formula, anything else is literal text.
    pub fn entered(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.starts_with('=') {
            CellValue::Formula(value)
        } else {
            CellValue::Text(value)
        }
    }

    /// The display string a range read returns for this value.
    pub fn display(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format!("{n}"),
            CellValue::Formula(f) => f.clone(),
        }
    }
}

/// One mutation inside a batch update. All coordinates are 0-based and
/// end-exclusive, matching the remote service's grid ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    /// Copy an existing sheet under a new title.
    DuplicateSheet {
        source_sheet_id: i64,
        new_name: String,
    },
    /// Remove a sheet from the spreadsheet.
    DeleteSheet { sheet_id: i64 },
    /// Insert blank rows at `start_row`, shifting existing content down.
    InsertRows {
        sheet_id: i64,
        start_row: i64,
        end_row: i64,
    },
    /// Paste a source row block (values and formatting) over a destination
    /// block; a smaller source repeats to fill the destination.
    CopyPaste {
        sheet_id: i64,
        src_start_row: i64,
        src_end_row: i64,
        dst_start_row: i64,
        dst_end_row: i64,
        start_col: i64,
        end_col: i64,
    },
    /// Write a single cell.
    UpdateCell {
        sheet_id: i64,
        row: i64,
        col: i64,
        value: CellValue,
    },
}
