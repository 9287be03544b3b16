//! In-memory backend implementing both remote capabilities
//!
//! Backs the integration tests and the CLI `simulate` command with a fake
//! document store that honours the same grid semantics as the remote
//! service: row insertion shifts content down, copy-paste repeats its
//! source block, duplication mints fresh sheet ids. Every applied mutation
//! is recorded in a log the tests can assert against.

use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use super::types::{CellValue, DriveFile, Mutation, SheetInfo};
use super::{DriveOps, SheetOps};
use crate::column::letter_to_index;
use crate::error::{GenResult, GenerateError};

//==============================================================================
// Fake Document Store
//==============================================================================

/// One sheet of an in-memory document: a dense 0-based grid.
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    pub sheet_id: i64,
    pub title: String,
    grid: Vec<Vec<Option<CellValue>>>,
}

impl Sheet {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            sheet_id: 0,
            title: title.into(),
            grid: Vec::new(),
        }
    }

    /// Write a cell, growing the grid as needed. 0-based coordinates.
    pub fn set(&mut self, row: usize, col: usize, value: CellValue) {
        if self.grid.len() <= row {
            self.grid.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.grid[row];
        if cells.len() <= col {
            cells.resize(col + 1, None);
        }
        cells[col] = Some(value);
    }

    pub fn set_text(&mut self, row: usize, col: usize, text: impl Into<String>) {
        self.set(row, col, CellValue::Text(text.into()));
    }

    /// Read a cell. 0-based coordinates; unset cells are `None`.
    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.grid
            .get(row)
            .and_then(|cells| cells.get(col))
            .and_then(|cell| cell.as_ref())
    }

    /// Number of rows the grid currently holds.
    pub fn row_count(&self) -> usize {
        self.grid.len()
    }

    fn insert_blank_rows(&mut self, start: usize, count: usize) {
        if self.grid.len() < start {
            self.grid.resize_with(start, Vec::new);
        }
        for _ in 0..count {
            self.grid.insert(start, Vec::new());
        }
    }
}

/// A spreadsheet document in the fake store.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub name: String,
    pub folder_id: Option<String>,
    pub sheets: Vec<Sheet>,
}

impl Document {
    pub fn sheet_by_title(&self, title: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.title == title)
    }

    fn sheet_index_by_id(&self, sheet_id: i64) -> Option<usize> {
        self.sheets.iter().position(|sheet| sheet.sheet_id == sheet_id)
    }
}

#[derive(Debug)]
struct Folder {
    id: String,
    name: String,
    #[allow(dead_code)]
    parent_id: String,
}

#[derive(Default)]
struct State {
    folders: Vec<Folder>,
    documents: Vec<Document>,
    next_sheet_id: i64,
    mutation_log: Vec<(String, Mutation)>,
    fail_writes: bool,
}

impl State {
    fn document(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|doc| doc.id == id)
    }

    fn document_mut(&mut self, id: &str) -> Option<&mut Document> {
        self.documents.iter_mut().find(|doc| doc.id == id)
    }
}

//==============================================================================
// MemoryRemote
//==============================================================================

/// In-process implementation of [`DriveOps`] and [`SheetOps`].
#[derive(Default)]
pub struct MemoryRemote {
    state: Mutex<State>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document outside any folder, assigning fresh sheet ids.
    /// Returns the new document id.
    pub fn seed_document(&self, name: &str, sheets: Vec<Sheet>) -> String {
        let mut state = self.state.lock().unwrap();
        let id = Uuid::new_v4().simple().to_string();
        let mut doc = Document {
            id: id.clone(),
            name: name.to_string(),
            folder_id: None,
            sheets,
        };
        for sheet in &mut doc.sheets {
            state.next_sheet_id += 1;
            sheet.sheet_id = state.next_sheet_id;
        }
        state.documents.push(doc);
        id
    }

    /// Snapshot a document for assertions.
    pub fn document(&self, id: &str) -> Option<Document> {
        self.state.lock().unwrap().document(id).cloned()
    }

    pub fn folder_name(&self, id: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .folders
            .iter()
            .find(|folder| folder.id == id)
            .map(|folder| folder.name.clone())
    }

    /// Every mutation applied so far, with the document it targeted.
    pub fn mutation_log(&self) -> Vec<(String, Mutation)> {
        self.state.lock().unwrap().mutation_log.clone()
    }

    /// Make every subsequent batch update fail, for error-path tests.
    pub fn set_fail_writes(&self, fail: bool) {
        self.state.lock().unwrap().fail_writes = fail;
    }

    fn apply(state: &mut State, spreadsheet_id: &str, mutation: Mutation) -> GenResult<()> {
        // Reserved up front so the exclusive borrow of the document below
        // never has to reach back into the rest of the state.
        let fresh_sheet_id = state.next_sheet_id + 1;
        let doc = state.document_mut(spreadsheet_id).ok_or_else(|| {
            GenerateError::RemoteWrite(format!("unknown spreadsheet '{spreadsheet_id}'"))
        })?;

        match &mutation {
            Mutation::DuplicateSheet {
                source_sheet_id,
                new_name,
            } => {
                if doc.sheets.iter().any(|sheet| &sheet.title == new_name) {
                    return Err(GenerateError::RemoteWrite(format!(
                        "a sheet named '{new_name}' already exists"
                    )));
                }
                let index = doc.sheet_index_by_id(*source_sheet_id).ok_or_else(|| {
                    GenerateError::RemoteWrite(format!("no sheet with id {source_sheet_id}"))
                })?;
                let mut copy = doc.sheets[index].clone();
                copy.sheet_id = fresh_sheet_id;
                copy.title = new_name.clone();
                doc.sheets.insert(index + 1, copy);
            }
            Mutation::DeleteSheet { sheet_id } => {
                let index = doc.sheet_index_by_id(*sheet_id).ok_or_else(|| {
                    GenerateError::RemoteWrite(format!("no sheet with id {sheet_id}"))
                })?;
                doc.sheets.remove(index);
            }
            Mutation::InsertRows {
                sheet_id,
                start_row,
                end_row,
            } => {
                let sheet = sheet_mut(doc, *sheet_id)?;
                let count = (end_row - start_row).max(0) as usize;
                sheet.insert_blank_rows(*start_row as usize, count);
            }
            Mutation::CopyPaste {
                sheet_id,
                src_start_row,
                src_end_row,
                dst_start_row,
                dst_end_row,
                start_col,
                end_col,
            } => {
                let sheet = sheet_mut(doc, *sheet_id)?;
                let src_rows = (*src_start_row..*src_end_row)
                    .map(|row| {
                        (*start_col..*end_col)
                            .map(|col| sheet.cell(row as usize, col as usize).cloned())
                            .collect::<Vec<_>>()
                    })
                    .collect::<Vec<_>>();
                if !src_rows.is_empty() {
                    for (offset, row) in (*dst_start_row..*dst_end_row).enumerate() {
                        // A smaller source block repeats to fill the destination
                        let pattern = &src_rows[offset % src_rows.len()];
                        for (col_offset, cell) in pattern.iter().enumerate() {
                            if let Some(value) = cell {
                                sheet.set(
                                    row as usize,
                                    (*start_col as usize) + col_offset,
                                    value.clone(),
                                );
                            }
                        }
                    }
                }
            }
            Mutation::UpdateCell {
                sheet_id,
                row,
                col,
                value,
            } => {
                let sheet = sheet_mut(doc, *sheet_id)?;
                sheet.set(*row as usize, *col as usize, value.clone());
            }
        }

        if matches!(mutation, Mutation::DuplicateSheet { .. }) {
            state.next_sheet_id = fresh_sheet_id;
        }
        state.mutation_log.push((spreadsheet_id.to_string(), mutation));
        Ok(())
    }
}

fn sheet_mut(doc: &mut Document, sheet_id: i64) -> GenResult<&mut Sheet> {
    doc.sheets
        .iter_mut()
        .find(|sheet| sheet.sheet_id == sheet_id)
        .ok_or_else(|| GenerateError::RemoteWrite(format!("no sheet with id {sheet_id}")))
}

#[async_trait]
impl DriveOps for MemoryRemote {
    async fn create_folder(&self, parent_id: &str, name: &str) -> GenResult<String> {
        let mut state = self.state.lock().unwrap();
        let id = Uuid::new_v4().simple().to_string();
        debug!(folder = name, id = %id, "creating folder");
        state.folders.push(Folder {
            id: id.clone(),
            name: name.to_string(),
            parent_id: parent_id.to_string(),
        });
        Ok(id)
    }

    async fn copy_file(
        &self,
        source_id: &str,
        dest_folder_id: &str,
        name: &str,
    ) -> GenResult<String> {
        let mut state = self.state.lock().unwrap();
        let source = state.document(source_id).cloned().ok_or_else(|| {
            GenerateError::RemoteWrite(format!("unable to copy spreadsheet '{source_id}'"))
        })?;
        let id = Uuid::new_v4().simple().to_string();
        debug!(source = source_id, copy = %id, name, "copying document");
        state.documents.push(Document {
            id: id.clone(),
            name: name.to_string(),
            folder_id: Some(dest_folder_id.to_string()),
            sheets: source.sheets,
        });
        Ok(id)
    }

    async fn list_spreadsheets(&self, folder_id: &str) -> GenResult<Vec<DriveFile>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .documents
            .iter()
            .filter(|doc| doc.folder_id.as_deref() == Some(folder_id))
            .map(|doc| DriveFile {
                id: doc.id.clone(),
                name: doc.name.clone(),
            })
            .collect())
    }
}

#[async_trait]
impl SheetOps for MemoryRemote {
    async fn sheet_metadata(&self, spreadsheet_id: &str) -> GenResult<Vec<SheetInfo>> {
        let state = self.state.lock().unwrap();
        let doc = state.document(spreadsheet_id).ok_or_else(|| {
            GenerateError::RemoteRead(format!("unknown spreadsheet '{spreadsheet_id}'"))
        })?;
        Ok(doc
            .sheets
            .iter()
            .map(|sheet| SheetInfo {
                sheet_id: sheet.sheet_id,
                title: sheet.title.clone(),
            })
            .collect())
    }

    async fn read_range(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
        a1_range: &str,
    ) -> GenResult<Vec<Vec<String>>> {
        let state = self.state.lock().unwrap();
        let doc = state.document(spreadsheet_id).ok_or_else(|| {
            GenerateError::RemoteRead(format!("unknown spreadsheet '{spreadsheet_id}'"))
        })?;
        let sheet = doc.sheet_by_title(sheet_name).ok_or_else(|| {
            GenerateError::RemoteRead(format!("no sheet named '{sheet_name}'"))
        })?;

        let (start_row, start_col, end_row, end_col) = parse_a1(a1_range)?;

        let mut rows: Vec<Vec<String>> = Vec::new();
        for row in start_row..=end_row.min(sheet.row_count().saturating_sub(1)) {
            let mut cells: Vec<String> = (start_col..=end_col)
                .map(|col| {
                    sheet
                        .cell(row, col)
                        .map(CellValue::display)
                        .unwrap_or_default()
                })
                .collect();
            // The remote service omits trailing empty cells and rows
            while cells.last().is_some_and(|cell| cell.is_empty()) {
                cells.pop();
            }
            rows.push(cells);
        }
        while rows.last().is_some_and(|row| row.is_empty()) {
            rows.pop();
        }
        Ok(rows)
    }

    async fn batch_update(&self, spreadsheet_id: &str, requests: Vec<Mutation>) -> GenResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_writes {
            return Err(GenerateError::RemoteWrite(
                "injected write failure".to_string(),
            ));
        }
        debug!(
            spreadsheet = spreadsheet_id,
            mutations = requests.len(),
            "applying batch update"
        );
        for mutation in requests {
            Self::apply(&mut state, spreadsheet_id, mutation)?;
        }
        Ok(())
    }
}

/// Parse an A1 range like `"A5:Z5"` or `"B2"` into 0-based inclusive
/// (start_row, start_col, end_row, end_col).
fn parse_a1(range: &str) -> GenResult<(usize, usize, usize, usize)> {
    let (start, end) = match range.split_once(':') {
        Some((start, end)) => (start, end),
        None => (range, range),
    };
    let (start_row, start_col) = parse_cell(start)?;
    let (end_row, end_col) = parse_cell(end)?;
    Ok((start_row, start_col, end_row, end_col))
}

fn parse_cell(cell: &str) -> GenResult<(usize, usize)> {
    let letters: String = cell.chars().take_while(char::is_ascii_uppercase).collect();
    let digits = &cell[letters.len()..];
    let col = letter_to_index(&letters);
    let row: usize = digits
        .parse()
        .map_err(|_| GenerateError::RemoteRead(format!("malformed A1 cell '{cell}'")))?;
    if col == 0 || row == 0 {
        return Err(GenerateError::RemoteRead(format!(
            "malformed A1 cell '{cell}'"
        )));
    }
    Ok((row - 1, (col - 1) as usize))
}
