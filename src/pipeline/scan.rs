//! Template scanner: locate the "Points:" marker rows of a template sheet

use crate::column::index_to_letter;
use crate::error::GenResult;
use crate::remote::SheetOps;

/// Literal token that anchors a scoring row in column A.
pub const POINTS_MARKER: &str = "Points:";
/// Literal token that closes the scored range on a marker row.
pub const TOTAL_MARKER: &str = "Total:";

/// The window the scanner reads. Anything outside it is never found; the
/// bound is a deliberate scope limit and is never widened silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanBounds {
    /// Rows 1..=rows are scanned.
    pub rows: u32,
    /// Columns A..=index_to_letter(cols) are scanned.
    pub cols: u32,
}

impl Default for ScanBounds {
    fn default() -> Self {
        Self { rows: 200, cols: 26 }
    }
}

impl ScanBounds {
    /// The A1 window this bound spans, e.g. `"A1:Z200"`.
    pub fn a1_window(&self) -> String {
        format!("A1:{}{}", index_to_letter(self.cols), self.rows)
    }
}

/// One located marker row, snapshotted from the pristine template.
///
/// `row` is 1-based within the scanned window. `end_column` is the letter of
/// the first "Total:" cell on the row, or empty if the row has none. The
/// snapshot is taken once, before any row insertion; all downstream row
/// arithmetic is relative to these original numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerRow {
    pub row: u32,
    pub end_column: String,
}

/// Scan the bounded window of `sheet_name` for marker rows, in ascending
/// row order. Zero markers is an empty list, not an error.
pub async fn find_marker_rows(
    sheets: &dyn SheetOps,
    spreadsheet_id: &str,
    sheet_name: &str,
    bounds: ScanBounds,
) -> GenResult<Vec<MarkerRow>> {
    let rows = sheets
        .read_range(spreadsheet_id, sheet_name, &bounds.a1_window())
        .await?;

    let mut markers = Vec::new();
    for (row_index, cells) in rows.iter().enumerate() {
        if cells.first().map(String::as_str) != Some(POINTS_MARKER) {
            continue;
        }

        // Columns B.. left to right; the first "Total:" fixes the end column.
        // The scored range ends on the column before the "Total:" label, so
        // the 0-based position of the label is exactly the 1-based index of
        // the end column.
        let end_column = cells
            .iter()
            .enumerate()
            .skip(1)
            .take(bounds.cols.saturating_sub(1) as usize)
            .find(|(_, cell)| cell.as_str() == TOTAL_MARKER)
            .map(|(col_index, _)| index_to_letter(col_index as u32))
            .unwrap_or_default();

        markers.push(MarkerRow {
            row: row_index as u32 + 1,
            end_column,
        });
    }

    Ok(markers)
}
