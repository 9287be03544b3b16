//! Row expansion engine: one scoring row per juror under every marker row
//!
//! Marker rows are processed bottom-up. Every processed marker grows the
//! sheet by `jury.len() - 1` rows below its original position, and a forward
//! scan only ever finds later markers further down, so walking the snapshot
//! in reverse guarantees the rows still above are never shifted. The
//! original row numbers therefore stay valid for the whole pass without
//! re-scanning.

use tracing::debug;

use crate::column::{index_to_letter, letter_to_index};
use crate::error::{GenResult, GenerateError};
use crate::pipeline::progress::{CancelToken, ProgressSink};
use crate::pipeline::replicate::resolve_sheet_ids;
use crate::pipeline::scan::MarkerRow;
use crate::remote::{CellValue, Mutation, SheetOps};
use crate::types::Juror;

/// URL prefix of the remote spreadsheet service, as it appears inside
/// cross-document formulas.
const DOCUMENT_URL_PREFIX: &str = "https://docs.google.com/spreadsheets/d/";

/// The formula importing a juror's score range for one marker row. The
/// semicolon separator is part of the remote formula grammar and must be
/// reproduced exactly.
fn points_formula(juror_document_id: &str, sheet_name: &str, marker: &MarkerRow) -> String {
    format!(
        "=IMPORTRANGE(\"{prefix}{id}\"; \"{sheet}!B{row}:{end}{row}\")",
        prefix = DOCUMENT_URL_PREFIX,
        id = juror_document_id,
        sheet = sheet_name,
        row = marker.row,
        end = marker.end_column,
    )
}

/// The formula importing a juror's single feedback cell, four columns past
/// the end column on the same row.
fn feedback_formula(juror_document_id: &str, sheet_name: &str, marker: &MarkerRow) -> String {
    let feedback_column = index_to_letter(letter_to_index(&marker.end_column) + 4);
    format!(
        "=IMPORTRANGE(\"{prefix}{id}\"; \"{sheet}!{col}{row}\")",
        prefix = DOCUMENT_URL_PREFIX,
        id = juror_document_id,
        sheet = sheet_name,
        col = feedback_column,
        row = marker.row,
    )
}

/// Expand every marker row of every contestant sheet with one row per
/// juror, wiring the juror's name, score import, weight fraction and
/// feedback import into the designated columns.
///
/// All writes for one marker row go out as a single batch. A failed batch
/// aborts the run; rows already committed for lower marker rows stay in
/// place on the remote store.
pub async fn expand_juror_rows(
    sheets: &dyn SheetOps,
    overview_id: &str,
    sheet_names: &[String],
    markers: &[MarkerRow],
    jury: &[Juror],
    juror_document_ids: &[String],
    progress: &dyn ProgressSink,
    cancel: &CancelToken,
) -> GenResult<()> {
    progress.report("Duplicating juror rows in the overview spreadsheet...");

    let sheet_ids = resolve_sheet_ids(sheets, overview_id).await?;

    for (index, sheet_name) in sheet_names.iter().enumerate() {
        cancel.check()?;
        let sheet_id = *sheet_ids.get(sheet_name).ok_or_else(|| {
            GenerateError::NotFound(format!("sheet '{sheet_name}' not found in spreadsheet"))
        })?;

        progress.report(&format!(
            "Processing sheet: {} ({}/{})",
            sheet_name,
            index + 1,
            sheet_names.len()
        ));

        for marker in markers.iter().rev() {
            cancel.check()?;
            expand_marker_row(
                sheets,
                overview_id,
                sheet_id,
                sheet_name,
                marker,
                jury,
                juror_document_ids,
            )
            .await?;
        }
    }

    progress.report("Finished duplicating juror rows in the overview spreadsheet.");
    Ok(())
}

async fn expand_marker_row(
    sheets: &dyn SheetOps,
    overview_id: &str,
    sheet_id: i64,
    sheet_name: &str,
    marker: &MarkerRow,
    jury: &[Juror],
    juror_document_ids: &[String],
) -> GenResult<()> {
    // Liveness check against the replicated sheet; a template may carry
    // trailing unused marker rows that read back empty.
    let window = format!("A{row}:Z{row}", row = marker.row);
    let current = sheets.read_range(overview_id, sheet_name, &window).await?;
    if current.is_empty() {
        debug!(sheet = sheet_name, row = marker.row, "marker row is empty, skipping");
        return Ok(());
    }

    let juror_count = jury.len() as i64;
    let marker_top = i64::from(marker.row) - 1; // 0-based row of the marker
    let mut requests: Vec<Mutation> = Vec::new();

    // A single juror writes straight into the marker row; only a larger
    // jury needs the sheet to grow.
    if jury.len() > 1 {
        requests.push(Mutation::InsertRows {
            sheet_id,
            start_row: marker_top + 1,
            end_row: marker_top + juror_count,
        });
        requests.push(Mutation::CopyPaste {
            sheet_id,
            src_start_row: marker_top,
            src_end_row: marker_top + 1,
            dst_start_row: marker_top + 1,
            dst_end_row: marker_top + juror_count,
            start_col: 0,
            end_col: 26,
        });
    }

    let end_index = letter_to_index(&marker.end_column);
    for (juror_index, juror) in jury.iter().enumerate() {
        let row = marker_top + juror_index as i64;
        let juror_document_id = &juror_document_ids[juror_index];

        requests.push(Mutation::UpdateCell {
            sheet_id,
            row,
            col: 0,
            value: CellValue::Text(juror.name.clone()),
        });
        requests.push(Mutation::UpdateCell {
            sheet_id,
            row,
            col: 1,
            value: CellValue::Formula(points_formula(juror_document_id, sheet_name, marker)),
        });
        requests.push(Mutation::UpdateCell {
            sheet_id,
            row,
            col: i64::from(end_index) + 3,
            value: CellValue::Formula(feedback_formula(juror_document_id, sheet_name, marker)),
        });
        requests.push(Mutation::UpdateCell {
            sheet_id,
            row,
            col: i64::from(end_index) + 2,
            value: CellValue::Number(juror.weight_fraction()),
        });
    }

    sheets.batch_update(overview_id, requests).await
}
