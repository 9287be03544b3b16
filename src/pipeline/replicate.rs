//! Sheet replicator: one copy of the template section per contestant

use std::collections::HashMap;

use crate::error::{GenResult, GenerateError};
use crate::remote::{CellValue, Mutation, SheetOps};
use crate::types::Contestant;

/// Prefix of the generated per-contestant sheet names.
pub const CONTESTANT_SHEET_PREFIX: &str = "AM";

/// The generated sheet names for `count` contestants, counting down:
/// index 0 is `"AM{count}"`, index count-1 is `"AM1"`.
///
/// The first contestant must own the highest-numbered sheet; every later
/// stage iterates contestants in this same order, which keeps sheet order
/// and contestant order aligned.
pub fn contestant_sheet_names(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("{}{}", CONTESTANT_SHEET_PREFIX, count - i))
        .collect()
}

/// Duplicate the template sheet once per contestant in a single batched
/// call. Returns the generated sheet names in contestant order.
pub async fn duplicate_contestant_sheets(
    sheets: &dyn SheetOps,
    spreadsheet_id: &str,
    source_sheet_id: i64,
    contestant_count: usize,
) -> GenResult<Vec<String>> {
    let names = contestant_sheet_names(contestant_count);
    let requests = names
        .iter()
        .map(|name| Mutation::DuplicateSheet {
            source_sheet_id,
            new_name: name.clone(),
        })
        .collect();
    sheets.batch_update(spreadsheet_id, requests).await?;
    Ok(names)
}

/// Rebuild the sheet-title → sheet-id map from fresh metadata.
///
/// Duplication does not return deterministic ids, and a title seen earlier
/// can alias a stale id from a previous run, so this map must be rebuilt
/// after every mutation that may have created sheets.
pub async fn resolve_sheet_ids(
    sheets: &dyn SheetOps,
    spreadsheet_id: &str,
) -> GenResult<HashMap<String, i64>> {
    let metadata = sheets.sheet_metadata(spreadsheet_id).await?;
    Ok(metadata
        .into_iter()
        .map(|info| (info.title, info.sheet_id))
        .collect())
}

/// Write each contestant's name into the fixed cell (row 2, column B) of
/// that contestant's sheet, in a single batched call.
pub async fn write_contestant_names(
    sheets: &dyn SheetOps,
    spreadsheet_id: &str,
    contestants: &[Contestant],
    sheet_names: &[String],
) -> GenResult<()> {
    let ids = resolve_sheet_ids(sheets, spreadsheet_id).await?;

    let mut requests = Vec::with_capacity(contestants.len());
    for (contestant, sheet_name) in contestants.iter().zip(sheet_names) {
        let sheet_id = *ids.get(sheet_name).ok_or_else(|| {
            GenerateError::NotFound(format!("could not find sheet id for '{sheet_name}'"))
        })?;
        requests.push(Mutation::UpdateCell {
            sheet_id,
            row: 1,
            col: 1,
            value: CellValue::Text(contestant.name.clone()),
        });
    }
    sheets.batch_update(spreadsheet_id, requests).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::memory::{MemoryRemote, Sheet};

    #[test]
    fn test_names_count_down() {
        assert_eq!(contestant_sheet_names(3), vec!["AM3", "AM2", "AM1"]);
        assert_eq!(contestant_sheet_names(1), vec!["AM1"]);
        assert!(contestant_sheet_names(0).is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_and_name() {
        let remote = MemoryRemote::new();
        let mut board = Sheet::new("Board");
        board.set_text(0, 0, "template");
        let id = remote.seed_document("Overview", vec![board]);
        let board_id = remote.document(&id).unwrap().sheets[0].sheet_id;

        let names = duplicate_contestant_sheets(&remote, &id, board_id, 2)
            .await
            .unwrap();
        assert_eq!(names, vec!["AM2", "AM1"]);

        let contestants = vec![Contestant::new("Alice"), Contestant::new("Bob")];
        write_contestant_names(&remote, &id, &contestants, &names)
            .await
            .unwrap();

        // First contestant lands in the highest-numbered sheet
        let doc = remote.document(&id).unwrap();
        let am2 = doc.sheet_by_title("AM2").unwrap();
        assert_eq!(am2.cell(1, 1), Some(&CellValue::Text("Alice".to_string())));
        let am1 = doc.sheet_by_title("AM1").unwrap();
        assert_eq!(am1.cell(1, 1), Some(&CellValue::Text("Bob".to_string())));
    }

    #[tokio::test]
    async fn test_resolve_sheet_ids_reflects_duplication() {
        let remote = MemoryRemote::new();
        let board = Sheet::new("Board");
        let id = remote.seed_document("Overview", vec![board]);
        let board_id = remote.document(&id).unwrap().sheets[0].sheet_id;

        duplicate_contestant_sheets(&remote, &id, board_id, 2)
            .await
            .unwrap();
        let ids = resolve_sheet_ids(&remote, &id).await.unwrap();
        assert_eq!(ids.len(), 3);
        assert!(ids.contains_key("Board"));
        assert_ne!(ids["AM1"], ids["AM2"]);
        assert_ne!(ids["AM1"], board_id);
    }

    #[tokio::test]
    async fn test_unknown_sheet_name_is_not_found() {
        let remote = MemoryRemote::new();
        let id = remote.seed_document("Overview", vec![Sheet::new("Board")]);
        let contestants = vec![Contestant::new("Alice")];
        let err = write_contestant_names(&remote, &id, &contestants, &["AM9".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, GenerateError::NotFound(_)));
    }
}
