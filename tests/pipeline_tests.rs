//! End-to-end pipeline tests against the in-memory backend

use std::sync::Mutex;

use pretty_assertions::assert_eq;
use scoregen::error::GenerateError;
use scoregen::pipeline::{CancelToken, NullSink, SheetGenerator};
use scoregen::remote::memory::{MemoryRemote, Sheet};
use scoregen::remote::{CellValue, Mutation};
use scoregen::types::{Competition, Contestant, Juror};

/// Template with one marker row at row 5, scores spanning B..C ("Total:"
/// label in D), matching the reference scenario.
fn board_template() -> Sheet {
    let mut sheet = Sheet::new("Board");
    sheet.set_text(0, 0, "Jury scoring");
    sheet.set_text(1, 1, "<contestant>");
    sheet.set_text(4, 0, "Points:");
    sheet.set_text(4, 1, "Score 1");
    sheet.set_text(4, 2, "Score 2");
    sheet.set_text(4, 3, "Total:");
    sheet
}

fn demo_competition(template_id: &str) -> Competition {
    let mut comp = Competition::new("Demo", template_id);
    comp.jury.push(Juror::new("X", 100));
    comp.jury.push(Juror::new("Y", 50));
    comp.contestants.push(Contestant::new("A"));
    comp.contestants.push(Contestant::new("B"));
    comp
}

fn formula(doc_id: &str, range: &str) -> CellValue {
    CellValue::Formula(format!(
        "=IMPORTRANGE(\"https://docs.google.com/spreadsheets/d/{doc_id}\"; \"{range}\")"
    ))
}

#[tokio::test]
async fn test_end_to_end_reference_scenario() {
    let remote = MemoryRemote::new();
    let template_id = remote.seed_document("Template", vec![board_template()]);
    let comp = demo_competition(&template_id);

    let generator = SheetGenerator::new(&remote, &remote);
    let set = generator
        .generate(&comp, "parent", &NullSink, &CancelToken::new())
        .await
        .unwrap();

    // Folder and document naming
    assert_eq!(remote.folder_name(&set.folder_id), Some("Demo".to_string()));
    assert_eq!(set.sheet_names, vec!["AM2", "AM1"]);
    assert_eq!(set.juror_document_ids.len(), 2);
    assert_eq!(
        remote.document(&set.juror_document_ids[0]).unwrap().name,
        "Demo - Scoring Juror #1 (X)"
    );
    assert_eq!(
        remote.document(&set.juror_document_ids[1]).unwrap().name,
        "Demo - Scoring Juror #2 (Y)"
    );

    let overview = remote.document(&set.overview_id).unwrap();
    assert_eq!(overview.name, "Demo - Overview");

    // The template section is gone; contestant sheets remain
    assert!(overview.sheet_by_title("Board").is_none());
    let am2 = overview.sheet_by_title("AM2").unwrap();
    let am1 = overview.sheet_by_title("AM1").unwrap();

    // Contestant names in the fixed cell, first contestant on AM2
    assert_eq!(am2.cell(1, 1), Some(&CellValue::Text("A".to_string())));
    assert_eq!(am1.cell(1, 1), Some(&CellValue::Text("B".to_string())));

    // One row inserted below the marker (J - 1 = 1)
    assert_eq!(am2.row_count(), 6);
    assert_eq!(am1.row_count(), 6);

    let x_doc = &set.juror_document_ids[0];
    let y_doc = &set.juror_document_ids[1];

    for sheet_name in ["AM2", "AM1"] {
        let sheet = overview.sheet_by_title(sheet_name).unwrap();

        // Juror X on the original marker row (row 5, 0-based 4)
        assert_eq!(sheet.cell(4, 0), Some(&CellValue::Text("X".to_string())));
        assert_eq!(
            sheet.cell(4, 1),
            Some(&formula(x_doc, &format!("{sheet_name}!B5:C5")))
        );
        assert_eq!(sheet.cell(4, 5), Some(&CellValue::Number(1.0)));
        assert_eq!(
            sheet.cell(4, 6),
            Some(&formula(x_doc, &format!("{sheet_name}!G5")))
        );

        // Juror Y on the inserted row below (row 6, 0-based 5)
        assert_eq!(sheet.cell(5, 0), Some(&CellValue::Text("Y".to_string())));
        assert_eq!(
            sheet.cell(5, 1),
            Some(&formula(y_doc, &format!("{sheet_name}!B5:C5")))
        );
        assert_eq!(sheet.cell(5, 5), Some(&CellValue::Number(0.5)));
        assert_eq!(
            sheet.cell(5, 6),
            Some(&formula(y_doc, &format!("{sheet_name}!G5")))
        );
    }

    // Juror copies were taken before expansion: still pristine
    let x_copy = remote.document(x_doc).unwrap();
    let x_am2 = x_copy.sheet_by_title("AM2").unwrap();
    assert_eq!(x_am2.row_count(), 5);
    assert_eq!(
        x_am2.cell(4, 0),
        Some(&CellValue::Text("Points:".to_string()))
    );
}

#[tokio::test]
async fn test_row_expansion_invariant_multiple_markers() {
    let remote = MemoryRemote::new();
    let mut board = board_template();
    board.set_text(9, 0, "Points:");
    board.set_text(9, 2, "Total:"); // second marker at row 10, end column B
    let template_id = remote.seed_document("Template", vec![board]);

    let mut comp = demo_competition(&template_id);
    comp.jury.push(Juror::new("Z", 25)); // three jurors

    let generator = SheetGenerator::new(&remote, &remote);
    let set = generator
        .generate(&comp, "parent", &NullSink, &CancelToken::new())
        .await
        .unwrap();

    let overview = remote.document(&set.overview_id).unwrap();
    for sheet_name in &set.sheet_names {
        let sheet = overview.sheet_by_title(sheet_name).unwrap();

        // 10 template rows + 2 markers × (3 - 1) inserted rows
        assert_eq!(sheet.row_count(), 14);

        // Each juror block starts at the original marker row and is
        // contiguous; the lower block ends up shifted by the upper one.
        for (block_start, juror_names) in [(4, ["X", "Y", "Z"]), (11, ["X", "Y", "Z"])] {
            for (offset, name) in juror_names.iter().enumerate() {
                assert_eq!(
                    sheet.cell(block_start + offset, 0),
                    Some(&CellValue::Text(name.to_string())),
                    "sheet {sheet_name} row {}",
                    block_start + offset + 1
                );
            }
        }
    }
}

#[tokio::test]
async fn test_single_juror_issues_no_row_mutations() {
    let remote = MemoryRemote::new();
    let template_id = remote.seed_document("Template", vec![board_template()]);

    let mut comp = demo_competition(&template_id);
    comp.jury.truncate(1);

    let generator = SheetGenerator::new(&remote, &remote);
    let set = generator
        .generate(&comp, "parent", &NullSink, &CancelToken::new())
        .await
        .unwrap();

    let overview = remote.document(&set.overview_id).unwrap();
    for sheet_name in &set.sheet_names {
        let sheet = overview.sheet_by_title(sheet_name).unwrap();
        // Row count unchanged; the juror writes into the marker row itself
        assert_eq!(sheet.row_count(), 5);
        assert_eq!(sheet.cell(4, 0), Some(&CellValue::Text("X".to_string())));
        assert_eq!(sheet.cell(4, 5), Some(&CellValue::Number(1.0)));
    }

    for (_, mutation) in remote.mutation_log() {
        assert!(
            !matches!(
                mutation,
                Mutation::InsertRows { .. } | Mutation::CopyPaste { .. }
            ),
            "unexpected row mutation: {mutation:?}"
        );
    }
}

#[tokio::test]
async fn test_cancellation_blocks_later_stages() {
    let remote = MemoryRemote::new();
    let template_id = remote.seed_document("Template", vec![board_template()]);
    let comp = demo_competition(&template_id);

    let cancel = CancelToken::new();
    let trigger = cancel.clone();
    let sink = move |message: &str| {
        // Cancel as soon as the contestant-naming stage announces itself;
        // the delete/copy/expand stages must then never run.
        if message.starts_with("Inserting contestant names") {
            trigger.cancel();
        }
    };

    let generator = SheetGenerator::new(&remote, &remote);
    let err = generator
        .generate(&comp, "parent", &sink, &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, GenerateError::Cancelled));

    // Mutations from completed stages remain on the remote store
    let folder_docs = {
        let mut ids = Vec::new();
        for (doc_id, _) in remote.mutation_log() {
            if !ids.contains(&doc_id) {
                ids.push(doc_id);
            }
        }
        ids
    };
    assert_eq!(folder_docs.len(), 1, "only the overview was mutated");
    let overview = remote.document(&folder_docs[0]).unwrap();

    // The template sheet was never deleted and no expansion happened
    assert!(overview.sheet_by_title("Board").is_some());
    assert!(overview.sheet_by_title("AM2").is_some());
    assert!(remote
        .mutation_log()
        .iter()
        .all(|(_, m)| !matches!(m, Mutation::DeleteSheet { .. } | Mutation::InsertRows { .. })));
}

#[tokio::test]
async fn test_write_failure_names_the_stage() {
    let remote = MemoryRemote::new();
    let template_id = remote.seed_document("Template", vec![board_template()]);
    let comp = demo_competition(&template_id);

    remote.set_fail_writes(true);
    let generator = SheetGenerator::new(&remote, &remote);
    let err = generator
        .generate(&comp, "parent", &NullSink, &CancelToken::new())
        .await
        .unwrap_err();

    // The first batch mutation belongs to the sheet-duplication stage
    assert!(matches!(err, GenerateError::RemoteWrite(_)));
    assert!(err.to_string().contains("DuplicateSheets"), "{err}");
}

#[tokio::test]
async fn test_invalid_competition_never_reaches_the_remote() {
    let remote = MemoryRemote::new();
    let template_id = remote.seed_document("Template", vec![board_template()]);
    let mut comp = demo_competition(&template_id);
    comp.jury.clear();

    let generator = SheetGenerator::new(&remote, &remote);
    let err = generator
        .generate(&comp, "parent", &NullSink, &CancelToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, GenerateError::Validation(_)));
    assert!(remote.mutation_log().is_empty());
}

#[tokio::test]
async fn test_missing_template_sheet_is_not_found() {
    let remote = MemoryRemote::new();
    let template_id = remote.seed_document("Template", vec![Sheet::new("Scores")]);
    let comp = demo_competition(&template_id);

    let generator = SheetGenerator::new(&remote, &remote);
    let err = generator
        .generate(&comp, "parent", &NullSink, &CancelToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, GenerateError::NotFound(_)));
    assert!(err.to_string().contains("Board"), "{err}");
}

#[tokio::test]
async fn test_template_without_markers_still_generates() {
    let remote = MemoryRemote::new();
    let mut board = Sheet::new("Board");
    board.set_text(0, 0, "No scoring section here");
    let template_id = remote.seed_document("Template", vec![board]);
    let comp = demo_competition(&template_id);

    let generator = SheetGenerator::new(&remote, &remote);
    let set = generator
        .generate(&comp, "parent", &NullSink, &CancelToken::new())
        .await
        .unwrap();

    let overview = remote.document(&set.overview_id).unwrap();
    for sheet_name in &set.sheet_names {
        let sheet = overview.sheet_by_title(sheet_name).unwrap();
        assert_eq!(sheet.row_count(), 2); // untouched beyond the name cell
    }
    assert!(remote
        .mutation_log()
        .iter()
        .all(|(_, m)| !matches!(m, Mutation::InsertRows { .. })));
}

#[tokio::test]
async fn test_progress_log_narrates_the_stages() {
    let remote = MemoryRemote::new();
    let template_id = remote.seed_document("Template", vec![board_template()]);
    let comp = demo_competition(&template_id);

    let messages: Mutex<Vec<String>> = Mutex::new(Vec::new());
    let sink = |message: &str| messages.lock().unwrap().push(message.to_string());

    let generator = SheetGenerator::new(&remote, &remote);
    generator
        .generate(&comp, "parent", &sink, &CancelToken::new())
        .await
        .unwrap();

    let log: Vec<String> = messages.lock().unwrap().clone();
    let expect_prefixes = [
        "Creating new folder 'Demo'",
        "Copying template spreadsheet",
        "Looking for sheet named 'Board'",
        "Duplicating sheet 'Board' 2 times",
        "Inserting contestant names",
        "Deleting 'Board' sheet",
        "Creating the spreadsheet for each juror",
        "Processing sheet: AM2 (1/2)",
        "Processing sheet: AM1 (2/2)",
        "Generation complete.",
    ];
    for prefix in expect_prefixes {
        assert!(
            log.iter().any(|m| m.starts_with(prefix)),
            "missing progress message '{prefix}' in {log:#?}"
        );
    }
}
