//! Spreadsheet generation pipeline
//!
//! A strictly ordered sequence of remote mutations: create the run folder,
//! copy the template into it as the overview, locate the template section,
//! replicate it per contestant, copy the overview per juror, then expand
//! every marker row with per-juror scoring rows that import from the juror
//! copies. Stages never run out of order and data only flows forward.

pub mod assemble;
pub mod expand;
pub mod progress;
pub mod replicate;
pub mod scan;

pub use progress::{CancelToken, NullSink, ProgressSink};
pub use scan::{MarkerRow, ScanBounds};

use tracing::info;

use crate::error::{GenResult, GenerateError};
use crate::remote::{DriveOps, Mutation, SheetOps};
use crate::types::{Competition, GeneratedDocumentSet};

/// Title of the template section sheet the pipeline replicates.
pub const TEMPLATE_SHEET: &str = "Board";

/// The pipeline's stages, in the only order they may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CreateFolder,
    CopyTemplate,
    FindBoardSheet,
    DuplicateSheets,
    NameContestants,
    DeleteTemplateSheet,
    CopyJurorSheets,
    ExpandJurorRows,
    Done,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::CreateFolder => "CreateFolder",
            Stage::CopyTemplate => "CopyTemplate",
            Stage::FindBoardSheet => "FindBoardSheet",
            Stage::DuplicateSheets => "DuplicateSheets",
            Stage::NameContestants => "NameContestants",
            Stage::DeleteTemplateSheet => "DeleteTemplateSheet",
            Stage::CopyJurorSheets => "CopyJurorSheets",
            Stage::ExpandJurorRows => "ExpandJurorRows",
            Stage::Done => "Done",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Knobs a caller may adjust without touching pipeline semantics.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Title of the template sheet to replicate.
    pub template_sheet: String,
    /// Marker scan window of the template sheet.
    pub scan: ScanBounds,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            template_sheet: TEMPLATE_SHEET.to_string(),
            scan: ScanBounds::default(),
        }
    }
}

/// The generation pipeline over a pair of remote capabilities.
pub struct SheetGenerator<'a> {
    drive: &'a dyn DriveOps,
    sheets: &'a dyn SheetOps,
    config: GeneratorConfig,
}

impl<'a> SheetGenerator<'a> {
    pub fn new(drive: &'a dyn DriveOps, sheets: &'a dyn SheetOps) -> Self {
        Self::with_config(drive, sheets, GeneratorConfig::default())
    }

    pub fn with_config(
        drive: &'a dyn DriveOps,
        sheets: &'a dyn SheetOps,
        config: GeneratorConfig,
    ) -> Self {
        Self {
            drive,
            sheets,
            config,
        }
    }

    /// Run the whole pipeline for one competition.
    ///
    /// The competition is validated and deep-copied up front; the run never
    /// observes later mutations of the caller's value. Cancellation is
    /// checked before every stage (and inside the heavy per-row loops); an
    /// in-flight remote call always completes. There is no resume: a failed
    /// or cancelled run leaves its remote objects behind and the next run
    /// starts over with a fresh folder.
    pub async fn generate(
        &self,
        competition: &Competition,
        parent_folder_id: &str,
        progress: &dyn ProgressSink,
        cancel: &CancelToken,
    ) -> GenResult<GeneratedDocumentSet> {
        competition.validate()?;
        // Snapshot: the pipeline owns its input for the whole run
        let competition = competition.clone();

        let mut stage = Stage::CreateFolder;
        match self
            .run(&competition, parent_folder_id, progress, cancel, &mut stage)
            .await
        {
            Ok(set) => {
                progress.report("Generation complete.");
                Ok(set)
            }
            Err(GenerateError::Cancelled) => {
                progress.report(&format!("Generation cancelled before {stage}."));
                Err(GenerateError::Cancelled)
            }
            Err(err) => {
                let err = err.in_stage(stage.name());
                progress.report(&format!("Generation failed: {err}"));
                Err(err)
            }
        }
    }

    async fn run(
        &self,
        competition: &Competition,
        parent_folder_id: &str,
        progress: &dyn ProgressSink,
        cancel: &CancelToken,
        stage: &mut Stage,
    ) -> GenResult<GeneratedDocumentSet> {
        let enter = |next: Stage, stage: &mut Stage| -> GenResult<()> {
            *stage = next;
            info!(stage = next.name(), "entering stage");
            cancel.check()
        };

        enter(Stage::CreateFolder, stage)?;
        let folder_id = assemble::create_competition_folder(
            self.drive,
            parent_folder_id,
            &competition.name,
            progress,
        )
        .await?;

        enter(Stage::CopyTemplate, stage)?;
        let overview_id = assemble::copy_overview(
            self.drive,
            &competition.source_sheet_id,
            &folder_id,
            &competition.name,
            progress,
        )
        .await?;

        enter(Stage::FindBoardSheet, stage)?;
        progress.report(&format!(
            "Looking for sheet named '{}' in the new spreadsheet...",
            self.config.template_sheet
        ));
        let board_sheet_id = replicate::resolve_sheet_ids(self.sheets, &overview_id)
            .await?
            .get(&self.config.template_sheet)
            .copied()
            .ok_or_else(|| {
                GenerateError::NotFound(format!(
                    "sheet named '{}' not found in the spreadsheet",
                    self.config.template_sheet
                ))
            })?;
        let markers = scan::find_marker_rows(
            self.sheets,
            &overview_id,
            &self.config.template_sheet,
            self.config.scan,
        )
        .await?;
        progress.report(&format!("Found {} scoring marker row(s).", markers.len()));

        enter(Stage::DuplicateSheets, stage)?;
        progress.report(&format!(
            "Duplicating sheet '{}' {} times...",
            self.config.template_sheet,
            competition.contestants.len()
        ));
        let sheet_names = replicate::duplicate_contestant_sheets(
            self.sheets,
            &overview_id,
            board_sheet_id,
            competition.contestants.len(),
        )
        .await?;

        enter(Stage::NameContestants, stage)?;
        progress.report("Inserting contestant names into each duplicated sheet...");
        replicate::write_contestant_names(
            self.sheets,
            &overview_id,
            &competition.contestants,
            &sheet_names,
        )
        .await?;

        enter(Stage::DeleteTemplateSheet, stage)?;
        progress.report(&format!("Deleting '{}' sheet...", self.config.template_sheet));
        self.sheets
            .batch_update(
                &overview_id,
                vec![Mutation::DeleteSheet {
                    sheet_id: board_sheet_id,
                }],
            )
            .await?;

        enter(Stage::CopyJurorSheets, stage)?;
        let juror_document_ids = assemble::copy_juror_documents(
            self.drive,
            &overview_id,
            &folder_id,
            &competition.name,
            &competition.jury,
            progress,
            cancel,
        )
        .await?;

        enter(Stage::ExpandJurorRows, stage)?;
        expand::expand_juror_rows(
            self.sheets,
            &overview_id,
            &sheet_names,
            &markers,
            &competition.jury,
            &juror_document_ids,
            progress,
            cancel,
        )
        .await?;

        *stage = Stage::Done;
        Ok(GeneratedDocumentSet {
            folder_id,
            overview_id,
            sheet_names,
            juror_document_ids,
        })
    }
}
