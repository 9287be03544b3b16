//! Document assembler: the competition folder and its document copies

use crate::error::GenResult;
use crate::pipeline::progress::{CancelToken, ProgressSink};
use crate::remote::DriveOps;
use crate::types::Juror;

/// Display name of the overview document for a competition.
pub fn overview_name(competition_name: &str) -> String {
    format!("{competition_name} - Overview")
}

/// Display name of one juror's private scoring document.
pub fn juror_document_name(competition_name: &str, index: usize, juror: &Juror) -> String {
    format!(
        "{} - Scoring Juror #{} ({})",
        competition_name,
        index + 1,
        juror.name
    )
}

/// Create the destination folder for a generation run. Create-only: a
/// failed or cancelled run leaves its folder behind and the next run makes
/// a new one.
pub async fn create_competition_folder(
    drive: &dyn DriveOps,
    parent_folder_id: &str,
    competition_name: &str,
    progress: &dyn ProgressSink,
) -> GenResult<String> {
    progress.report(&format!("Creating new folder '{competition_name}'..."));
    let folder_id = drive.create_folder(parent_folder_id, competition_name).await?;
    progress.report(&format!(
        "Done. New folder '{competition_name}' has ID: {folder_id}"
    ));
    Ok(folder_id)
}

/// Copy the template document into the run folder as the overview.
pub async fn copy_overview(
    drive: &dyn DriveOps,
    template_id: &str,
    folder_id: &str,
    competition_name: &str,
    progress: &dyn ProgressSink,
) -> GenResult<String> {
    progress.report(&format!(
        "Copying template spreadsheet {template_id} for the overview..."
    ));
    let overview_id = drive
        .copy_file(template_id, folder_id, &overview_name(competition_name))
        .await?;
    progress.report(&format!(
        "Done. Spreadsheet {template_id} was copied to {overview_id}"
    ));
    Ok(overview_id)
}

/// Copy the finished overview once per juror, in jury order, checking for
/// cancellation before each copy. Returns the juror document ids,
/// index-aligned with the jury.
pub async fn copy_juror_documents(
    drive: &dyn DriveOps,
    overview_id: &str,
    folder_id: &str,
    competition_name: &str,
    jury: &[Juror],
    progress: &dyn ProgressSink,
    cancel: &CancelToken,
) -> GenResult<Vec<String>> {
    progress.report("Creating the spreadsheet for each juror...");

    let mut juror_ids = Vec::with_capacity(jury.len());
    for (index, juror) in jury.iter().enumerate() {
        cancel.check()?;
        let name = juror_document_name(competition_name, index, juror);
        let copy_id = drive.copy_file(overview_id, folder_id, &name).await?;
        progress.report(&format!(
            "Copied overview spreadsheet for juror #{} ({}) (document {})",
            index + 1,
            juror.name,
            copy_id
        ));
        juror_ids.push(copy_id);
    }
    Ok(juror_ids)
}
