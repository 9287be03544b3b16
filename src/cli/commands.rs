use crate::column::letter_to_index;
use crate::error::{GenResult, GenerateError};
use crate::pipeline::{CancelToken, SheetGenerator};
use crate::remote::memory::{MemoryRemote, Sheet};
use crate::remote::DriveOps;
use crate::store;
use colored::Colorize;
use std::path::PathBuf;

/// Execute the validate command
pub fn validate(files: Vec<PathBuf>) -> GenResult<()> {
    println!("{}", "🎯 Scoregen - Validating competitions".bold().green());
    println!();

    let mut failures = 0;
    for file in &files {
        match store::load(file).and_then(|comp| comp.validate().map(|()| comp)) {
            Ok(comp) => {
                println!(
                    "   {} {} ({} jurors, {} contestants)",
                    "✅".green(),
                    file.display(),
                    comp.jury.len(),
                    comp.contestants.len()
                );
            }
            Err(err) => {
                failures += 1;
                println!("   {} {}: {}", "❌".red(), file.display(), err);
            }
        }
    }

    println!();
    if failures > 0 {
        println!("{}", format!("{failures} file(s) failed validation").red());
        return Err(GenerateError::Validation(format!(
            "{failures} of {} file(s) failed validation",
            files.len()
        )));
    }
    println!("{}", "All files valid".green());
    Ok(())
}

/// Execute the show command - print one competition definition
pub fn show(file: PathBuf) -> GenResult<()> {
    let comp = store::load(&file)?;

    println!("{}", "🎯 Scoregen - Competition".bold().green());
    println!("   Name: {}", comp.name.bright_blue().bold());
    println!("   Template: {}", comp.source_sheet_id);
    println!();

    println!("{}", "⚖️  Jury:".bold().cyan());
    for (index, juror) in comp.jury.iter().enumerate() {
        println!(
            "   #{} {} (weight {} → ×{})",
            index + 1,
            juror.name.bright_blue(),
            juror.weight,
            juror.weight_fraction()
        );
    }
    println!();

    println!("{}", "🏆 Contestants:".bold().cyan());
    for (index, contestant) in comp.contestants.iter().enumerate() {
        println!("   #{} {}", index + 1, contestant.name.bright_blue());
    }

    match comp.validate() {
        Ok(()) => println!("\n   {} Ready for generation", "✅".green()),
        Err(err) => println!("\n   {} {}", "⚠️".yellow(), err),
    }
    Ok(())
}

/// Execute the list command - show the stored competition files
pub fn list(dir: PathBuf) -> GenResult<()> {
    println!("{}", "🎯 Scoregen - Stored competitions".bold().green());
    println!("   Directory: {}", dir.display());
    println!();

    let names = store::list(&dir)?;
    if names.is_empty() {
        println!("   (none)");
    } else {
        for name in names {
            println!("   {name}");
        }
    }
    Ok(())
}

/// Execute the simulate command - run the full pipeline against the
/// in-memory backend, seeded with a synthetic template.
pub async fn simulate(file: PathBuf, markers: Vec<(u32, String)>) -> GenResult<()> {
    let comp = store::load(&file)?;
    comp.validate()?;

    println!("{}", "🎯 Scoregen - Simulated generation".bold().green());
    println!("   Competition: {}", comp.name.bright_blue().bold());
    println!(
        "{}",
        "   📋 SIMULATION - nothing leaves this machine\n".yellow()
    );

    let remote = MemoryRemote::new();
    let template_id = remote.seed_document("Template", vec![board_template(&markers)]);
    let mut comp = comp;
    comp.source_sheet_id = template_id;

    let generator = SheetGenerator::new(&remote, &remote);
    let cancel = CancelToken::new();
    let progress = |message: &str| println!("   {}", message.cyan());
    let set = generator
        .generate(&comp, "simulated-parent", &progress, &cancel)
        .await?;

    println!();
    println!("{}", "✅ Generation Results:".bold().green());
    println!(
        "   Folder: {} ({})",
        remote
            .folder_name(&set.folder_id)
            .unwrap_or_else(|| "?".to_string()),
        set.folder_id
    );
    println!("   Overview document: {}", set.overview_id);

    if let Some(overview) = remote.document(&set.overview_id) {
        for name in &set.sheet_names {
            if let Some(sheet) = overview.sheet_by_title(name) {
                println!(
                    "      Sheet {} ({} rows after expansion)",
                    name.bright_blue(),
                    sheet.row_count()
                );
            }
        }
    }

    println!("   Juror documents:");
    for (juror, doc_id) in comp.jury.iter().zip(&set.juror_document_ids) {
        println!("      {} → {}", juror.name.bright_blue(), doc_id);
    }

    let listing = remote.list_spreadsheets(&set.folder_id).await?;
    println!("   Folder contents: {} document(s)", listing.len());
    for file in listing {
        println!("      {}", file.name);
    }
    Ok(())
}

/// Build the synthetic "Board" template sheet a simulation runs against.
fn board_template(markers: &[(u32, String)]) -> Sheet {
    let mut sheet = Sheet::new("Board");
    sheet.set_text(0, 1, "Contestant:");
    for (row, end_column) in markers {
        let row0 = row.saturating_sub(1) as usize;
        sheet.set_text(row0, 0, "Points:");
        // The "Total:" label sits one column past the scored range
        sheet.set_text(row0, letter_to_index(end_column) as usize, "Total:");
    }
    sheet
}

/// Parse a `ROW:ENDCOL` marker spec such as `5:C`.
pub fn parse_marker_spec(spec: &str) -> Result<(u32, String), String> {
    let (row, end) = spec
        .split_once(':')
        .ok_or_else(|| format!("expected ROW:ENDCOL, got '{spec}'"))?;
    let row: u32 = row
        .parse()
        .map_err(|_| format!("'{row}' is not a row number"))?;
    if row == 0 {
        return Err("row numbers are 1-based".to_string());
    }
    let end = end.to_uppercase();
    if end.is_empty() || !end.chars().all(|ch| ch.is_ascii_uppercase()) {
        return Err(format!("'{end}' is not a column letter"));
    }
    Ok((row, end))
}
