use crate::cli::Cli;
use crate::config::AppConfig;
use crate::error::{CliError, Result};
use crate::progress::ProgressTracker;
use crate::ui;
use changelog::{Document, HotfixSelection, HotfixSource, writer};
use tracing::info;

pub fn execute(cli: Cli) -> Result<()> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(output) = cli.output {
        config.output.path = output;
    }

    let selection = HotfixSelection::from_paths(cli.source, cli.folder)?;

    let mut progress = ProgressTracker::new("Hotfix Merge").with_steps(&[
        "Reading hotfixes",
        "Reading hotfix mapping",
        "Loading original changelog",
        "Merging changelog entries",
        "Writing merged changelog",
    ]);

    progress.start_step();
    let hotfixes = selection.read()?;
    progress.complete_step();

    progress.start_step();
    let mapping = changelog::read_mapping(&cli.mapping)?;
    progress.complete_step();

    progress.start_step();
    let original = Document::load(&cli.original)?;
    progress.complete_step();

    progress.start_step();
    let hotfix_count = hotfixes.len();
    let outcome = changelog::reconcile(&original, hotfixes, &mapping, &config.merge)
        .map_err(|e| CliError::from(e).with_context("Failed to merge changelog"))?;
    progress.complete_step();

    progress.start_step();
    writer::save(&outcome.document, &config.output.path, config.output.indent)?;
    progress.complete_step();

    progress.complete();

    let report = &outcome.report;
    info!(
        hotfixes = hotfix_count,
        mappings = mapping.len(),
        kept = report.kept.len(),
        inserted = report.inserted.len(),
        "merge finished"
    );
    ui::merge_summary(&config.output.path, report);

    Ok(())
}
