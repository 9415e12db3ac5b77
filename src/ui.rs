use changelog::MergeReport;
use colored::Colorize;
use std::io::{self, Write};
use std::path::Path;

/// Header printed once before the merge steps
pub fn section_header(title: &str) {
    println!("\n{}", format!("==== {title} ====").cyan().bold());
}

pub fn step_started(step: &str) {
    print!("{} {} ... ", "⏳".yellow(), step.bright_white());
    let _ = io::stdout().flush();
}

pub fn step_done(step: &str) {
    println!("{} {}", "\r✅".green(), step.green());
}

/// Summary of a finished merge: the written file, then anything the merge
/// had to leave out.
pub fn merge_summary(output: &Path, report: &MergeReport) {
    println!(
        "{} Wrote {} ({} entries, {} placeholders)",
        "✅".green(),
        output.display().to_string().bold(),
        report.kept.len(),
        report.inserted.len()
    );

    if !report.skipped.is_empty() {
        println!(
            "{} {} entries without hotfix mapping were left out",
            "ℹ️ ".blue(),
            report.skipped.len()
        );
    }

    if !report.unflushed.is_empty() {
        println!(
            "{} {} hotfixes sort after the last mapped entry and were not inserted: {}",
            "⚠️ ".yellow(),
            report.unflushed.len(),
            report.unflushed.join(", ").yellow()
        );
    }
}
