use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "hfmerge")]
#[command(
    author,
    version,
    about = "Insert placeholder changeSets for hotfixes missing from a database changelog"
)]
pub struct Cli {
    /// Text file listing one hotfix file name per line
    #[arg(short, long, value_name = "FILE")]
    pub source: Option<PathBuf>,

    /// Folder holding one description document per hotfix
    #[arg(short, long, value_name = "DIR")]
    pub folder: Option<PathBuf>,

    /// Mapping file with one `<changeSet id>.hf<hotfix>.<ext>` line per entry
    #[arg(short, long, value_name = "FILE")]
    pub mapping: PathBuf,

    /// Changelog XML to reconcile
    #[arg(short, long, value_name = "FILE")]
    pub original: PathBuf,

    /// Where to write the merged changelog (defaults to output.xml)
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Configuration file (defaults to hfmerge.toml when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, action = ArgAction::Count)]
    pub verbose: u8,
}
