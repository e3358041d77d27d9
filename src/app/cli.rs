use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "code-extract",
    author,
    version,
    about = "Collect project source files into one Markdown document"
)]
pub struct Cli {
    /// Base directory of the project
    pub directory: PathBuf,

    /// Config to use (e.g. 'web', 'android'); resolves to <NAME>_extract.toml
    #[arg(short, long, default_value = "extract")]
    pub config: String,

    /// Explicit config file, skipping the search
    #[arg(long, value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    /// Output file; a bare file name is placed in Extracts/
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// File that receives the list of extracted paths
    #[arg(long, default_value = "files.txt")]
    pub list_file: PathBuf,

    /// Title of the generated document
    #[arg(long, default_value = "Project Code Collection")]
    pub title: String,

    /// Only render collected paths matching these globs (e.g. 'src/**/*.rs')
    #[arg(long, num_args = 1..)]
    pub only: Option<Vec<String>>,

    /// Sort the selected paths before rendering
    #[arg(long)]
    pub sort: bool,

    /// Print the document to stdout instead of writing the output file
    #[arg(long)]
    pub stdout: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}
