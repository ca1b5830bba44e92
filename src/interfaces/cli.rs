use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dol")]
#[command(about = "German-to-English translation from the command line.")]
#[command(version)]
pub struct Cli {
    /// Translate a PDF, DOCX or TXT document
    #[arg(short = 'f', long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Write the translated document to a file instead of the terminal
    #[arg(short = 'o', long, value_name = "PATH", requires = "file")]
    pub output: Option<PathBuf>,

    /// Live mode: read German from stdin, translate whenever typing pauses
    #[arg(short = 'l', long, conflicts_with = "file")]
    pub live: bool,

    /// Don't use cached result
    #[arg(short = 'n', long)]
    pub nocache: bool,

    /// Output as JSON
    #[arg(long, conflicts_with = "live")]
    pub json: bool,

    /// Choose color theme
    #[arg(short = 'T', long)]
    pub theme: Option<String>,

    /// Model to use instead of the configured one
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// Quiet period before live input is translated, in milliseconds
    #[arg(long, value_name = "MS")]
    pub debounce: Option<u64>,

    /// Generate config sample
    #[arg(long)]
    pub generate_config: bool,

    /// Edit configuration file
    #[arg(long)]
    pub edit_config: bool,

    /// Show status
    #[arg(long)]
    pub status: bool,

    /// Remove all cached translations
    #[arg(long)]
    pub clear_cache: bool,

    /// Text to translate (read from stdin when omitted)
    #[arg(num_args = 1..)]
    pub text: Vec<String>,
}
