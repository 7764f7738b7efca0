use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "termassign",
    version,
    about = "Terminal assignment editor with a math symbol palette"
)]
pub struct Cli {
    /// Problem document to open on start
    pub file: Option<PathBuf>,

    /// Config file [default: <config dir>/termassign/config.yaml]
    #[arg(long, value_name = "path")]
    pub config: Option<PathBuf>,

    /// Delay before the palette hides after a field loses focus
    #[arg(long, value_name = "ms")]
    pub debounce_ms: Option<u64>,

    /// Parse the document, print a summary and exit
    #[arg(long, requires = "file")]
    pub check: bool,
}
