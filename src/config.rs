use std::time::Duration;

use clap::Parser;

use crate::data::FetchOptions;

/// Browse a gzip-wrapped Parquet snapshot and pick rows from it.
#[derive(Parser, Debug, Clone)]
#[command(name = "cartelera-viewer", version, about)]
pub struct ViewerConfig {
    /// URL (http/https/file) or local path of the `.parquet.gz` artifact
    #[arg(env = "CARTELERA_URL")]
    pub location: String,

    /// Network timeout for the download, in seconds
    #[arg(long, default_value_t = 60)]
    pub timeout_secs: u64,

    /// Refuse artifacts larger than this many bytes
    #[arg(long, default_value_t = 256 * 1024 * 1024)]
    pub max_bytes: u64,

    /// Do not open a window; apply `--click` events and print the selection
    #[arg(long)]
    pub headless: bool,

    /// Row (0-based) to click in headless mode; repeat for several clicks
    #[arg(long = "click", value_name = "ROW", requires = "headless")]
    pub clicks: Vec<usize>,
}

impl ViewerConfig {
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            timeout: Duration::from_secs(self.timeout_secs),
            max_bytes: self.max_bytes,
        }
    }
}
