use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "threat-report",
    about = "Request threat intelligence reports from a report service",
    version,
    long_about = None
)]
pub struct Config {
    /// Base URL of the report service
    #[arg(long, env = "REPORT_API_URL")]
    pub api_url: String,

    /// Directory for log files
    #[arg(long, env = "REPORT_LOG_DIR", default_value = "logs")]
    pub log_dir: PathBuf,
}
