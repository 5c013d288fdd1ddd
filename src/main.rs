use clap::Parser;
use color_eyre::Result;

mod app;
mod client;
mod config;
mod logging;
mod ui;

use app::App;
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let config = Config::parse();
    let _log_guard = logging::init_tracing(&config.log_dir)?;

    let terminal = ratatui::init();
    let result = App::new(&config).run(terminal).await;
    ratatui::restore();
    result
}
