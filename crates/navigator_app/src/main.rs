mod platform;

use std::path::PathBuf;

use anyhow::Context;
use navigator_logging::nav_info;

use platform::config::{locate, AppConfig};

fn main() -> anyhow::Result<()> {
    let explicit = std::env::args_os().nth(1).map(PathBuf::from);
    let cwd = std::env::current_dir().context("reading the working directory")?;
    let home = std::env::var_os("HOME").map(PathBuf::from);

    let path = locate(explicit, &cwd, home.as_deref())?;
    let config = AppConfig::load(&path)
        .with_context(|| format!("loading config from {}", path.display()))?;

    platform::logging::initialize(&config.logging);
    nav_info!(
        "config loaded from {} ({} backends)",
        path.display(),
        config.sonarr.len()
    );

    platform::app::run(config)
}
