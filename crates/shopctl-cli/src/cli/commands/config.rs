//! Config command handlers.

use anyhow::{Context, Result};
use shopctl_core::config;

pub fn path() {
    println!("{}", config::paths::config_path().display());
}

pub fn init() -> Result<()> {
    let config_path = config::paths::config_path();
    config::Config::init(&config_path)
        .with_context(|| format!("init config at {}", config_path.display()))?;
    println!("Created config at {}", config_path.display());
    Ok(())
}

pub fn show() -> Result<()> {
    let config = config::Config::load().context("load config")?;
    let toml = toml_render(&config)?;
    print!("{toml}");
    Ok(())
}

pub fn set_url(url: &str) -> Result<()> {
    config::Config::save_base_url(url).context("save base URL")?;
    println!("API base URL set to {}", url.trim_end_matches('/'));
    Ok(())
}

fn toml_render(config: &config::Config) -> Result<String> {
    toml::to_string_pretty(config).context("render config")
}
