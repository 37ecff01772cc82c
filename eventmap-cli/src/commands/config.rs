use anyhow::Result;
use eventmap_core::config::EventMapConfig;
use owo_colors::OwoColorize;

pub fn run(config: &EventMapConfig) -> Result<()> {
    let config_path = EventMapConfig::config_path()?;

    println!("{}", "Paths".bold());
    println!("  Config:  {}", config_path.display());
    println!();
    println!("{}", "Effective settings".bold());
    for line in config.to_toml()?.lines() {
        println!("  {}", line);
    }

    Ok(())
}
