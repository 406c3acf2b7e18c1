//! `cogwork status` — Show resolved configuration.

use anyhow::Context;
use cogwork_config::AppConfig;

pub async fn run() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load config")?;
    let backend = &config.default_provider;
    let catalog = cogwork_tools::default_catalog();

    println!("Cogwork Status");
    println!("==============");
    println!("  Config dir:      {}", AppConfig::config_dir().display());
    println!("  Workspace:       {}", AppConfig::workspace_dir().display());
    println!("  Backend:         {backend}");
    println!("  Model:           {}", config.model_for(backend));
    println!("  Temperature:     {}", config.default_temperature);
    println!("  Max tokens:      {}", config.default_max_tokens);
    println!("  Agent:           {}", config.agent.name);
    println!("  Max iterations:  {}", config.agent.max_iterations);
    println!("  Memory cap:      {} turns", config.agent.max_memories);
    println!("  Tools:           {} registered", catalog.len());
    println!(
        "  API key:         {}",
        if config.api_key_for(backend).is_some() {
            "configured"
        } else {
            "missing"
        }
    );

    // Check config file existence
    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file — run `cogwork onboard` first");
    }

    Ok(())
}
