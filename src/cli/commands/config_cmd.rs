//! Configuration commands.

use opensextant_tagger::config::Config;

use super::super::icons::dim_arrow;

/// Print the effective configuration as JSON, password masked.
pub fn cmd_config_show(config: &Config) -> anyhow::Result<()> {
    let source = config
        .source_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    eprintln!("{} Source: {}", dim_arrow(), source);

    let shown = Config {
        opensextant: config.opensextant.redacted(),
        source_path: None,
    };
    println!("{}", serde_json::to_string_pretty(&shown)?);
    Ok(())
}
