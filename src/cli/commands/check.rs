//! Service availability check.

use opensextant_tagger::config::Config;

use super::super::helpers::{build_manager, tagger_config};
use super::super::icons::{error, success};

pub async fn cmd_check(config: &Config, address: Option<String>) -> anyhow::Result<()> {
    let tagger_config = tagger_config(config, address.as_deref(), None, false);
    let manager = build_manager(&tagger_config, false)?;

    match manager.ensure_available().await {
        Ok(()) => {
            println!(
                "{} OpenSextant available at {}",
                success(),
                tagger_config.network_address
            );
            Ok(())
        }
        Err(e) => {
            println!("{} {}", error(), e);
            anyhow::bail!("probe of {} failed", tagger_config.probe_url())
        }
    }
}
