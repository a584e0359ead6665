//! Tag a single string and print the tokens.

use console::style;

use opensextant_tagger::config::Config;
use opensextant_tagger::models::Document;
use opensextant_tagger::services::tagging::TAGGER_ID;
use opensextant_tagger::services::DocumentOutcome;

use super::super::helpers::{build_manager, tagger_config};
use super::super::icons::error;

pub async fn cmd_text(config: &Config, text: &str, address: Option<String>) -> anyhow::Result<()> {
    let tagger_config = tagger_config(config, address.as_deref(), None, true);
    let manager = build_manager(&tagger_config, true)?;

    let mut doc = Document::new("cli", text);
    match manager.process_one(&mut doc).await {
        DocumentOutcome::Failed { stage, error: message } => {
            anyhow::bail!("{} {} failed: {}", error(), stage, message);
        }
        DocumentOutcome::Skipped => {
            println!("{}", style("(no text)").dim());
            return Ok(());
        }
        DocumentOutcome::Completed(_) => {}
    }

    let sentences = doc.sentences(TAGGER_ID).unwrap_or_default();
    for (sent_idx, sentence) in sentences.iter().enumerate() {
        println!("{}", style(format!("sentence {}", sent_idx)).bold());
        for token in &sentence.tokens {
            match (token.entity_type, token.mention_type, token.mention_id) {
                (Some(et), Some(mt), Some(id)) => println!(
                    "  {:<20} {} {} #{}",
                    token.token,
                    style(et).green(),
                    style(mt).cyan(),
                    id
                ),
                _ => println!("  {}", style(&token.token).dim()),
            }
        }
    }
    Ok(())
}
