//! Tag JSON-lines document streams.

use std::path::Path;

use opensextant_tagger::config::Config;

use super::super::helpers::{
    build_manager, is_stdio, read_documents, run_with_progress, tagger_config, write_documents,
};
use super::super::icons::{dim_arrow, info};

pub struct TagOptions {
    pub tokenize: bool,
    pub source_tagger: Option<String>,
    pub address: Option<String>,
}

pub async fn cmd_tag(
    config: &Config,
    input: Option<&Path>,
    output: Option<&Path>,
    options: TagOptions,
) -> anyhow::Result<()> {
    let tagger_config = tagger_config(
        config,
        options.address.as_deref(),
        options.source_tagger.as_deref(),
        options.tokenize,
    );
    let manager = build_manager(&tagger_config, options.tokenize)?;

    let mut docs = read_documents(input).await?;
    eprintln!(
        "{} Tagging {} documents via {}",
        info(),
        docs.len(),
        tagger_config.rest_url()
    );
    eprintln!(
        "  {} tokens from '{}'",
        dim_arrow(),
        tagger_config.source_tagger_id
    );

    run_with_progress(&manager, &mut docs).await;
    write_documents(output, &docs).await?;

    if !is_stdio(output) {
        if let Some(path) = output {
            eprintln!("  {} Wrote {}", dim_arrow(), path.display());
        }
    }
    Ok(())
}
