//! Download JSON-lines document batches by URL and tag them.
//!
//! URLs are read from stdin, one per line. Each download is retried a fixed
//! number of times; a URL that never yields a body is logged and skipped.

use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, warn};

use opensextant_tagger::config::Config;
use opensextant_tagger::models::Document;

use super::super::helpers::{
    build_manager, parse_documents, run_with_progress, tagger_config, write_documents,
};
use super::super::icons::{info, warn as warn_icon};

pub const DEFAULT_ATTEMPTS: u32 = 10;
const FETCH_TIMEOUT_SECS: u64 = 60;

/// GET `url` until it returns a non-empty body or `attempts` run out.
async fn fetch_body(client: &Client, url: &str, attempts: u32) -> Option<String> {
    for attempt in 1..=attempts {
        match client.get(url).send().await {
            Ok(resp) => {
                let status = resp.status();
                match resp.text().await {
                    Ok(body) if !body.is_empty() => return Some(body),
                    Ok(_) => error!("{} attempt {}: empty body (HTTP {})", url, attempt, status),
                    Err(e) => error!("{} attempt {}: {}", url, attempt, e),
                }
            }
            Err(e) => error!("{} attempt {}: {}", url, attempt, e),
        }
    }
    None
}

pub async fn cmd_fetch(
    config: &Config,
    output: Option<&Path>,
    attempts: u32,
    tokenize: bool,
) -> anyhow::Result<()> {
    let tagger_config = tagger_config(config, None, None, tokenize);
    let manager = build_manager(&tagger_config, tokenize)?;
    let client = Client::builder()
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build()?;

    let mut docs: Vec<Document> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let url = line.trim();
        if url.is_empty() {
            continue;
        }

        let Some(body) = fetch_body(&client, url, attempts.max(1)).await else {
            eprintln!("{} Giving up on {} after {} attempts", warn_icon(), url, attempts);
            continue;
        };

        let mut batch = parse_documents(&body);
        if batch.is_empty() {
            warn!("{}: no documents in response", url);
            continue;
        }
        debug!("{}: {} documents", url, batch.len());

        eprintln!("{} {} ({} documents)", info(), url, batch.len());
        run_with_progress(&manager, &mut batch).await;
        docs.append(&mut batch);
    }

    write_documents(output, &docs).await
}
