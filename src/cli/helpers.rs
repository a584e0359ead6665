//! Shared helper functions for CLI commands.

use std::path::Path;
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::{mpsc, Mutex};
use tracing::warn;

use opensextant_tagger::config::{Config, TaggerConfig};
use opensextant_tagger::models::Document;
use opensextant_tagger::services::{
    BatchTransformResult, IncrementalTransform, OpenSextantTagger, TransformEvent,
    TransformManager, WhitespaceTokenizer, WHITESPACE_TAGGER_ID,
};

use super::icons::{error, success};

/// `None` and `-` both mean stdin/stdout.
pub fn is_stdio(path: Option<&Path>) -> bool {
    path.map_or(true, |p| p == Path::new("-"))
}

/// Parse JSON-lines documents. Blank lines are ignored; unparsable lines are
/// logged and dropped.
pub fn parse_documents(input: &str) -> Vec<Document> {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(idx, line)| match serde_json::from_str::<Document>(line) {
            Ok(doc) => Some(doc),
            Err(e) => {
                warn!("line {}: not a document: {}", idx + 1, e);
                None
            }
        })
        .collect()
}

pub async fn read_documents(input: Option<&Path>) -> anyhow::Result<Vec<Document>> {
    let contents = if is_stdio(input) {
        let mut buf = String::new();
        tokio::io::stdin().read_to_string(&mut buf).await?;
        buf
    } else {
        let path = input.unwrap_or(Path::new("-"));
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {}", path.display(), e))?
    };
    Ok(parse_documents(&contents))
}

pub fn render_documents(docs: &[Document]) -> anyhow::Result<String> {
    let mut out = String::new();
    for doc in docs {
        out.push_str(&serde_json::to_string(doc)?);
        out.push('\n');
    }
    Ok(out)
}

pub async fn write_documents(output: Option<&Path>, docs: &[Document]) -> anyhow::Result<()> {
    let rendered = render_documents(docs)?;
    match output {
        Some(path) if !is_stdio(output) => tokio::fs::write(path, rendered)
            .await
            .map_err(|e| anyhow::anyhow!("Cannot write {}: {}", path.display(), e)),
        _ => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(rendered.as_bytes()).await?;
            stdout.flush().await?;
            Ok(())
        }
    }
}

/// Apply command-line overrides to the configured tagger settings.
///
/// With `tokenize` the tagger reads the whitespace tokenizer's sentences
/// unless a source tokenizer was named explicitly.
pub fn tagger_config(
    config: &Config,
    address: Option<&str>,
    source_tagger: Option<&str>,
    tokenize: bool,
) -> TaggerConfig {
    let mut tagger_config = config.opensextant.clone();
    if let Some(address) = address {
        tagger_config = tagger_config.with_network_address(address);
    }
    match source_tagger {
        Some(id) => tagger_config = tagger_config.with_source_tagger_id(id),
        None if tokenize => {
            tagger_config = tagger_config.with_source_tagger_id(WHITESPACE_TAGGER_ID)
        }
        None => {}
    }
    tagger_config
}

pub fn build_manager(
    tagger_config: &TaggerConfig,
    tokenize: bool,
) -> anyhow::Result<TransformManager> {
    let mut transforms: Vec<Arc<dyn IncrementalTransform>> = Vec::new();
    if tokenize {
        transforms.push(Arc::new(WhitespaceTokenizer));
    }
    transforms.push(Arc::new(OpenSextantTagger::new(tagger_config)?));
    Ok(TransformManager::new(transforms))
}

/// Run a batch with a progress bar on stderr and a summary line at the end.
pub async fn run_with_progress(
    manager: &TransformManager,
    docs: &mut [Document],
) -> BatchTransformResult {
    let (event_tx, mut event_rx) = mpsc::channel::<TransformEvent>(100);

    let pb = Arc::new(Mutex::new(None::<ProgressBar>));
    let pb_clone = pb.clone();

    let event_handler = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            match event {
                TransformEvent::Started { total_documents } => {
                    let progress = ProgressBar::new(total_documents as u64);
                    progress.set_style(
                        ProgressStyle::default_bar()
                            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}")
                            .unwrap_or_else(|_| ProgressStyle::default_bar())
                            .progress_chars("█▓░"),
                    );
                    progress.set_message("Tagging...");
                    *pb_clone.lock().await = Some(progress);
                }
                TransformEvent::DocumentStarted { label, .. } => {
                    if let Some(ref progress) = *pb_clone.lock().await {
                        progress.set_message(truncate(&label, 40));
                    }
                }
                TransformEvent::DocumentCompleted { .. }
                | TransformEvent::DocumentSkipped { .. } => {
                    if let Some(ref progress) = *pb_clone.lock().await {
                        progress.inc(1);
                    }
                }
                TransformEvent::DocumentFailed {
                    document_id,
                    stage,
                    error: message,
                } => {
                    if let Some(ref progress) = *pb_clone.lock().await {
                        progress.println(format!(
                            "{} {} ({}): {}",
                            error(),
                            document_id,
                            stage,
                            message
                        ));
                        progress.inc(1);
                    }
                }
                TransformEvent::Complete {
                    succeeded,
                    failed,
                    skipped,
                } => {
                    if let Some(ref progress) = *pb_clone.lock().await {
                        progress.finish_and_clear();
                    }
                    *pb_clone.lock().await = None;

                    eprintln!(
                        "{} Tagging complete: {} succeeded, {} failed, {} skipped",
                        success(),
                        succeeded,
                        failed,
                        skipped
                    );
                }
            }
        }
    });

    let result = manager.run_batch(docs, event_tx).await;
    let _ = event_handler.await;
    manager.shutdown();
    result
}

/// Truncate a string to `max_len` characters, adding "..." if truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_documents_skips_bad_lines() {
        let input = concat!(
            r#"{"stream_id": "1-a", "body": {"clean_visible": "Hello"}}"#,
            "\n\n",
            "not json\n",
            r#"{"stream_id": "2-b"}"#,
            "\n",
        );
        let docs = parse_documents(input);
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].clean_visible(), Some("Hello"));
        assert_eq!(docs[1].stream_id, "2-b");
    }

    #[test]
    fn test_render_is_one_document_per_line() {
        let docs = vec![Document::new("1", "a"), Document::new("2", "b\nc")];
        let rendered = render_documents(&docs).unwrap();
        assert_eq!(rendered.lines().count(), 2);
        assert_eq!(parse_documents(&rendered), docs);
    }

    #[test]
    fn test_is_stdio() {
        assert!(is_stdio(None));
        assert!(is_stdio(Some(Path::new("-"))));
        assert!(!is_stdio(Some(Path::new("out.jsonl"))));
    }

    #[test]
    fn test_tagger_config_overrides() {
        let config = Config::default();
        let tc = tagger_config(&config, Some("ost:9000"), None, true);
        assert_eq!(tc.network_address, "ost:9000");
        assert_eq!(tc.source_tagger_id, WHITESPACE_TAGGER_ID);

        let tc = tagger_config(&config, None, Some("nltk_tokenizer"), true);
        assert_eq!(tc.source_tagger_id, "nltk_tokenizer");

        let tc = tagger_config(&config, None, None, false);
        assert_eq!(tc.source_tagger_id, config.opensextant.source_tagger_id);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a much longer label", 10), "a much ...");
        assert_eq!(truncate("Québec City, Canada", 8), "Québe...");
    }
}
