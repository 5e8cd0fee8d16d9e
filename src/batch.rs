use anyhow::Context;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::detection::WoundAnalyzer;
use crate::report::AnalysisResponse;

/// Counts from one batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub failed: usize,
}

/// Analyze every `*.json` request in `input_dir`, at most `jobs` at a
/// time, writing `<stem>.result.json` into `out_dir`.
///
/// Each request is decoded and analyzed on its own; a bad request only
/// produces its own error record. Debug dumps, when enabled, go to a
/// subdirectory named after the request file.
pub async fn run_batch(
    analyzer: Arc<WoundAnalyzer>,
    input_dir: &Path,
    out_dir: &Path,
    jobs: usize,
) -> anyhow::Result<BatchSummary> {
    let requests = list_requests(input_dir).await?;
    tokio::fs::create_dir_all(out_dir)
        .await
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    info!(count = requests.len(), jobs, "starting batch");

    let limit = Arc::new(Semaphore::new(jobs.max(1)));
    let mut tasks = JoinSet::new();

    for request_path in requests {
        let analyzer = analyzer.clone();
        let limit = limit.clone();
        let stem = request_stem(&request_path);
        let out_path = out_dir.join(format!("{}.result.json", stem));

        tasks.spawn(async move {
            let _permit = limit.acquire_owned().await?;
            let text = tokio::fs::read_to_string(&request_path)
                .await
                .with_context(|| format!("Failed to read {}", request_path.display()))?;

            let response =
                tokio::task::spawn_blocking(move || analyzer.respond_to_json_as(&stem, &text))
                    .await
                    .context("Analysis task did not complete")?;

            let json = response.to_json()?;
            tokio::fs::write(&out_path, json)
                .await
                .with_context(|| format!("Failed to write {}", out_path.display()))?;

            if response.is_error() {
                warn!(request = %request_path.display(), "request produced an error record");
            }
            anyhow::Ok(response.is_error())
        });
    }

    let mut summary = BatchSummary::default();
    while let Some(joined) = tasks.join_next().await {
        let is_error = joined.context("Batch task panicked")??;
        summary.processed += 1;
        if is_error {
            summary.failed += 1;
        }
    }

    info!(processed = summary.processed, failed = summary.failed, "batch finished");
    Ok(summary)
}

async fn list_requests(input_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(input_dir)
        .await
        .with_context(|| format!("Failed to read directory {}", input_dir.display()))?;

    let mut requests = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            requests.push(path);
        }
    }
    requests.sort();
    Ok(requests)
}

fn request_stem(request_path: &Path) -> String {
    request_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "request".to_string())
}

/// Convenience for callers that already hold a response
pub fn write_response(path: &Path, response: &AnalysisResponse) -> anyhow::Result<()> {
    let json = response.to_json()?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}
