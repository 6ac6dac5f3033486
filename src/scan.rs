//! Batch driver: discover manifests under a directory and parse them
//!
//! Discovery walks the tree once, the registry picks the path(s) each format
//! parses, and every selected file is parsed on the tokio blocking pool. A file
//! that cannot be read is logged and left out; it never stops the batch.

use std::path::Path;

use glob::{MatchOptions, Pattern};
use tracing::{debug, error, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::file_types::ConfigFormat;
use crate::processor::{ConfigFile, ParseOutcome};
use crate::registry::Registry;

const IGNORE_MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Repository-relative paths of every regular file under `root`, with `/`
/// separators, in file-name order, minus those matching `config.scan.ignore`.
pub fn discover(root: &Path, config: &Config) -> Vec<String> {
    let ignore: Vec<Pattern> = config
        .scan
        .ignore
        .iter()
        .filter_map(|pattern| match Pattern::new(pattern) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                warn!("Invalid ignore pattern {pattern:?}: {e}");
                None
            }
        })
        .collect();

    let mut paths = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {e}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let relative = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if ignore
            .iter()
            .any(|pattern| pattern.matches_with(&relative, IGNORE_MATCH_OPTIONS))
        {
            continue;
        }
        paths.push(relative);
    }

    paths
}

/// Parse every manifest the registry selects under `root`.
///
/// Outcomes follow registry priority order, then path order within a format.
pub async fn scan_directory(root: &Path, config: &Config) -> Vec<ParseOutcome> {
    let candidates = discover(root, config);
    let registry = Registry::with_config(config);
    let selections = registry.select_paths(&candidates);
    debug!(
        "Discovered {} files, {} formats selected",
        candidates.len(),
        selections.len()
    );

    let tasks: Vec<_> = selections
        .into_iter()
        .flat_map(|selection| {
            let format = selection.format;
            selection
                .paths
                .into_iter()
                .map(move |path| (format, path))
        })
        .map(|(format, path)| {
            let absolute = root.join(&path);
            let max_file_size = config.limits.max_file_size;
            let project_id = config.scan.project_id.clone();
            async move {
                let raw = read_bounded(&absolute, max_file_size).await?;
                let task = tokio::task::spawn_blocking(move || {
                    let mut file = ConfigFile::new(format, path, &raw);
                    if let Some(project_id) = project_id {
                        file = file.with_project_id(project_id);
                    }
                    file.parse()
                });
                match task.await {
                    Ok(outcome) => Some(outcome),
                    Err(e) => {
                        error!("Parse task for {} failed: {e}", absolute.display());
                        None
                    }
                }
            }
        })
        .collect();

    futures::future::join_all(tasks)
        .await
        .into_iter()
        .flatten()
        .collect()
}

/// Parse a single file, detecting its format from the name unless given.
///
/// Returns `None` when no enabled format matches the file name.
pub async fn parse_file(
    path: &Path,
    format: Option<ConfigFormat>,
    config: &Config,
) -> std::io::Result<Option<ParseOutcome>> {
    let display_path = path.to_string_lossy().replace('\\', "/");
    let Some(format) = format.or_else(|| Registry::with_config(config).format_for_path(&display_path))
    else {
        return Ok(None);
    };

    let raw = tokio::fs::read(path).await?;
    let mut file = ConfigFile::new(format, display_path, &raw);
    if let Some(project_id) = &config.scan.project_id {
        file = file.with_project_id(project_id.clone());
    }
    Ok(Some(file.parse()))
}

async fn read_bounded(path: &Path, max_file_size: u64) -> Option<Vec<u8>> {
    let metadata = match tokio::fs::metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) => {
            warn!("Failed to stat {}: {e}", path.display());
            return None;
        }
    };
    if metadata.len() > max_file_size {
        warn!(
            "Skipping {}: {} bytes exceeds limit of {max_file_size}",
            path.display(),
            metadata.len()
        );
        return None;
    }

    match tokio::fs::read(path).await {
        Ok(raw) => Some(raw),
        Err(e) => {
            warn!("Failed to read {}: {e}", path.display());
            None
        }
    }
}
