//! Ordered table of manifest formats and path dispatch
//!
//! The order of [`ConfigFormat::ALL`] is the tie-break: the first format whose
//! glob matches a path wins that path.

use serde::Serialize;

use crate::config::Config;
use crate::file_types::ConfigFormat;

/// The path(s) one format should parse in a repository snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub format: ConfigFormat,
    pub paths: Vec<String>,
}

/// Dispatches repository paths to manifest formats
#[derive(Debug, Clone)]
pub struct Registry {
    formats: Vec<ConfigFormat>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Registry with every supported format
    pub fn new() -> Self {
        Self {
            formats: ConfigFormat::ALL.to_vec(),
        }
    }

    /// Registry without the formats disabled in `config`
    pub fn with_config(config: &Config) -> Self {
        Self {
            formats: ConfigFormat::ALL
                .into_iter()
                .filter(|format| config.formats.is_enabled(*format))
                .collect(),
        }
    }

    pub fn formats(&self) -> &[ConfigFormat] {
        &self.formats
    }

    /// The first format, in priority order, whose glob matches `path`.
    pub fn format_for_path(&self, path: &str) -> Option<ConfigFormat> {
        self.formats.iter().copied().find(|format| format.matches(path))
    }

    /// For each format in priority order, the path(s) it should parse.
    ///
    /// Multi-file formats get every matching path. Other formats get the one
    /// closest to the repository root; among equally deep paths the earliest
    /// in `paths` wins. Formats with no matching path are left out.
    pub fn select_paths<S: AsRef<str>>(&self, paths: &[S]) -> Vec<Selection> {
        self.formats
            .iter()
            .filter_map(|&format| {
                let mut matching = paths
                    .iter()
                    .map(AsRef::as_ref)
                    .filter(|path| format.matches(path));

                let paths: Vec<String> = if format.supports_multiple_files() {
                    matching.map(str::to_string).collect()
                } else {
                    let first = matching.next()?;
                    let shallowest = matching.fold(first, |best, path| {
                        if depth(path) < depth(best) { path } else { best }
                    });
                    vec![shallowest.to_string()]
                };

                (!paths.is_empty()).then_some(Selection { format, paths })
            })
            .collect()
    }
}

fn depth(path: &str) -> usize {
    path.trim_start_matches("./").matches('/').count()
}
