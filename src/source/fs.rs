use super::{LoadedModule, TaskSource};
use crate::preview::{Preview, PreviewSpec};
use anyhow::{Context, Result};
use async_trait::async_trait;
use globset::{Glob, GlobMatcher};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use walkdir::WalkDir;

/// Wire shape of one task module document: an optional `default` component
/// plus whatever extra tables the author keeps alongside it (ignored).
#[derive(Debug, Deserialize)]
struct ModuleDoc {
    #[serde(default)]
    default: Option<PreviewSpec>,
}

/// Filesystem-backed task source. Discovery walks a root directory and
/// keeps files matching a glob pattern; each match loads as a TOML or JSON
/// module document.
///
/// Discovered keys take the form `./<root-name>/<relative path>`, so the
/// folder segment after the root names the owning task regardless of where
/// the root itself lives.
pub struct FsTaskSource {
    root: PathBuf,
    prefix: String,
    matcher: GlobMatcher,
}

impl FsTaskSource {
    pub fn new(root: impl Into<PathBuf>, pattern: &str) -> Result<Self> {
        let root = root.into();
        let matcher = Glob::new(pattern)
            .with_context(|| format!("invalid discovery pattern: {pattern}"))?
            .compile_matcher();
        let label = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "tasks".to_string());
        Ok(Self {
            root,
            prefix: format!("./{}/", label),
            matcher,
        })
    }

    /// Map a discovered key back to the real file it came from.
    fn resolve(&self, path: &str) -> PathBuf {
        match path.strip_prefix(&self.prefix) {
            Some(rel) => self.root.join(rel),
            None => PathBuf::from(path),
        }
    }
}

#[async_trait]
impl TaskSource for FsTaskSource {
    fn paths(&self) -> Vec<String> {
        if !self.root.is_dir() {
            tracing::warn!(
                root = %self.root.display(),
                "task root does not exist; nothing to discover"
            );
            return Vec::new();
        }

        let mut out = Vec::new();
        for entry in WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(rel) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            if !self.matcher.is_match(rel) {
                continue;
            }
            let rel = rel.to_string_lossy().replace('\\', "/");
            out.push(format!("{}{}", self.prefix, rel));
        }
        out
    }

    async fn load(&self, path: &str) -> Result<LoadedModule> {
        let file = self.resolve(path);
        let raw = tokio::fs::read_to_string(&file)
            .await
            .with_context(|| format!("failed to read module {}", file.display()))?;

        let doc: ModuleDoc = match file.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&raw)
                .with_context(|| format!("malformed JSON module {}", file.display()))?,
            _ => toml::from_str(&raw)
                .with_context(|| format!("malformed TOML module {}", file.display()))?,
        };

        Ok(LoadedModule {
            default: doc.default.map(|spec| Arc::new(spec) as Arc<dyn Preview>),
        })
    }
}
