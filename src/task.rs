use crate::preview::Preview;
use crate::source::TaskSource;
use futures_util::future::join_all;
use std::sync::Arc;

/// Normalized record for one discovered task module.
#[derive(Debug, Clone)]
pub struct TaskRecord {
    /// Folder segment that owns the task (`01` in `./tasks/01/a.toml`);
    /// the whole path when the load failed.
    pub id: String,
    /// File name, extension included.
    pub name: String,
    /// Complete relative path; unique, and the sole identity and sort key.
    pub full_path: String,
    /// The module's default component, when it loaded and exported one.
    pub component: Option<Arc<dyn Preview>>,
    /// True iff the load succeeded and a default component was present.
    pub is_valid: bool,
}

impl PartialEq for TaskRecord {
    fn eq(&self, other: &Self) -> bool {
        self.full_path == other.full_path
    }
}

impl Eq for TaskRecord {}

impl TaskRecord {
    fn loaded(path: &str, default: Option<Arc<dyn Preview>>) -> Self {
        let segments: Vec<&str> = path.split('/').collect();
        let name = segments.last().copied().unwrap_or(path).to_string();
        // ./tasks/01/a.toml -> "01", the folder right after the task root.
        // Keys shorter than that (no owning folder) fall back to the name.
        let id = segments.get(2).copied().unwrap_or(name.as_str()).to_string();
        Self {
            id,
            name,
            full_path: path.to_string(),
            is_valid: default.is_some(),
            component: default,
        }
    }

    fn failed(path: &str) -> Self {
        let name = path.rsplit('/').next().unwrap_or(path).to_string();
        Self {
            id: path.to_string(),
            name,
            full_path: path.to_string(),
            component: None,
            is_valid: false,
        }
    }
}

/// Run the one-time discovery pass: load every module the source exposes
/// and return one record per path, sorted by full path. Per-module failures
/// become invalid records rather than dropping the path. Loads run
/// concurrently and may settle in any order; the returned list is complete,
/// so the caller commits it in one step.
pub async fn discover(source: &dyn TaskSource) -> Vec<TaskRecord> {
    let paths = source.paths();
    let loads = paths.iter().map(|path| async move {
        match source.load(path).await {
            Ok(module) => TaskRecord::loaded(path, module.default),
            Err(err) => {
                tracing::error!(path = %path, "failed to load task module: {:#}", err);
                TaskRecord::failed(path)
            }
        }
    });

    let mut records: Vec<TaskRecord> = join_all(loads).await;
    records.sort_by(|a, b| a.full_path.cmp(&b.full_path));
    records
}

/// Pick the task mounted after discovery: the first valid record in sorted
/// order, else the first record of any validity, else none. The all-invalid
/// fallback mounts nothing useful and surfaces as the viewport warning.
pub fn initial_selection(records: &[TaskRecord]) -> Option<TaskRecord> {
    records
        .iter()
        .find(|r| r.is_valid)
        .or_else(|| records.first())
        .cloned()
}
