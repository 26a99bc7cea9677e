use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{NetevoError, NetevoResult};

/// One serialized network state on disk.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SnapshotRef {
    /// Location of the snapshot file.
    pub path: PathBuf,
    /// Generation label, taken from the file stem.
    pub generation: String,
}

impl SnapshotRef {
    /// Build a reference for `path`, deriving the generation label from its stem.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let generation = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, generation }
    }
}

/// How to thin out the sorted list of snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sampling {
    /// Keep every n-th snapshot starting from the first.
    Stride(usize),
    /// Keep this many snapshots spread evenly over the whole run.
    Even(usize),
}

impl Sampling {
    /// Reject sampling parameters that would select nothing.
    pub fn validate(self) -> NetevoResult<()> {
        match self {
            Self::Stride(0) => Err(NetevoError::validation("sample stride must be at least 1")),
            Self::Even(0) => Err(NetevoError::validation(
                "snapshot count must be at least 1",
            )),
            Self::Stride(_) | Self::Even(_) => Ok(()),
        }
    }

    /// Indices into a sorted list of `total` items, in increasing order.
    pub fn indices(self, total: usize) -> NetevoResult<Vec<usize>> {
        self.validate()?;
        Ok(match self {
            Self::Stride(n) => (0..total).step_by(n).collect(),
            Self::Even(k) if k >= total => (0..total).collect(),
            Self::Even(1) => vec![0],
            Self::Even(k) => {
                // round(i * (total - 1) / (k - 1)), half up
                let span = total - 1;
                let steps = k - 1;
                (0..k)
                    .map(|i| (2 * i * span + steps) / (2 * steps))
                    .collect()
            }
        })
    }

    /// Select the sampled subset of an already sorted list.
    pub fn apply<T: Clone>(self, items: &[T]) -> NetevoResult<Vec<T>> {
        Ok(self
            .indices(items.len())?
            .into_iter()
            .map(|i| items[i].clone())
            .collect())
    }
}

/// List regular files in `dir` whose file name matches the glob `pattern`, sorted by name.
///
/// A directory that does not exist yields an empty list, the same as one without matches.
pub fn discover(dir: &Path, pattern: &str) -> NetevoResult<Vec<SnapshotRef>> {
    let matcher = glob::Pattern::new(pattern)
        .map_err(|e| NetevoError::validation(format!("invalid pattern '{pattern}': {e}")))?;

    let entries = match std::fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(dir = %dir.display(), "snapshot directory does not exist");
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(anyhow::Error::new(e)
                .context(format!("list snapshot directory '{}'", dir.display()))
                .into());
        }
    };

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("read entry in '{}'", dir.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if matcher.matches(name) {
            paths.push(path);
        }
    }

    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths.into_iter().map(SnapshotRef::new).collect())
}

#[cfg(test)]
#[path = "../../tests/unit/snapshot/discover.rs"]
mod tests;
