//! Load-once access to the competency framework.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use pgcf_model::Framework;
use tracing::info;

use crate::csv::read_framework_table;
use crate::error::Result;
use crate::sections::parse_sections;

/// Reads and parses the framework file.
pub fn load_framework(path: &Path) -> Result<Framework> {
    let table = read_framework_table(path)?;
    let framework = parse_sections(table.rows);
    info!(
        path = %path.display(),
        sections = framework.sections.len(),
        topics = framework.topic_count(),
        "framework loaded"
    );
    Ok(framework)
}

/// Read-only framework holder owned by the application root.
///
/// The file is read on the first call to [`FrameworkCache::get`]; every later
/// call returns the same parsed framework without touching the file again.
/// There is no invalidation.
#[derive(Debug)]
pub struct FrameworkCache {
    path: PathBuf,
    framework: OnceLock<Framework>,
}

impl FrameworkCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            framework: OnceLock::new(),
        }
    }

    /// Path of the framework source.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true once the framework has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.framework.get().is_some()
    }

    /// Returns the framework, loading it on first use.
    ///
    /// # Errors
    ///
    /// Returns the load error if the file cannot be read or parsed. A failed
    /// load is not cached.
    pub fn get(&self) -> Result<&Framework> {
        if let Some(framework) = self.framework.get() {
            return Ok(framework);
        }
        let loaded = load_framework(&self.path)?;
        Ok(self.framework.get_or_init(|| loaded))
    }
}
