//! Persisted list of packages excluded from report generation
//!
//! Plain text, one package name per line, sorted and deduplicated. Names are only
//! ever added by the tool; removing one means editing the file by hand.

use std::collections::BTreeSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum IgnoreListError {
    #[error("Failed to read ignore list {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write ignore list {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreList {
    path: PathBuf,
    names: BTreeSet<String>,
}

impl IgnoreList {
    /// Load the ignore list, creating an empty file (and its directory) if absent
    pub fn load(path: &Path) -> Result<Self, IgnoreListError> {
        let read_error = |source| IgnoreListError::Read {
            path: path.to_path_buf(),
            source,
        };

        if !path.exists() {
            info!("Creating empty ignore list at {:?}", path);
            let list = Self::empty(path);
            list.persist()?;
            return Ok(list);
        }

        let content = std::fs::read_to_string(path).map_err(read_error)?;
        let names: BTreeSet<String> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        debug!("Loaded {} ignored packages from {:?}", names.len(), path);

        Ok(Self {
            path: path.to_path_buf(),
            names,
        })
    }

    fn empty(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            names: BTreeSet::new(),
        }
    }

    pub fn is_ignored(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Ignored names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Add names and rewrite the file. Returns how many names were new.
    pub fn append<I, S>(&mut self, names: I) -> Result<usize, IgnoreListError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let added = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_string())
            .filter(|name| !name.is_empty())
            .filter(|name| self.names.insert(name.clone()))
            .count();

        if added > 0 {
            self.persist()?;
            info!("Added {} packages to ignore list {:?}", added, self.path);
        }
        Ok(added)
    }

    /// Replace the file atomically with the current contents
    fn persist(&self) -> Result<(), IgnoreListError> {
        let write_error = |source| IgnoreListError::Write {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(write_error)?;

        let mut file = NamedTempFile::new_in(dir).map_err(write_error)?;
        for name in &self.names {
            writeln!(file, "{}", name).map_err(write_error)?;
        }
        file.persist(&self.path).map_err(|e| write_error(e.error))?;
        Ok(())
    }
}
