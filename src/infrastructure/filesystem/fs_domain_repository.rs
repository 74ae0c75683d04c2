//! File-backed domain repository.

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::atomic::write_atomic;
use crate::domain::errors::ProvisionError;
use crate::domain::repositories::DomainRepository;
use crate::utils::validation::is_safe_file_stem;

const CONFIG_EXTENSION: &str = "conf";

/// Stores each domain as `<dir>/<domain>.conf`.
///
/// Only regular, non-hidden `*.conf` files count as domains, so in-flight temp
/// files and unrelated files in the directory are ignored.
pub struct FsDomainRepository {
    dir: PathBuf,
}

impl FsDomainRepository {
    /// Creates a repository over an existing directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl DomainRepository for FsDomainRepository {
    fn config_path(&self, name: &str) -> Result<PathBuf, ProvisionError> {
        if !is_safe_file_stem(name) {
            return Err(ProvisionError::invalid(format!(
                "Domain {name:?} cannot be used as a config file name"
            )));
        }
        Ok(self.dir.join(format!("{name}.{CONFIG_EXTENSION}")))
    }

    async fn exists(&self, name: &str) -> Result<bool, ProvisionError> {
        let path = self.config_path(name)?;
        match fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ProvisionError::io(path, e)),
        }
    }

    async fn write(&self, name: &str, content: &str) -> Result<(), ProvisionError> {
        let path = self.config_path(name)?;
        write_atomic(&path, content).await
    }

    async fn read(&self, name: &str) -> Result<String, ProvisionError> {
        let path = self.config_path(name)?;
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(ProvisionError::NotFound(format!("Domain {name}")))
            }
            Err(e) => Err(ProvisionError::io(path, e)),
        }
    }

    async fn remove(&self, name: &str) -> Result<(), ProvisionError> {
        let path = self.config_path(name)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(ProvisionError::NotFound(format!("Domain {name}")))
            }
            Err(e) => Err(ProvisionError::io(path, e)),
        }
    }

    async fn list(&self) -> Result<BTreeSet<String>, ProvisionError> {
        let mut entries = fs::read_dir(&self.dir)
            .await
            .map_err(|e| ProvisionError::io(&self.dir, e))?;

        let mut names = BTreeSet::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ProvisionError::io(&self.dir, e))?
        {
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| ProvisionError::io(entry.path(), e))?;
            if !file_type.is_file() {
                continue;
            }
            if let Some(name) = domain_name(&entry.path()) {
                names.insert(name);
            }
        }

        Ok(names)
    }
}

fn domain_name(path: &Path) -> Option<String> {
    if path.extension()? != CONFIG_EXTENSION {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    is_safe_file_stem(stem).then(|| stem.to_string())
}
