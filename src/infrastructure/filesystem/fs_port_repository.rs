//! File-backed listen directive repository.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;

use super::atomic::write_atomic;
use crate::domain::entities::ListenPort;
use crate::domain::errors::ProvisionError;
use crate::domain::listen_file::ListenFile;
use crate::domain::repositories::PortRepository;

/// Keeps `listen <port>;` lines in a single shared file.
///
/// Every mutation parses the whole file, edits the line list and writes it
/// back atomically. A missing file reads as empty.
pub struct FsPortRepository {
    path: PathBuf,
}

impl FsPortRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> Result<ListenFile, ProvisionError> {
        match fs::read_to_string(&self.path).await {
            Ok(text) => Ok(ListenFile::parse(&text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(ListenFile::default()),
            Err(e) => Err(ProvisionError::io(&self.path, e)),
        }
    }

    async fn store(&self, file: &ListenFile) -> Result<(), ProvisionError> {
        write_atomic(&self.path, &file.render()).await
    }
}

#[async_trait]
impl PortRepository for FsPortRepository {
    async fn is_listed(&self, port: ListenPort) -> Result<bool, ProvisionError> {
        Ok(self.load().await?.contains(port))
    }

    async fn append(&self, port: ListenPort) -> Result<(), ProvisionError> {
        let mut file = self.load().await?;
        file.append(port);
        self.store(&file).await
    }

    async fn remove(&self, port: ListenPort) -> Result<usize, ProvisionError> {
        let mut file = self.load().await?;
        let removed = file.remove_all(port);
        if removed == 0 {
            return Err(ProvisionError::NotFound(format!("Port {port}")));
        }
        self.store(&file).await?;
        Ok(removed)
    }

    async fn list(&self) -> Result<Vec<ListenPort>, ProvisionError> {
        Ok(self.load().await?.ports())
    }
}
