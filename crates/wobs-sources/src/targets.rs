//! Target selection: a persisted list of location names, or the city this
//! machine is in.

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};
use wobs_core::{NetworkLocator, TargetSelector};

/// Reads targets from a file holding one location name per line.
///
/// An empty file is removed and, like a missing one, recreated holding the
/// current city as reported by the network locator.
pub struct TargetListFile {
    path: PathBuf,
    locator: Arc<dyn NetworkLocator>,
}

impl TargetListFile {
    pub fn new<P: AsRef<Path>>(path: P, locator: Arc<dyn NetworkLocator>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            locator,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn seed_with_current_city(&self) -> Result<Vec<String>> {
        let city = self.locator.current_city().await?;
        info!(path = %self.path.display(), city = %city, "creating target list");
        tokio::fs::write(&self.path, format!("{}\n", city)).await?;
        Ok(vec![city])
    }
}

/// Non-blank lines, trimmed
pub fn parse_target_list(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

#[async_trait::async_trait]
impl TargetSelector for TargetListFile {
    async fn load_targets(&self) -> Result<Vec<String>> {
        info!(path = %self.path.display(), "loading targets");
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let targets = parse_target_list(&contents);
                if !targets.is_empty() {
                    return Ok(targets);
                }
                error!(path = %self.path.display(), "target list is empty");
                warn!(path = %self.path.display(), "removing empty target list");
                tokio::fs::remove_file(&self.path).await?;
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %self.path.display(), "target list not found");
            }
            Err(e) => return Err(e.into()),
        }
        self.seed_with_current_city().await
    }
}

/// Single target: wherever this machine is
pub struct CurrentCity {
    locator: Arc<dyn NetworkLocator>,
}

impl CurrentCity {
    pub fn new(locator: Arc<dyn NetworkLocator>) -> Self {
        Self { locator }
    }
}

#[async_trait::async_trait]
impl TargetSelector for CurrentCity {
    async fn load_targets(&self) -> Result<Vec<String>> {
        let city = self.locator.current_city().await?;
        info!(city = %city, "detected current city");
        Ok(vec![city])
    }
}
