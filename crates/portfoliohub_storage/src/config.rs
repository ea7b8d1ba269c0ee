//! The `config` singleton and `backups` collection.

use async_trait::async_trait;
use portfoliohub_core::{BackupMarker, MaintenanceConfig};
use portfoliohub_error::HubResult;
use portfoliohub_interface::ConfigStore;
use std::sync::Arc;
use tokio::sync::{RwLock, watch};
use tracing::{info, instrument};

/// In-memory site configuration.
#[derive(Debug, Clone)]
pub struct InMemoryConfigStore {
    maintenance: Arc<watch::Sender<Option<MaintenanceConfig>>>,
    backups: Arc<RwLock<Vec<BackupMarker>>>,
}

impl InMemoryConfigStore {
    /// Create a store with no maintenance document.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            maintenance: Arc::new(tx),
            backups: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl Default for InMemoryConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigStore for InMemoryConfigStore {
    async fn maintenance(&self) -> HubResult<Option<MaintenanceConfig>> {
        Ok(self.maintenance.borrow().clone())
    }

    #[instrument(skip(self, config), fields(active = config.is_active))]
    async fn put_maintenance(&self, config: &MaintenanceConfig) -> HubResult<()> {
        self.maintenance.send_replace(Some(config.clone()));
        info!("Maintenance document written");
        Ok(())
    }

    #[instrument(skip(self, marker), fields(backup_id = %marker.id))]
    async fn append_backup(&self, marker: &BackupMarker) -> HubResult<()> {
        self.backups.write().await.push(marker.clone());
        Ok(())
    }

    async fn backups(&self) -> HubResult<Vec<BackupMarker>> {
        Ok(self.backups.read().await.clone())
    }

    fn watch_maintenance(&self) -> watch::Receiver<Option<MaintenanceConfig>> {
        self.maintenance.subscribe()
    }
}
