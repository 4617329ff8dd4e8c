//! Store selection from command-line options.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Args;
use tracing::info;

use mergulho_core::{DocumentStore, StoreUrl};
use mergulho_file::FileStore;
use mergulho_firestore::{FirestoreConfig, FirestoreStore};

/// Options naming the document store to use.
#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// Store location: file:///path for a local store, or a Firestore endpoint URL
    #[arg(long = "store", env = "MERGULHO_STORE")]
    pub store: String,

    /// Firestore project id (remote stores only)
    #[arg(long, env = "MERGULHO_PROJECT")]
    pub project: Option<String>,

    /// Firestore database id
    #[arg(long, env = "MERGULHO_DATABASE", default_value = "(default)")]
    pub database: String,

    /// OAuth2 bearer token for Firestore
    #[arg(long, env = "MERGULHO_FIRESTORE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Firestore request timeout in seconds
    #[arg(long, env = "MERGULHO_TIMEOUT", default_value_t = 30)]
    pub timeout: u64,
}

impl StoreArgs {
    /// Open the configured store.
    pub fn open(&self) -> Result<Arc<dyn DocumentStore>> {
        let url = StoreUrl::new(&self.store).context("Invalid store URL")?;

        if let Some(root) = url.to_file_path() {
            info!(root = %root.display(), "Using file store");
            return Ok(Arc::new(FileStore::new(root)));
        }

        let Some(project) = &self.project else {
            bail!("--project (or MERGULHO_PROJECT) is required for a Firestore store");
        };

        let mut config = FirestoreConfig::new(url, project)
            .with_database(&self.database)
            .with_timeout(Duration::from_secs(self.timeout));
        if let Some(token) = &self.token {
            config = config.with_token(token);
        }
        info!(
            endpoint = %config.endpoint,
            project = %config.project_id,
            database = %config.database_id,
            timeout = ?config.timeout,
            "Using Firestore store"
        );

        let store = FirestoreStore::new(config).context("Failed to create Firestore client")?;
        Ok(Arc::new(store))
    }
}
