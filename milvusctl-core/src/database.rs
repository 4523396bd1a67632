//! Database inventory listing.
//!
//! Enumerates every database on the deployment together with its
//! collections. Listing a database's collections can fail when the session
//! lacks privileges there; that is reported per database instead of
//! aborting the sweep.

use crate::admin::{MilvusAdmin, with_database};
use crate::error::Result;
use tracing::info;

/// One database and, when readable, its collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseInfo {
    /// Database name
    pub name: String,
    /// Collection names, or `None` when listing them was not permitted
    pub collections: Option<Vec<String>>,
}

/// Lists all databases and their collections.
///
/// # Errors
/// Fails only when the database list itself cannot be fetched; per-database
/// collection failures degrade to an unavailable entry.
pub async fn list_all(admin: &(impl MilvusAdmin + ?Sized)) -> Result<Vec<DatabaseInfo>> {
    let databases = admin.list_databases().await?;
    info!("Found {} databases:", databases.len());

    let mut inventory = Vec::with_capacity(databases.len());
    for database in databases {
        info!("Database: {}", database);
        let collections =
            with_database(admin, &database, async || admin.list_collections().await).await;
        match collections {
            Ok(collections) => {
                info!("  Collections: {:?}", collections);
                inventory.push(DatabaseInfo {
                    name: database,
                    collections: Some(collections),
                });
            }
            Err(_) => {
                info!("  Collections: Unable to list (insufficient privileges)");
                inventory.push(DatabaseInfo {
                    name: database,
                    collections: None,
                });
            }
        }
    }

    Ok(inventory)
}
