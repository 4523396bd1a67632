//! Administrative session boundary for the Milvus service.
//!
//! This module defines the trait every administrative client must implement
//! for the reconciler to drive it, plus the scoped database-context helper
//! that guarantees the session's active database is restored on every exit
//! path. The real implementation lives in [`rest`]; tests substitute an
//! in-memory one.

use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod rest;

pub use rest::MilvusRestClient;

/// Name of the service's built-in default database.
///
/// Every session starts in this context, and every procedure that switches
/// away from it is responsible for switching back.
pub const DEFAULT_DATABASE: &str = "default";

/// A single privilege grant attached to a role.
///
/// Serializes with the field names the Milvus administrative API uses
/// (`objectType`, `objectName`, `privilege`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivilegeGrant {
    /// Object type the grant applies to, e.g. "Collection"
    pub object_type: String,
    /// Object name, `*` for all objects of the type
    pub object_name: String,
    /// The granted action, e.g. "Insert"
    pub privilege: String,
}

impl PrivilegeGrant {
    /// Creates a collection-scoped grant over all collections (`*`).
    pub fn collection(privilege: &str) -> Self {
        Self {
            object_type: "Collection".to_string(),
            object_name: "*".to_string(),
            privilege: privilege.to_string(),
        }
    }
}

/// Administrative capabilities of a Milvus session.
///
/// The reconciler holds no state of its own: resource existence is always
/// re-derived through these calls. All operations are sequential: each one
/// completes before the next is issued, and every failure surfaces as an
/// error value.
///
/// # Object Safety
/// This trait is object-safe, allowing for dynamic dispatch through
/// `Box<dyn MilvusAdmin>` or `&dyn MilvusAdmin`.
///
/// # Context
/// User, role, and collection calls operate inside the session's active
/// database. Use [`with_database`] rather than calling [`use_database`]
/// directly so the default context is restored on every exit path.
///
/// [`use_database`]: MilvusAdmin::use_database
#[async_trait]
pub trait MilvusAdmin: Send + Sync {
    /// Lists all database names visible to the session.
    async fn list_databases(&self) -> Result<Vec<String>>;

    /// Creates a database.
    async fn create_database(&self, name: &str) -> Result<()>;

    /// Drops a database. Must be issued from outside the database's own
    /// context; the service will not drop the active database.
    async fn drop_database(&self, name: &str) -> Result<()>;

    /// Lists user names in the active database context.
    async fn list_users(&self) -> Result<Vec<String>>;

    /// Creates a user with the given password.
    async fn create_user(&self, name: &str, password: &str) -> Result<()>;

    /// Drops a user.
    async fn drop_user(&self, name: &str) -> Result<()>;

    /// Updates a user's password. The service verifies the old password;
    /// callers do not re-validate it.
    async fn update_password(&self, name: &str, old_password: &str, new_password: &str)
    -> Result<()>;

    /// Lists role names in the active database context.
    async fn list_roles(&self) -> Result<Vec<String>>;

    /// Creates a role.
    async fn create_role(&self, name: &str) -> Result<()>;

    /// Drops a role. Roles with outstanding privilege grants cannot be
    /// removed; revoke them first.
    async fn drop_role(&self, name: &str) -> Result<()>;

    /// Returns every privilege currently granted to a role.
    async fn describe_role(&self, name: &str) -> Result<Vec<PrivilegeGrant>>;

    /// Grants one privilege to a role.
    async fn grant_privilege(&self, role: &str, grant: &PrivilegeGrant) -> Result<()>;

    /// Revokes one privilege from a role.
    async fn revoke_privilege(&self, role: &str, grant: &PrivilegeGrant) -> Result<()>;

    /// Grants a role to a user.
    async fn grant_role(&self, user: &str, role: &str) -> Result<()>;

    /// Lists collection names in the active database context.
    async fn list_collections(&self) -> Result<Vec<String>>;

    /// Switches the session's active database context.
    async fn use_database(&self, name: &str) -> Result<()>;

    /// Reports the session's active database context.
    fn active_database(&self) -> String;

    /// Checks database existence by membership in the database list.
    async fn database_exists(&self, name: &str) -> Result<bool> {
        Ok(self.list_databases().await?.iter().any(|db| db == name))
    }

    /// Checks user existence in the active database context.
    async fn user_exists(&self, name: &str) -> Result<bool> {
        Ok(self.list_users().await?.iter().any(|user| user == name))
    }

    /// Checks role existence in the active database context.
    async fn role_exists(&self, name: &str) -> Result<bool> {
        Ok(self.list_roles().await?.iter().any(|role| role == name))
    }
}

/// Runs an operation inside a database context and always restores the
/// default context afterwards.
///
/// This is the scoped-acquisition discipline for the one piece of shared
/// mutable session state: the active database. The restore runs on every
/// exit path, whether the operation succeeded or failed. When both the
/// operation and the restore fail, the
/// operation's error wins.
///
/// # Errors
/// Returns the operation's error, or the restore error if the operation
/// succeeded but the context could not be switched back.
pub async fn with_database<A, T, F>(admin: &A, database: &str, op: F) -> Result<T>
where
    A: MilvusAdmin + ?Sized,
    F: AsyncFnOnce() -> Result<T>,
{
    admin.use_database(database).await?;
    let result = op().await;
    let restore = admin.use_database(DEFAULT_DATABASE).await;
    match (result, restore) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(restore_err)) => Err(restore_err),
        (Err(op_err), _) => Err(op_err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_grant_shape() {
        let grant = PrivilegeGrant::collection("Insert");
        assert_eq!(grant.object_type, "Collection");
        assert_eq!(grant.object_name, "*");
        assert_eq!(grant.privilege, "Insert");
    }

    #[test]
    fn test_privilege_grant_wire_field_names() {
        let grant = PrivilegeGrant::collection("Search");
        let value = serde_json::to_value(&grant).expect("serializable");

        assert_eq!(value["objectType"], "Collection");
        assert_eq!(value["objectName"], "*");
        assert_eq!(value["privilege"], "Search");
    }

    #[test]
    fn test_privilege_grant_decodes_api_shape() {
        let grant: PrivilegeGrant = serde_json::from_str(
            r#"{"objectType":"Collection","objectName":"*","privilege":"Flush"}"#,
        )
        .expect("decodable");

        assert_eq!(grant, PrivilegeGrant::collection("Flush"));
    }
}
