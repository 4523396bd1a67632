//! Project resource lifecycle reconciliation.
//!
//! A project is the triple {database, role, user} named by
//! [`ResourceNaming`]. The procedures here compare that desired shape with
//! live service state and issue the minimal create/drop/grant calls to reach
//! it: `create_resources` provisions the triple, `describe_resources`
//! reports it, `drop_resources` removes it, and `change_user_password`
//! rotates the user's credential.
//!
//! There are no retries and no rollback on partial failure: each step either
//! succeeds or aborts the remainder of the procedure. The one guaranteed
//! cleanup is the active-database context restore, which runs on every exit
//! path via [`with_database`].

use crate::admin::{MilvusAdmin, PrivilegeGrant, with_database};
use crate::error::{MilvusCtlError, ResourceKind, Result};
use crate::naming::ResourceNaming;
use tracing::info;

/// Collection-level privileges granted to every newly created project role,
/// each scoped to object type "Collection" with object name `*`.
pub const COLLECTION_PRIVILEGES: [&str; 7] = [
    "CreateIndex",
    "Load",
    "Insert",
    "Delete",
    "Search",
    "Query",
    "Flush",
];

/// Users that drop must never remove.
pub const PROTECTED_USERS: [&str; 1] = ["root"];

/// Built-in roles that drop must never remove.
pub const PROTECTED_ROLES: [&str; 2] = ["admin", "public"];

/// Pre-invocation state of one resource touched by `create_resources`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceOutcome {
    /// Resolved resource name
    pub name: String,
    /// Whether the resource existed before this invocation
    pub existed: bool,
}

/// Per-resource outcome of a create invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateReport {
    pub database: ResourceOutcome,
    pub user: ResourceOutcome,
    pub role: ResourceOutcome,
}

/// Privileges granted through one role, as reported by describe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePrivileges {
    pub role_name: String,
    pub grants: Vec<PrivilegeGrant>,
}

/// Privilege view for one user of the project database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPrivileges {
    pub user_name: String,
    pub roles: Vec<RolePrivileges>,
}

/// Read-only snapshot of a project's resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeReport {
    pub database_name: String,
    pub database_exists: bool,
    pub role_name: String,
    pub role_exists: bool,
    pub collections: Vec<String>,
    pub users: Vec<UserPrivileges>,
}

/// Outcome of a drop invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropReport {
    pub database_name: String,
    pub database_existed: bool,
    pub dropped_users: Vec<String>,
    pub dropped_roles: Vec<String>,
}

/// Formats a resource status line with consistent symbols and indentation.
///
/// Green `✓` marks an existing resource, red `×` an absent one.
fn format_resource_status(name: &str, exists: bool, resource_type: &str) -> String {
    let (symbol, color) = if exists { ("✓", "32") } else { ("×", "31") };
    format!("  \x1b[{}m{}\x1b[0m {}: {}", color, symbol, resource_type, name)
}

/// Revokes every privilege currently attached to a role.
///
/// Roles with outstanding grants cannot be dropped, so this always precedes
/// a role drop.
async fn revoke_all_privileges(admin: &(impl MilvusAdmin + ?Sized), role: &str) -> Result<()> {
    for grant in admin.describe_role(role).await? {
        admin.revoke_privilege(role, &grant).await?;
    }
    Ok(())
}

/// Grants the fixed collection privilege set to a newly created role.
async fn grant_collection_privileges(
    admin: &(impl MilvusAdmin + ?Sized),
    role: &str,
) -> Result<()> {
    info!("Granting privileges:");
    for privilege in COLLECTION_PRIVILEGES {
        admin
            .grant_privilege(role, &PrivilegeGrant::collection(privilege))
            .await?;
        info!("  • {} on Collection", privilege);
    }
    Ok(())
}

/// Creates the project's database, user, and role, granting the fixed
/// privilege set to a newly created role.
///
/// The database is checked first; user and role are checked inside the
/// project database context, where their namespaces live. A resource that
/// already exists fails with [`MilvusCtlError::ResourceExists`] immediately
/// unless `recreate` is set, in which case it is dropped and recreated.
/// Resources created before such a failure are left in place.
///
/// # Errors
/// Fails fast on the first conflicting resource, and propagates any
/// administrative failure. The default database context is restored on
/// every exit path.
pub async fn create_resources(
    admin: &(impl MilvusAdmin + ?Sized),
    naming: &ResourceNaming,
    recreate: bool,
) -> Result<CreateReport> {
    let database_existed = admin.database_exists(&naming.database_name).await?;

    info!("Project resources for '{}':", naming.project_name);
    info!("{}", "─".repeat(50));
    info!(
        "{}",
        format_resource_status(&naming.database_name, database_existed, "database")
    );

    if database_existed {
        if !recreate {
            return Err(MilvusCtlError::resource_exists(
                ResourceKind::Database,
                &naming.database_name,
            ));
        }
        admin.drop_database(&naming.database_name).await?;
        info!("  • Dropped database '{}'", naming.database_name);
    }
    admin.create_database(&naming.database_name).await?;
    info!("  • Created database");

    let (user, role) = with_database(admin, &naming.database_name, async || {
        let user_existed = admin.user_exists(&naming.user_name).await?;
        let role_existed = admin.role_exists(&naming.role_name).await?;

        info!(
            "{}",
            format_resource_status(&naming.user_name, user_existed, "user")
        );
        info!(
            "{}",
            format_resource_status(&naming.role_name, role_existed, "role")
        );

        if user_existed {
            if !recreate {
                return Err(MilvusCtlError::resource_exists(
                    ResourceKind::User,
                    &naming.user_name,
                ));
            }
            admin.drop_user(&naming.user_name).await?;
            info!("  • Dropped user '{}'", naming.user_name);
        }
        admin.create_user(&naming.user_name, naming.password()).await?;
        info!("  • Created user");

        if role_existed {
            if !recreate {
                return Err(MilvusCtlError::resource_exists(
                    ResourceKind::Role,
                    &naming.role_name,
                ));
            }
            revoke_all_privileges(admin, &naming.role_name).await?;
            admin.drop_role(&naming.role_name).await?;
            info!("  • Dropped role '{}'", naming.role_name);
        }
        admin.create_role(&naming.role_name).await?;
        info!("  • Created role");

        // Privilege state is owned by role creation: the grants run exactly
        // when the role was (re)created, never reconciled independently
        grant_collection_privileges(admin, &naming.role_name).await?;
        admin.grant_role(&naming.user_name, &naming.role_name).await?;
        info!(
            "Assigned role '{}' to user '{}'",
            naming.role_name, naming.user_name
        );

        Ok((
            ResourceOutcome {
                name: naming.user_name.clone(),
                existed: user_existed,
            },
            ResourceOutcome {
                name: naming.role_name.clone(),
                existed: role_existed,
            },
        ))
    })
    .await?;

    Ok(CreateReport {
        database: ResourceOutcome {
            name: naming.database_name.clone(),
            existed: database_existed,
        },
        user,
        role,
    })
}

/// Reports the resources and collections of a project and the privileges
/// visible to its users.
///
/// Read-only; resource names are derived from `project_name` with no
/// override support. When the project database does not exist the report
/// says so and nothing further is checked. When `user_name` is given only
/// that user is inspected, otherwise every user in the database is.
///
/// # Errors
/// Propagates administrative failures. The default database context is
/// restored before returning.
pub async fn describe_resources(
    admin: &(impl MilvusAdmin + ?Sized),
    project_name: &str,
    user_name: Option<&str>,
) -> Result<DescribeReport> {
    let naming = ResourceNaming::for_project(project_name);

    let database_exists = admin.database_exists(&naming.database_name).await?;

    info!("Project resources for '{}':", project_name);
    info!("{}", "─".repeat(50));
    info!(
        "{}",
        format_resource_status(&naming.database_name, database_exists, "database")
    );

    if !database_exists {
        info!("No additional information (database does not exist)");
        return Ok(DescribeReport {
            database_name: naming.database_name,
            database_exists: false,
            role_name: naming.role_name,
            role_exists: false,
            collections: Vec::new(),
            users: Vec::new(),
        });
    }

    with_database(admin, &naming.database_name, async || {
        let roles = admin.list_roles().await?;
        let role_exists = roles.iter().any(|role| role == &naming.role_name);
        let users = admin.list_users().await?;
        let collections = admin.list_collections().await?;

        info!(
            "{}",
            format_resource_status(&naming.role_name, role_exists, "role")
        );

        if collections.is_empty() {
            info!("No collections found in database");
        } else {
            info!("Collections:");
            for collection in &collections {
                info!("  • {}", collection);
            }
        }

        let users_to_check = match user_name {
            Some(user) => vec![user.to_string()],
            None => users,
        };

        let mut role_privileges = Vec::new();
        for role in &roles {
            let grants = admin.describe_role(role).await?;
            if !grants.is_empty() {
                role_privileges.push(RolePrivileges {
                    role_name: role.clone(),
                    grants,
                });
            }
        }

        let mut user_reports = Vec::new();
        for user in users_to_check {
            info!("User: {}", user);
            for role in &role_privileges {
                info!("  Role '{}':", role.role_name);
                for grant in &role.grants {
                    info!("    • {} on {}", grant.privilege, grant.object_type);
                }
            }
            user_reports.push(UserPrivileges {
                user_name: user,
                roles: role_privileges.clone(),
            });
        }

        Ok(DescribeReport {
            database_name: naming.database_name.clone(),
            database_exists: true,
            role_name: naming.role_name.clone(),
            role_exists,
            collections,
            users: user_reports,
        })
    })
    .await
}

/// Drops all resources associated with a project.
///
/// Inside the project database context every user except the protected
/// superuser and every role except the protected built-ins are removed,
/// each role's privileges revoked first. The database itself is dropped
/// last, from the default context; the service does not allow a database
/// to be dropped while it is active.
///
/// No confirmation is sought here; that is the command layer's concern.
///
/// # Errors
/// Propagates administrative failures uncaught. The default database
/// context is restored before the final database drop.
pub async fn drop_resources(
    admin: &(impl MilvusAdmin + ?Sized),
    project_name: &str,
    database_name: Option<&str>,
) -> Result<DropReport> {
    let database_name = match database_name {
        Some(name) => name.to_string(),
        None => ResourceNaming::for_project(project_name).database_name,
    };

    let database_existed = admin.database_exists(&database_name).await?;

    info!("Project resources for '{}':", project_name);
    info!("{}", "─".repeat(50));
    info!(
        "{}",
        format_resource_status(&database_name, database_existed, "database")
    );

    if !database_existed {
        info!("No resources to drop");
        return Ok(DropReport {
            database_name,
            database_existed: false,
            dropped_users: Vec::new(),
            dropped_roles: Vec::new(),
        });
    }

    let (dropped_users, dropped_roles) = with_database(admin, &database_name, async || {
        info!("Dropping resources:");

        let mut dropped_users = Vec::new();
        for user in admin.list_users().await? {
            if PROTECTED_USERS.contains(&user.as_str()) {
                continue;
            }
            admin.drop_user(&user).await?;
            info!("  • Dropped user '{}'", user);
            dropped_users.push(user);
        }

        let mut dropped_roles = Vec::new();
        for role in admin.list_roles().await? {
            if PROTECTED_ROLES.contains(&role.as_str()) {
                continue;
            }
            revoke_all_privileges(admin, &role).await?;
            admin.drop_role(&role).await?;
            info!("  • Dropped role '{}'", role);
            dropped_roles.push(role);
        }

        Ok((dropped_users, dropped_roles))
    })
    .await?;

    admin.drop_database(&database_name).await?;
    info!("  • Dropped database '{}'", database_name);

    Ok(DropReport {
        database_name,
        database_existed: true,
        dropped_users,
        dropped_roles,
    })
}

/// Changes the password of a project user.
///
/// The service itself verifies the old password; this routine only checks
/// that the project database and the user exist. Callers validate the new
/// password against the strength policy before invoking this.
///
/// # Errors
/// Returns [`MilvusCtlError::ResourceNotFound`] for a missing database or
/// user, and propagates administrative failures. The default database
/// context is restored even when the user check or the update fails.
pub async fn change_user_password(
    admin: &(impl MilvusAdmin + ?Sized),
    project_name: &str,
    user_name: &str,
    old_password: &str,
    new_password: &str,
) -> Result<()> {
    let database_name = ResourceNaming::for_project(project_name).database_name;

    if !admin.database_exists(&database_name).await? {
        return Err(MilvusCtlError::resource_not_found(
            ResourceKind::Database,
            &database_name,
        ));
    }

    with_database(admin, &database_name, async || {
        if !admin.user_exists(user_name).await? {
            return Err(MilvusCtlError::resource_not_found(
                ResourceKind::User,
                user_name,
            ));
        }
        admin
            .update_password(user_name, old_password, new_password)
            .await?;
        info!("Updated password for user '{}'", user_name);
        Ok(())
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_line_symbols_and_colors() {
        let existing = format_resource_status("db_acme", true, "database");
        assert_eq!(existing, "  \x1b[32m✓\x1b[0m database: db_acme");

        let absent = format_resource_status("db_acme", false, "database");
        assert_eq!(absent, "  \x1b[31m×\x1b[0m database: db_acme");
    }

    #[test]
    fn test_fixed_privilege_set() {
        assert_eq!(
            COLLECTION_PRIVILEGES,
            ["CreateIndex", "Load", "Insert", "Delete", "Search", "Query", "Flush"]
        );
    }

    #[test]
    fn test_protected_names() {
        assert!(PROTECTED_USERS.contains(&"root"));
        assert!(PROTECTED_ROLES.contains(&"admin"));
        assert!(PROTECTED_ROLES.contains(&"public"));
    }
}
