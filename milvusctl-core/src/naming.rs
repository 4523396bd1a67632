//! Canonical resource naming for projects.
//!
//! A project maps onto three Milvus resources (a database, a role, and a
//! user) whose names default to fixed templates over the project name.
//! Naming is resolved once per command invocation and never consults live
//! service state; collisions are detected later by the reconciler.

use zeroize::Zeroizing;

/// Resolved names for the resources of one project.
///
/// # Security
/// The user password is held in a [`Zeroizing`] container so it is cleared
/// from memory on drop, and it is redacted from the `Debug` representation.
/// It is never logged or echoed by any consumer of this type.
#[derive(Clone)]
pub struct ResourceNaming {
    /// Project identifier the names were derived from
    pub project_name: String,
    /// Database name, `db_<project>` unless overridden
    pub database_name: String,
    /// Role name, `role_<project>` unless overridden
    pub role_name: String,
    /// User name, `user_<project>` unless overridden
    pub user_name: String,
    user_password: Zeroizing<String>,
}

impl ResourceNaming {
    /// Resolves default names for a project with no overrides and no
    /// password set yet.
    pub fn for_project(project_name: &str) -> Self {
        Self {
            project_name: project_name.to_string(),
            database_name: format!("db_{}", project_name),
            role_name: format!("role_{}", project_name),
            user_name: format!("user_{}", project_name),
            user_password: Zeroizing::new(String::new()),
        }
    }

    /// Builder method to override the database name.
    pub fn with_database_name(mut self, database_name: String) -> Self {
        self.database_name = database_name;
        self
    }

    /// Builder method to override the role name.
    pub fn with_role_name(mut self, role_name: String) -> Self {
        self.role_name = role_name;
        self
    }

    /// Builder method to override the user name.
    pub fn with_user_name(mut self, user_name: String) -> Self {
        self.user_name = user_name;
        self
    }

    /// Builder method to set the user password.
    pub fn with_password(mut self, password: String) -> Self {
        self.user_password = Zeroizing::new(password);
        self
    }

    /// Fills in the password after construction (interactive prompt path).
    pub fn set_password(&mut self, password: String) {
        self.user_password = Zeroizing::new(password);
    }

    /// Gets the password (still protected by Zeroizing at rest).
    pub fn password(&self) -> &str {
        &self.user_password
    }

    /// Checks if a password has been provided without exposing it.
    pub fn has_password(&self) -> bool {
        !self.user_password.is_empty()
    }
}

impl std::fmt::Debug for ResourceNaming {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceNaming")
            .field("project_name", &self.project_name)
            .field("database_name", &self.database_name)
            .field("role_name", &self.role_name)
            .field("user_name", &self.user_name)
            .field("user_password", &"<redacted>")
            .finish()
    }
}
