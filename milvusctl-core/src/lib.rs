//! Core provisioning logic for milvusctl.
//!
//! This crate implements the project resource lifecycle over a Milvus
//! deployment: a "project" is a {database, role, user} triple with a fixed
//! set of collection privileges, provisioned and torn down through the
//! service's administrative API. All state lives in the service: the
//! reconciler re-derives resource existence on every invocation and
//! persists nothing locally.
//!
//! # Security Guarantees
//! - Passwords are held in zeroized memory and never logged or echoed
//! - Connection URIs are sanitized in every error message
//! - The session's database context is restored on every exit path
//!
//! # Architecture
//! - [`admin`] is the boundary to the external service: an object-safe
//!   trait plus the REST implementation
//! - [`project`] is the reconciler driving that boundary
//! - [`password`] and [`naming`] are the pure leaves

pub mod admin;
pub mod database;
pub mod error;
pub mod logging;
pub mod naming;
pub mod password;
pub mod project;

// Re-export commonly used types
pub use admin::{DEFAULT_DATABASE, MilvusAdmin, MilvusRestClient, PrivilegeGrant, with_database};
pub use error::{MilvusCtlError, ResourceKind, Result, redact_uri};
pub use logging::init_logging;
pub use naming::ResourceNaming;
pub use password::{PasswordViolation, check_password_strength};
pub use project::{
    COLLECTION_PRIVILEGES, CreateReport, DescribeReport, DropReport, PROTECTED_ROLES,
    PROTECTED_USERS, change_user_password, create_resources, describe_resources, drop_resources,
};
