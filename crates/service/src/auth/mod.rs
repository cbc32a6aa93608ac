//! Accounts and sessions: domain types, a repository seam and the
//! framework-independent service that hashes passwords and signs tokens.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::{AuthConfig, AuthService};
