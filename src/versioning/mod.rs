//! Versioning schemes for release tags
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌─────────────────┐     ┌─────────────────┐
//! │  VersioningApi  │◀────│ GitHub Actions  │────▶│  StrictEngine   │
//! │  (host facing)  │     │ (partial tags)  │     │ (semver rules)  │
//! └─────────────────┘     └─────────────────┘     └─────────────────┘
//!                                 │                        │
//!                                 ▼                        ▼
//!                         ┌─────────────────┐     ┌─────────────────┐
//!                         │     Parser      │     │  SemverCoerced  │
//!                         │  (precision)    │     │ (coerce, range) │
//!                         └─────────────────┘     └─────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`api`]: `VersioningApi` trait exposed to the host
//! - [`github_actions`]: precision-aware parser, comparator and compatibility check
//! - [`strict`]: `StrictEngine` trait for full semver operations
//! - [`semver_coerced`]: default strict engine over coerced input
//! - [`error`]: Error types for ordering operations

pub mod api;
pub mod error;
pub mod github_actions;
pub mod semver_coerced;
pub mod strict;

pub use api::{NewValueConfig, RangeStrategy, VersioningApi};
pub use error::VersioningError;
pub use github_actions::GitHubActionsVersioning;
pub use semver_coerced::SemverCoerced;
pub use strict::StrictEngine;
