//! # kiln-core
//!
//! Core types and error types for Kiln.
//!
//! This crate provides the foundational types shared across all Kiln crates:
//! - Artifact descriptors and build reports
//! - Environment descriptors and install modes
//! - Project root discovery
//! - Cross-cutting error types

pub mod artifact;
pub mod environment;
pub mod errors;
pub mod project;

pub use artifact::{ArtifactDescriptor, ArtifactKind, BuildReport};
pub use environment::{EnvDescriptor, EnvPurpose, InstallMode, InstalledPackage};
pub use errors::CoreError;
pub use project::{KILN_DIR_NAME, MANIFEST_FILE_NAME, VERSION_FILE_NAME, find_project_root};
