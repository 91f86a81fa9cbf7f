//! k8s-image-lister - container images referenced by Kubernetes manifests
//!
//! This crate reads Kubernetes manifests (YAML or JSON, files or pasted
//! text) and lists every container and init-container image they reference,
//! attributed to the resource, namespace and source it came from.

pub mod config;
pub mod extract;
pub mod file_types;
pub mod parsers;
pub mod reports;
pub mod sources;
pub mod utils;
