//! # Core Orchestration Logic
//!
//! Environment provisioning gated by the version stamp, post-provisioning
//! sanity checks, per-project configuration, and the local-settings swap used
//! around the host-application suite.

pub mod config_file;
pub mod provision;
pub mod sanity;
pub mod settings;
