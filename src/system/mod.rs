//! # System Interaction Layer
//!
//! This module provides abstractions for interacting with the underlying
//! operating system. It is the boundary between orchestration logic and the
//! specifics of process management.
//!
//! ## Modules
//!
//! - **`executor`**: spawns external tools to completion, either capturing
//!   their exit code as data (`run_status`) or treating any non-zero code as
//!   an error (`run_checked`).
//! - **`service`**: lifecycle of the background selenium server — launch with
//!   log redirection, bounded readiness polling, and owned-handle teardown.

pub mod executor;
pub mod service;
