//! # Command-Line Interface Layer
//!
//! Turns the raw argument list into an immutable [`args::Config`], selects the
//! single terminal [`dispatcher::Action`] for the run, and routes it to the
//! matching handler.

pub mod args;
pub mod dispatcher;
pub mod handlers;
