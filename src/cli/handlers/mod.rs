// src/cli/handlers/mod.rs

// One module per terminal action. Each exposes a `handle` function with the
// uniform signature expected by the dispatcher registry, returning the exit
// code the process should terminate with.

pub mod docs;
pub mod lint;
pub mod server;
pub mod style;
pub mod test;
