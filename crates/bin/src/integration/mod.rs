//! Wiring between the member crates: loading, panel assembly, and the
//! standard regime configuration used by every subcommand.

pub mod data_pipeline;
