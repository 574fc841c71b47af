//! CLI command implementations for vcfsplit.
//!
//! - [`split`] - Split a VCF on standard input into BGZF parts

pub mod command;
pub mod split;
