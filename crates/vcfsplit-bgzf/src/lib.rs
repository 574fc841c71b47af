#![deny(unsafe_code)]

//! BGZF (Blocked GZIP Format) writing for vcfsplit part files.
//!
//! - [`writer`] - Block compression into any [`std::io::Write`] using the `bgzf` crate,
//!   plus exclusive-create helpers for output files

pub mod writer;

pub use writer::{BGZF_EOF, BGZF_MAX_BLOCK_SIZE, BgzfWriter};
