//! Integration tests for the vcfsplit binary.
//!
//! These tests run the compiled binary end to end, feeding VCF text on standard input and
//! checking the part files and standard output it produces.

mod test_error_paths;
mod test_ordering;
mod test_split_command;
