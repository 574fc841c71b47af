//! Error path integration tests.
//!
//! These tests verify that invalid arguments, malformed input and pre-existing output files
//! make the binary exit with a failure and a useful message.

use rstest::rstest;
use tempfile::TempDir;

use crate::helpers::{
    TEST_HEADER, assert_failure, assert_success, part_path, prefix_in, run_vcfsplit, simple_vcf,
    stderr_text, stdout_lines,
};

#[test]
fn test_existing_part_file_is_not_overwritten() {
    let temp_dir = TempDir::new().unwrap();
    let prefix = prefix_in(temp_dir.path(), "prefix");
    let existing = part_path(&prefix, 0);
    std::fs::write(&existing, b"precious").unwrap();

    let output = run_vcfsplit(&["-q", &prefix], simple_vcf(3).as_bytes());
    assert_failure(&output);

    let stderr = stderr_text(&output);
    assert!(stderr.contains(&existing.display().to_string()), "stderr: {stderr}");
    assert!(stderr.contains("delete it if it already exists"), "stderr: {stderr}");
    assert_eq!(std::fs::read(&existing).unwrap(), b"precious");
    assert!(stdout_lines(&output).is_empty());
}

#[test]
fn test_existing_later_part_stops_the_run() {
    let temp_dir = TempDir::new().unwrap();
    let prefix = prefix_in(temp_dir.path(), "prefix");
    std::fs::write(part_path(&prefix, 2), b"old").unwrap();

    let output = run_vcfsplit(&["-l", "1", "-q", &prefix], simple_vcf(10).as_bytes());
    assert_failure(&output);
    assert!(stderr_text(&output).contains("prefix000002.vcf.gz"));
    // Parts after the failure are never started.
    assert!(!part_path(&prefix, 9).exists());
}

#[rstest]
#[case::no_colon("chrX")]
#[case::no_dash("chr1:100")]
#[case::zero_begin("chr1:0-10")]
#[case::end_before_begin("chr1:20-10")]
#[case::not_a_number("chr1:a-b")]
fn test_invalid_range_is_rejected(#[case] range: &str) {
    let temp_dir = TempDir::new().unwrap();
    let prefix = prefix_in(temp_dir.path(), "prefix");

    let output = run_vcfsplit(&["--range", range, &prefix], simple_vcf(3).as_bytes());
    assert_failure(&output);
    assert!(stderr_text(&output).contains("chr:beg-end"));
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[rstest]
#[case::zero_lines(&["--lines", "0"])]
#[case::zero_threads(&["--threads", "0"])]
#[case::negative_lines(&["--lines", "-5"])]
#[case::unknown_flag(&["--bogus"])]
fn test_invalid_arguments(#[case] args: &[&str]) {
    let temp_dir = TempDir::new().unwrap();
    let prefix = prefix_in(temp_dir.path(), "prefix");
    let mut all_args = args.to_vec();
    all_args.push(&prefix);

    let output = run_vcfsplit(&all_args, simple_vcf(3).as_bytes());
    assert_failure(&output);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_missing_prefix() {
    let output = run_vcfsplit(&[], simple_vcf(3).as_bytes());
    assert_failure(&output);
    assert!(stderr_text(&output).contains("PREFIX"));
}

#[test]
fn test_header_only_input_is_premature_eof() {
    let temp_dir = TempDir::new().unwrap();
    let prefix = prefix_in(temp_dir.path(), "prefix");

    let output = run_vcfsplit(&[&prefix], TEST_HEADER.as_bytes());
    assert_failure(&output);
    assert!(stderr_text(&output).contains("Premature EOF while reading VCF header"));
    assert!(!part_path(&prefix, 0).exists());
}

#[test]
fn test_empty_input_is_premature_eof() {
    let temp_dir = TempDir::new().unwrap();
    let prefix = prefix_in(temp_dir.path(), "prefix");

    let output = run_vcfsplit(&[&prefix], b"");
    assert_failure(&output);
    assert!(stderr_text(&output).contains("Premature EOF"));
}

#[test]
fn test_input_without_header_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let prefix = prefix_in(temp_dir.path(), "prefix");

    let output = run_vcfsplit(&[&prefix], b"chr1\t1\nchr1\t2\n");
    assert_failure(&output);
    assert!(stderr_text(&output).contains("does not begin with a VCF header"));
}

#[test]
fn test_header_then_blank_line_is_a_valid_split() {
    let temp_dir = TempDir::new().unwrap();
    let prefix = prefix_in(temp_dir.path(), "prefix");
    let input = format!("{TEST_HEADER}\n");

    let output = run_vcfsplit(&["-q", &prefix], input.as_bytes());
    assert_success(&output);
    assert_eq!(stdout_lines(&output).len(), 1);
}
