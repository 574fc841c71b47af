//! Concurrency and standard-output ordering tests.

use std::collections::HashSet;

use rstest::rstest;
use tempfile::TempDir;

use crate::helpers::{
    TEST_HEADER, VcfBuilder, assert_success, count_records, part_body, part_path, prefix_in,
    run_vcfsplit, stdout_lines,
};

/// Enough records that several workers overlap.
fn many_records() -> VcfBuilder {
    VcfBuilder::new().records("chr1", 1..=3000).records("chr2", 1..=3000)
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(8)]
fn test_every_part_reported_exactly_once(#[case] threads: usize) {
    let temp_dir = TempDir::new().unwrap();
    let prefix = prefix_in(temp_dir.path(), "p");
    let vcf = many_records();
    let threads = threads.to_string();

    let output = run_vcfsplit(&["-l", "250", "-t", &threads, "-q", &prefix], vcf.build().as_bytes());
    assert_success(&output);

    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 24);
    let unique: HashSet<&String> = lines.iter().collect();
    assert_eq!(unique.len(), 24, "duplicate stdout lines: {lines:?}");
    for i in 0..24 {
        assert!(unique.contains(&part_path(&prefix, i).display().to_string()));
    }

    let body: String = (0..24).map(|i| part_body(&prefix, i, TEST_HEADER)).collect();
    assert_eq!(body, vcf.body());
}

#[test]
fn test_part_column() {
    let temp_dir = TempDir::new().unwrap();
    let prefix = prefix_in(temp_dir.path(), "p");

    let output = run_vcfsplit(
        &["-l", "500", "-t", "4", "--part-column", "-q", &prefix],
        many_records().build().as_bytes(),
    );
    assert_success(&output);

    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 12);
    for line in &lines {
        let (path, index) = line.split_once('\t').expect("line should have two columns");
        assert_eq!(index.len(), 6);
        let index: u64 = index.parse().unwrap();
        assert_eq!(path, part_path(&prefix, index).display().to_string());
        assert_eq!(count_records(&part_body(&prefix, index, TEST_HEADER)), 500);
    }
}

#[test]
fn test_ordered_output() {
    let temp_dir = TempDir::new().unwrap();
    let prefix = prefix_in(temp_dir.path(), "p");

    let output = run_vcfsplit(
        &["-l", "100", "-t", "6", "--ordered", "-q", &prefix],
        many_records().build().as_bytes(),
    );
    assert_success(&output);

    let expected: Vec<String> = (0..60).map(|i| part_path(&prefix, i).display().to_string()).collect();
    assert_eq!(stdout_lines(&output), expected);
}

#[test]
fn test_ordered_output_with_part_column() {
    let temp_dir = TempDir::new().unwrap();
    let prefix = prefix_in(temp_dir.path(), "p");

    let output = run_vcfsplit(
        &["-l", "1000", "-t", "3", "--ordered", "--part-column", "-q", &prefix],
        many_records().build().as_bytes(),
    );
    assert_success(&output);

    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 6);
    for (i, line) in lines.iter().enumerate() {
        assert!(line.ends_with(&format!("\t{i:06}")), "line {i} is {line}");
    }
}
