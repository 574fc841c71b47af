//! End-to-end tests of splitting behaviour.

use rstest::rstest;
use tempfile::TempDir;

use crate::helpers::{
    TEST_HEADER, VcfBuilder, assert_bgzf_eof, assert_success, count_records, part_body,
    part_path, prefix_in, read_part, run_vcfsplit, simple_vcf, stderr_text, stdout_lines,
};

#[test]
fn test_two_records_per_part() {
    let temp_dir = TempDir::new().unwrap();
    let prefix = prefix_in(temp_dir.path(), "prefix");
    let header = "##A\n##B\n#CHROM\tPOS\n";
    let input = format!("{header}chr1\t10\nchr1\t20\nchr1\t30\n");

    let output = run_vcfsplit(&["--lines", "2", "--quiet", &prefix], input.as_bytes());
    assert_success(&output);

    assert_eq!(part_body(&prefix, 0, header), "chr1\t10\nchr1\t20\n");
    assert_eq!(part_body(&prefix, 1, header), "chr1\t30\n");
    assert!(!part_path(&prefix, 2).exists());

    let mut lines = stdout_lines(&output);
    lines.sort();
    assert_eq!(
        lines,
        vec![
            part_path(&prefix, 0).display().to_string(),
            part_path(&prefix, 1).display().to_string()
        ]
    );
}

#[test]
fn test_range_filter() {
    let temp_dir = TempDir::new().unwrap();
    let prefix = prefix_in(temp_dir.path(), "prefix");
    let header = "##A\n##B\n#CHROM\tPOS\n";
    let input = format!("{header}chr1\t10\nchr1\t20\nchr1\t30\n");

    let output = run_vcfsplit(&["--range", "chr1:15-25", "-q", &prefix], input.as_bytes());
    assert_success(&output);

    assert_eq!(stdout_lines(&output).len(), 1);
    assert_eq!(part_body(&prefix, 0, header), "chr1\t20\n");
    assert!(!part_path(&prefix, 1).exists());
}

#[test]
fn test_range_matching_nothing_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let prefix = prefix_in(temp_dir.path(), "prefix");
    let input = simple_vcf(20);

    let output = run_vcfsplit(&["-r", "chr2:1-1000", "-q", &prefix], input.as_bytes());
    assert_success(&output);
    assert!(stdout_lines(&output).is_empty());
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[rstest]
#[case::one_thread("1")]
#[case::four_threads("4")]
fn test_ten_records_three_per_part(#[case] threads: &str) {
    let temp_dir = TempDir::new().unwrap();
    let prefix = prefix_in(temp_dir.path(), "chunk.");
    let vcf = VcfBuilder::new().records("chr1", 1..=10);

    let output =
        run_vcfsplit(&["-l", "3", "-t", threads, "-q", &prefix], vcf.build().as_bytes());
    assert_success(&output);
    assert_eq!(stdout_lines(&output).len(), 4);

    let bodies: Vec<String> = (0..4).map(|i| part_body(&prefix, i, TEST_HEADER)).collect();
    let sizes: Vec<usize> = bodies.iter().map(|b| count_records(b)).collect();
    assert_eq!(sizes, vec![3, 3, 3, 1]);
    assert_eq!(bodies.concat(), vcf.body());
    for i in 0..4 {
        assert_bgzf_eof(&part_path(&prefix, i));
    }
}

#[test]
fn test_megabyte_parts() {
    let temp_dir = TempDir::new().unwrap();
    let prefix = prefix_in(temp_dir.path(), "mb");
    // ~100 bytes per record, ~2.4 MiB in total.
    let filler = "X".repeat(80);
    let mut vcf = VcfBuilder::new();
    for pos in 1..=25_000 {
        vcf = vcf.raw_line(&format!("chr1\t{pos}\t.\tA\tG\t.\t.\t{filler}\n"));
    }

    let output = run_vcfsplit(&["--mb", "1", "-t", "2", "-q", &prefix], vcf.build().as_bytes());
    assert_success(&output);

    let parts = stdout_lines(&output).len() as u64;
    assert_eq!(parts, 3);
    let mut body = String::new();
    for i in 0..parts {
        let part = part_body(&prefix, i, TEST_HEADER);
        if i + 1 < parts {
            // Each full part crosses 1 MiB by less than one record.
            assert!(part.len() >= 1_048_576 && part.len() < 1_048_576 + 120);
        }
        body.push_str(&part);
    }
    assert_eq!(body, vcf.body());
}

#[test]
fn test_mb_alias_overrides_lines() {
    let temp_dir = TempDir::new().unwrap();
    let prefix = prefix_in(temp_dir.path(), "p");
    let output = run_vcfsplit(&["--MB", "1", "-l", "1", "-q", &prefix], simple_vcf(5).as_bytes());
    assert_success(&output);
    assert_eq!(stdout_lines(&output).len(), 1);
    assert_eq!(count_records(&part_body(&prefix, 0, TEST_HEADER)), 5);
}

#[test]
fn test_every_part_is_a_complete_vcf() {
    let temp_dir = TempDir::new().unwrap();
    let prefix = prefix_in(temp_dir.path(), "p");
    let vcf = VcfBuilder::new().records("chr1", 1..=50).records("chr2", 1..=50);

    let output = run_vcfsplit(&["-l", "7", "-t", "3", "-q", &prefix], vcf.build().as_bytes());
    assert_success(&output);

    let parts = stdout_lines(&output).len() as u64;
    assert_eq!(parts, 15);
    for i in 0..parts {
        let contents = read_part(&part_path(&prefix, i));
        let header_lines = contents.lines().take_while(|l| l.starts_with('#')).count();
        assert_eq!(header_lines, TEST_HEADER.lines().count());
        assert!(contents.lines().skip(header_lines).all(|l| !l.starts_with('#')));
    }
}

#[test]
fn test_crlf_records_are_preserved() {
    let temp_dir = TempDir::new().unwrap();
    let prefix = prefix_in(temp_dir.path(), "p");
    let vcf = VcfBuilder::new().raw_line("chr1\t5\t.\tA\tG\r\n").raw_line("chr1\t6\t.\tA\tG\r\n");

    let output = run_vcfsplit(&["-r", "chr1:6-6", "-q", &prefix], vcf.build().as_bytes());
    assert_success(&output);
    assert_eq!(part_body(&prefix, 0, TEST_HEADER), "chr1\t6\t.\tA\tG\r\n");
}

#[test]
fn test_missing_final_newline_is_added() {
    let temp_dir = TempDir::new().unwrap();
    let prefix = prefix_in(temp_dir.path(), "p");
    let input = format!("{TEST_HEADER}chr1\t1\nchr1\t2");

    let output = run_vcfsplit(&["-q", &prefix], input.as_bytes());
    assert_success(&output);
    assert_eq!(part_body(&prefix, 0, TEST_HEADER), "chr1\t1\nchr1\t2\n");
}

#[test]
fn test_progress_is_logged_to_stderr() {
    let temp_dir = TempDir::new().unwrap();
    let prefix = prefix_in(temp_dir.path(), "p");
    let vcf = VcfBuilder::new().records("chr1", 1..=10).build();

    let output = run_vcfsplit(&["-l", "4", "-r", "chr1:1-8", &prefix], vcf.as_bytes());
    assert_success(&output);

    let stderr = stderr_text(&output);
    assert!(stderr.contains(&format!("wrote {}", part_path(&prefix, 0).display())));
    assert!(stderr.contains("MB before compression"));
    assert!(stderr.contains("wrote 2 parts with 8 records"));
    assert!(stderr.contains("(2 records range-skipped)"));
    // Standard output carries only part paths.
    assert!(stdout_lines(&output).iter().all(|l| l.ends_with(".vcf.gz")));
}

#[test]
fn test_quiet_suppresses_diagnostics() {
    let temp_dir = TempDir::new().unwrap();
    let prefix = prefix_in(temp_dir.path(), "p");

    let output = run_vcfsplit(&["-q", &prefix], simple_vcf(3).as_bytes());
    assert_success(&output);
    let stderr = stderr_text(&output);
    assert!(!stderr.contains("wrote"), "unexpected diagnostics: {stderr}");
}
