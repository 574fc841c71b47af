//! Split an uncompressed VCF on standard input into BGZF-compressed parts.
//!
//! Every part carries the full input header, so each one is a standalone VCF that can be
//! processed independently (for example, annotated in parallel) and later concatenated.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use log::{debug, info};
use vcfsplit_lib::SplitError;
use vcfsplit_lib::batch::BYTES_PER_MB;
use vcfsplit_lib::logging::format_count;
use vcfsplit_lib::range::CoordinateRange;
use vcfsplit_lib::splitter::{DEFAULT_LINES_PER_PART, SplitOptions, run};

use crate::commands::command::Command;

/// Split a VCF stream into parts.
#[derive(Debug, Parser)]
#[command(
    name = "vcfsplit",
    version,
    styles = crate::STYLES,
    about = "\x1b[36mSplit an uncompressed VCF on stdin into BGZF parts, each with the full header\x1b[0m",
    long_about = r#"
Split an uncompressed VCF read from standard input into BGZF-compressed parts.

Parts are written to <PREFIX>000000.vcf.gz, <PREFIX>000001.vcf.gz, ... and each one starts
with the complete input header. The path of each part is printed on standard output as soon
as it has been written; progress messages go to standard error.

Part files are never overwritten. If a part file already exists the run fails; delete the
old parts first.

SIZING:

  By default each part holds at most --lines records. With --mb, parts are instead cut once
  they reach that many megabytes of uncompressed records (the record that crosses the limit
  is kept). A single record larger than the limit gets a part of its own.

ORDERING:

  With more than one thread, parts finish out of order and are reported as they finish.
  Use --part-column to print each part's index next to its path, or --ordered to report
  parts strictly in index order.

EXAMPLES:

  # Split into parts of 100,000 records
  vcfsplit -l 100000 chunks/calls. < calls.vcf

  # Split into ~64 MB parts using 8 writer threads
  zcat calls.vcf.gz | vcfsplit --mb 64 -t 8 chunks/calls.

  # Only keep chr20:1,000,000-2,000,000
  vcfsplit -r chr20:1000000-2000000 chunks/chr20. < calls.vcf
"#
)]
pub struct Split {
    /// Output path prefix; parts are named <PREFIX><index:06>.vcf.gz.
    #[arg(value_name = "PREFIX")]
    pub prefix: PathBuf,

    /// Maximum number of records per part.
    #[arg(short = 'l', long = "lines", default_value_t = DEFAULT_LINES_PER_PART,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub lines: u64,

    /// Target megabytes per part before compression; overrides --lines when positive.
    #[arg(long = "mb", alias = "MB", default_value_t = 0)]
    pub mb: u64,

    /// Maximum number of parts written concurrently.
    #[arg(short = 't', short_alias = '@', long = "threads", default_value_t = 1,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub threads: u64,

    /// Append a tab and the zero-padded part index to each line on standard output.
    #[arg(long = "part-column")]
    pub part_column: bool,

    /// Do not log per-part progress or the final summary.
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Only keep records within chrom:begin-end (1-based, inclusive).
    #[arg(short = 'r', long = "range", value_name = "CHROM:BEGIN-END", value_parser = parse_range)]
    pub range: Option<RangeArg>,

    /// Report parts on standard output in index order rather than completion order.
    #[arg(long = "ordered")]
    pub ordered: bool,
}

/// A parsed `--range` value; an empty string disables filtering.
#[derive(Debug, Clone)]
pub struct RangeArg(Option<CoordinateRange>);

fn parse_range(s: &str) -> Result<RangeArg, String> {
    if s.is_empty() {
        return Ok(RangeArg(None));
    }
    s.parse::<CoordinateRange>().map(|r| RangeArg(Some(r))).map_err(|e| e.to_string())
}

impl Split {
    /// Build library options from the parsed arguments.
    fn options(&self) -> Result<SplitOptions> {
        let threads = usize::try_from(self.threads).context("--threads is too large")?;
        Ok(SplitOptions::new(self.prefix.clone())
            .with_lines(self.lines)
            .with_mb(self.mb)
            .with_threads(threads)
            .with_part_column(self.part_column)
            .with_quiet(self.quiet)
            .with_ordered(self.ordered)
            .with_range(self.range.as_ref().and_then(|r| r.0.clone())))
    }
}

/// Refuse to run when standard input is an interactive terminal.
fn check_input(is_terminal: bool) -> Result<(), SplitError> {
    if is_terminal {
        let usage = Split::command().render_usage();
        return Err(SplitError::Usage(format!(
            "refusing to read a VCF from a terminal; pipe or redirect it to standard input\n\n{usage}"
        )));
    }
    Ok(())
}

impl Command for Split {
    fn execute(&self, command_line: &str) -> Result<()> {
        let stdin = io::stdin();
        check_input(stdin.is_terminal())?;

        let options = self.options()?;
        options.validate()?;
        debug!("Command line: {command_line}");
        if !self.quiet {
            if let Some(range) = &options.range {
                info!("Keeping only records in {range}");
            }
            if options.mb > 0 {
                info!("Cutting parts at {} MB of records", format_count(options.mb));
                debug!("Byte limit per part: {}", options.mb.saturating_mul(BYTES_PER_MB));
            } else {
                info!("Cutting parts at {} records", format_count(options.lines));
            }
        }

        run(stdin.lock(), &options, io::stdout())
            .with_context(|| format!("Failed to split VCF into {}*", options.prefix.display()))?;
        Ok(())
    }
}
