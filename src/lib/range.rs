//! Coordinate range filtering of VCF records.
//!
//! A [`CoordinateRange`] is parsed from `chrom:begin-end` and tests whether a record's `CHROM`
//! and `POS` columns fall inside it. The check is best-effort: malformed records are simply
//! reported as out of range rather than treated as errors.

use std::fmt;
use std::str::FromStr;

use crate::errors::SplitError;

/// An inclusive genomic interval on one chromosome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinateRange {
    chrom: Vec<u8>,
    begin: u64,
    end: u64,
}

impl CoordinateRange {
    /// Build a range directly.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::InvalidRange`] if `chrom` is empty, `begin` is zero, or
    /// `end < begin`.
    pub fn new(chrom: &str, begin: u64, end: u64) -> Result<Self, SplitError> {
        let invalid = |reason: &str| SplitError::InvalidRange {
            range: format!("{chrom}:{begin}-{end}"),
            reason: reason.to_string(),
        };
        if chrom.is_empty() {
            return Err(invalid("chromosome name is empty"));
        }
        if begin == 0 {
            return Err(invalid("begin must be positive"));
        }
        if end < begin {
            return Err(invalid("end is before begin"));
        }
        Ok(Self { chrom: chrom.as_bytes().to_vec(), begin, end })
    }

    /// The chromosome name.
    #[must_use]
    pub fn chrom(&self) -> &[u8] {
        &self.chrom
    }

    /// Inclusive start position.
    #[must_use]
    pub fn begin(&self) -> u64 {
        self.begin
    }

    /// Inclusive end position.
    #[must_use]
    pub fn end(&self) -> u64 {
        self.end
    }

    /// Returns true if the record's first two tab-delimited fields are this chromosome and a
    /// position within `[begin, end]`.
    ///
    /// Returns false when the position is missing, empty, non-numeric or overflows `u64`.
    /// Fields after the second are never examined.
    #[must_use]
    pub fn contains(&self, line: &[u8]) -> bool {
        let mut fields = line.splitn(3, |&b| b == b'\t');
        let Some(chrom) = fields.next() else { return false };
        if chrom != self.chrom.as_slice() {
            return false;
        }
        match fields.next().and_then(parse_position) {
            Some(pos) => (self.begin..=self.end).contains(&pos),
            None => false,
        }
    }
}

/// Returns true if there is no range, or if `line` falls inside it.
#[inline]
#[must_use]
pub fn in_range(range: Option<&CoordinateRange>, line: &[u8]) -> bool {
    range.is_none_or(|r| r.contains(line))
}

/// Parse an unsigned base-10 position; leading zeros are fine, signs and blanks are not.
fn parse_position(field: &[u8]) -> Option<u64> {
    if field.is_empty() || !field.iter().all(u8::is_ascii_digit) {
        return None;
    }
    field.iter().try_fold(0u64, |acc, &d| acc.checked_mul(10)?.checked_add(u64::from(d - b'0')))
}

impl FromStr for CoordinateRange {
    type Err = SplitError;

    /// Parse `chrom:begin-end`. The chromosome is everything before the first `:`, and the
    /// coordinates are split at the first `-` after it.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| SplitError::InvalidRange {
            range: s.to_string(),
            reason: reason.to_string(),
        };

        let (chrom, coords) = s.split_once(':').ok_or_else(|| invalid("missing ':'"))?;
        let (begin, end) = coords.split_once('-').ok_or_else(|| invalid("missing '-'"))?;
        let begin =
            parse_position(begin.as_bytes()).ok_or_else(|| invalid("begin is not a number"))?;
        let end = parse_position(end.as_bytes()).ok_or_else(|| invalid("end is not a number"))?;

        CoordinateRange::new(chrom, begin, end).map_err(|e| match e {
            SplitError::InvalidRange { reason, .. } => invalid(&reason),
            other => other,
        })
    }
}

impl fmt::Display for CoordinateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", String::from_utf8_lossy(&self.chrom), self.begin, self.end)
    }
}
