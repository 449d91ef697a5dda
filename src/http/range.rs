//! HTTP Range request module
//!
//! Single-range `bytes=` support (RFC 7233), used by media players that
//! seek inside large segments. Multi-range requests fall back to the full
//! body.

/// Inclusive byte range already clamped to the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes covered
    pub const fn length(self) -> u64 {
        self.end - self.start + 1
    }
}

/// What to send for a request's Range header
#[derive(Debug, PartialEq, Eq)]
pub enum RangeOutcome {
    /// No usable Range header: send the whole file (200)
    Full,
    /// Send this slice (206)
    Partial(ByteRange),
    /// Range lies outside the file (416)
    Unsatisfiable,
}

/// One `byte-range-spec` before it meets the file size
#[derive(Debug, PartialEq, Eq)]
enum RangeSpec {
    /// `first-last`
    Bounded(u64, u64),
    /// `first-`
    From(u64),
    /// `-count`
    Suffix(u64),
}

impl RangeSpec {
    fn parse(spec: &str) -> Option<Self> {
        let (first, last) = spec.split_once('-')?;
        let (first, last) = (first.trim(), last.trim());

        match (first.is_empty(), last.is_empty()) {
            (true, true) => None,
            (true, false) => last.parse().ok().map(Self::Suffix),
            (false, true) => first.parse().ok().map(Self::From),
            (false, false) => {
                let first: u64 = first.parse().ok()?;
                let last: u64 = last.parse().ok()?;
                // last < first is a syntax error, so the header is ignored
                (first <= last).then_some(Self::Bounded(first, last))
            }
        }
    }

    fn resolve(self, file_size: u64) -> RangeOutcome {
        let Some(last_byte) = file_size.checked_sub(1) else {
            return RangeOutcome::Unsatisfiable;
        };

        let range = match self {
            Self::Bounded(start, end) if start <= last_byte => ByteRange {
                start,
                end: end.min(last_byte),
            },
            Self::From(start) if start <= last_byte => ByteRange {
                start,
                end: last_byte,
            },
            Self::Suffix(count) if count > 0 => ByteRange {
                start: file_size.saturating_sub(count),
                end: last_byte,
            },
            _ => return RangeOutcome::Unsatisfiable,
        };
        RangeOutcome::Partial(range)
    }
}

/// Decide how to answer a request given its Range header and the file size
pub fn evaluate_range(range_header: Option<&str>, file_size: u64) -> RangeOutcome {
    let Some(specs) = range_header.and_then(|h| h.trim().strip_prefix("bytes=")) else {
        return RangeOutcome::Full;
    };

    if specs.contains(',') {
        return RangeOutcome::Full;
    }

    RangeSpec::parse(specs).map_or(RangeOutcome::Full, |spec| spec.resolve(file_size))
}
