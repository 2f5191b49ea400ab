//! Canonical timestamp parsing and formatting.
//!
//! Accepts the free-form timestamp variants a generation container's text may
//! contain and normalizes every one of them to the canonical form
//! `"D MMM YYYY HH:MM:SS"` (e.g. `"25 Aug 2025 02:30:47"`), the sole form used
//! for deduplication equality and filename prefixes.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// A timestamp string known to be in canonical form.
///
/// Constructed only through [`parse_any`] or [`parse_exact_canonical`], so
/// deduplication equality on canonical form is a type-level guarantee
/// rather than a convention callers must remember to uphold.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct CanonicalTimestamp(String);

impl CanonicalTimestamp {
    /// Wrap an already-canonical string without re-validating it.
    ///
    /// Used for round-tripping timestamps read back out of the Download Log,
    /// where re-validation on every load would be wasted work for data this
    /// process itself wrote.
    #[must_use]
    pub fn from_trusted(s: String) -> Self {
        Self(s)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A structured comparator for `start_from` matching. Only `Equals` is
/// implemented; `AtOrAfter` is reserved for a future extension and is
/// rejected at config-parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartFromComparator {
    Equals,
    AtOrAfter,
}

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

fn month_from_token(tok: &str) -> Option<&'static str> {
    if let Ok(n) = tok.parse::<u32>() {
        return (1..=12).contains(&n).then(|| MONTHS[(n - 1) as usize]);
    }
    let lower = tok.to_lowercase();
    MONTHS
        .iter()
        .find(|m| m.to_lowercase() == lower || lower.starts_with(&m.to_lowercase()))
        .copied()
}

struct Pattern {
    regex: Regex,
    /// Builds a canonical string from the regex captures, or `None` if the
    /// month token didn't resolve to a valid month.
    build: fn(&regex::Captures) -> Option<String>,
}

fn canon(day: &str, month_tok: &str, year: &str, h: &str, m: &str, s: &str) -> Option<String> {
    let month = month_from_token(month_tok)?;
    let day: u32 = day.parse().ok()?;
    let h: u32 = h.parse().ok()?;
    let m: u32 = m.parse().ok()?;
    let s: u32 = s.parse().ok()?;
    if day == 0 || day > 31 || h > 23 || m > 59 || s > 59 {
        return None;
    }
    Some(format!("{day} {month} {year} {h:02}:{m:02}:{s:02}"))
}

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static timestamp regex is valid")
}

static PATTERNS: Lazy<Vec<Pattern>> = Lazy::new(|| {
    vec![
        // "Creation Time" [: ] D MMM YYYY HH:MM:SS
        Pattern {
            regex: re(r"(?i)creation\s*time\s*[:\s]\s*(\d{1,2})\s+([A-Za-z]{3,9})\s+(\d{4})\s+(\d{1,2}):(\d{2}):(\d{2})"),
            build: |c| canon(&c[1], &c[2], &c[3], &c[4], &c[5], &c[6]),
        },
        // Alternative prefixes: Created / Generated / Date
        Pattern {
            regex: re(r"(?i)(?:created|generated|date)\s*[:\s]\s*(\d{1,2})\s+([A-Za-z]{3,9})\s+(\d{4})\s+(\d{1,2}):(\d{2}):(\d{2})"),
            build: |c| canon(&c[1], &c[2], &c[3], &c[4], &c[5], &c[6]),
        },
        // Standalone D MMM YYYY HH:MM:SS
        Pattern {
            regex: re(r"\b(\d{1,2})\s+([A-Za-z]{3,9})\s+(\d{4})\s+(\d{1,2}):(\d{2}):(\d{2})\b"),
            build: |c| canon(&c[1], &c[2], &c[3], &c[4], &c[5], &c[6]),
        },
        // Numeric D[-/]M[-/]YYYY HH:MM:SS
        Pattern {
            regex: re(r"\b(\d{1,2})[-/](\d{1,2})[-/](\d{4})\s+(\d{1,2}):(\d{2}):(\d{2})\b"),
            build: |c| canon(&c[1], &c[2], &c[3], &c[4], &c[5], &c[6]),
        },
        // ISO YYYY[-/]M[-/]D HH:MM:SS
        Pattern {
            regex: re(r"\b(\d{4})[-/](\d{1,2})[-/](\d{1,2})\s+(\d{1,2}):(\d{2}):(\d{2})\b"),
            build: |c| canon(&c[3], &c[2], &c[1], &c[4], &c[5], &c[6]),
        },
        // Time-first HH:MM:SS D MMM YYYY
        Pattern {
            regex: re(r"\b(\d{1,2}):(\d{2}):(\d{2})\s+(\d{1,2})\s+([A-Za-z]{3,9})\s+(\d{4})\b"),
            build: |c| canon(&c[4], &c[5], &c[6], &c[1], &c[2], &c[3]),
        },
    ]
});

/// Validate that a string is already in exact canonical form
/// (`D MMM YYYY HH:MM:SS`, 3-letter month, zero-padded time fields).
static CANONICAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2}) ([A-Za-z]{3}) (\d{4}) (\d{2}):(\d{2}):(\d{2})$")
        .expect("static canonical regex is valid")
});

/// Try every accepted format variant against `text`, returning the first
/// match reformatted to canonical form. Every extracted timestamp is
/// re-validated against [`CANONICAL_RE`] before being accepted.
#[must_use]
pub fn parse_any(text: &str) -> Option<CanonicalTimestamp> {
    for pattern in PATTERNS.iter() {
        if let Some(caps) = pattern.regex.captures(text)
            && let Some(candidate) = (pattern.build)(&caps)
            && CANONICAL_RE.is_match(&candidate)
        {
            return Some(CanonicalTimestamp(candidate));
        }
    }
    None
}

/// Parse a timestamp that must match exactly (used for `start_from` in
/// configuration, where the operator supplies a canonical string directly).
#[must_use]
pub fn parse_exact_canonical(text: &str) -> Option<CanonicalTimestamp> {
    CANONICAL_RE
        .is_match(text.trim())
        .then(|| CanonicalTimestamp(text.trim().to_string()))
}

/// Convert a canonical timestamp to the filename prefix form
/// `YYYYMMDD-HHMMSS`.
#[must_use]
pub fn to_filename_prefix(ts: &CanonicalTimestamp) -> Option<String> {
    let caps = CANONICAL_RE.captures(ts.as_str())?;
    let day: u32 = caps[1].parse().ok()?;
    let month = MONTHS.iter().position(|m| *m == &caps[2])? + 1;
    let year = &caps[3];
    let (h, m, s) = (&caps[4], &caps[5], &caps[6]);
    Some(format!("{year}{month:02}{day:02}-{h}{m}{s}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_creation_time_prefixed() {
        let ts = parse_any("Creation Time: 25 Aug 2025 02:30:47").unwrap();
        assert_eq!(ts.as_str(), "25 Aug 2025 02:30:47");
    }

    #[test]
    fn parses_alternative_prefixes() {
        assert_eq!(
            parse_any("Created 5 Sep 2025 06:41:43").unwrap().as_str(),
            "5 Sep 2025 06:41:43"
        );
        assert_eq!(
            parse_any("Generated: 1 Jan 2024 00:00:00").unwrap().as_str(),
            "1 Jan 2024 00:00:00"
        );
        assert_eq!(
            parse_any("Date 1 Jan 2024 00:00:00").unwrap().as_str(),
            "1 Jan 2024 00:00:00"
        );
    }

    #[test]
    fn parses_numeric_dmy() {
        assert_eq!(
            parse_any("9/5/2025 6:41:43").unwrap().as_str(),
            "9 May 2025 06:41:43"
        );
    }

    #[test]
    fn parses_iso_ymd() {
        assert_eq!(
            parse_any("2025-09-05 06:41:43").unwrap().as_str(),
            "5 Sep 2025 06:41:43"
        );
    }

    #[test]
    fn parses_time_first() {
        assert_eq!(
            parse_any("06:41:43 5 Sep 2025").unwrap().as_str(),
            "5 Sep 2025 06:41:43"
        );
    }

    #[test]
    fn rejects_invalid_month_or_time() {
        assert!(parse_any("5 Sep 2025 25:00:00").is_none());
        assert!(parse_any("no timestamp here").is_none());
    }

    #[test]
    fn canonical_round_trip() {
        for text in [
            "Creation Time: 25 Aug 2025 02:30:47",
            "5 Sep 2025 06:41:43",
            "2025-09-05 06:41:43",
            "9/5/2025 6:41:43",
            "06:41:43 5 Sep 2025",
        ] {
            let ts = parse_any(text).expect("should parse");
            let reparsed = parse_any(ts.as_str()).expect("canonical form re-parses");
            assert_eq!(ts, reparsed);
        }
    }

    #[test]
    fn filename_prefix_format() {
        let ts = CanonicalTimestamp::from_trusted("25 Aug 2025 02:30:47".to_string());
        assert_eq!(to_filename_prefix(&ts).unwrap(), "20250825-023047");
    }
}
