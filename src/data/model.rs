use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// CrossingRecord – one row of the source table
// ---------------------------------------------------------------------------

/// A single crossing observation: one port, one month, one traffic measure.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossingRecord {
    /// Raw border name, e.g. `"US-Mexico Border"`.
    pub border: String,
    /// Year as it appears in the source (`"2020"`).
    pub year: String,
    /// Full month name (`"January"`); may be empty.
    pub month: String,
    /// `NaN` when the source cell is missing or not a number.
    pub longitude: f64,
    /// `NaN` when the source cell is missing or not a number.
    pub latitude: f64,
    /// Crossing count; `None` when the source cell is not numeric.
    pub value: Option<i64>,
}

impl CrossingRecord {
    /// Whether any numeric field failed to parse.
    pub fn is_malformed(&self) -> bool {
        self.value.is_none() || !self.longitude.is_finite() || !self.latitude.is_finite()
    }
}

// ---------------------------------------------------------------------------
// Best-effort numeric parsing of source cells
// ---------------------------------------------------------------------------

/// Parse a coordinate cell. Anything that is not a number becomes `NaN`.
pub fn parse_coordinate(s: &str) -> f64 {
    s.trim().parse::<f64>().unwrap_or(f64::NAN)
}

/// Parse a count cell. Accepts integers and finite decimals (truncated)
/// that fit in an `i64`.
pub fn parse_count(s: &str) -> Option<i64> {
    let s = s.trim();
    if let Ok(i) = s.parse::<i64>() {
        return Some(i);
    }
    // i64::MAX as f64 rounds up to 2^63, which is already out of range.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() && f.trunc() >= -LIMIT && f.trunc() < LIMIT => {
            Some(f.trunc() as i64)
        }
        _ => None,
    }
}

/// Order two year labels: numeric years ascending, then anything else
/// lexically.
pub fn compare_years(a: &str, b: &str) -> std::cmp::Ordering {
    match (a.trim().parse::<i64>(), b.trim().parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => std::cmp::Ordering::Less,
        (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

// ---------------------------------------------------------------------------
// CrossingDataset – the complete loaded snapshot
// ---------------------------------------------------------------------------

/// The full parsed dataset. Built once per load and never mutated; views
/// receive it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct CrossingDataset {
    /// All records, in source order.
    pub records: Vec<CrossingRecord>,
    /// Distinct years, ascending.
    pub years: Vec<String>,
    /// Number of records with at least one unparseable numeric field.
    pub malformed: usize,
}

impl CrossingDataset {
    /// Build the year index from the loaded records.
    pub fn from_records(records: Vec<CrossingRecord>) -> Self {
        let distinct: BTreeSet<&str> = records.iter().map(|r| r.year.as_str()).collect();
        let mut years: Vec<String> = distinct.into_iter().map(str::to_string).collect();
        years.sort_by(|a, b| compare_years(a, b));

        let malformed = records.iter().filter(|r| r.is_malformed()).count();

        CrossingDataset {
            records,
            years,
            malformed,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether `year` is one of the dataset's years.
    pub fn has_year(&self, year: &str) -> bool {
        self.years.iter().any(|y| y == year)
    }
}
