use std::fmt;

use super::model::CrossingRecord;

// ---------------------------------------------------------------------------
// Border filter: the three fixed options of the map's border select
// ---------------------------------------------------------------------------

/// Restricts the heatmap to one border. Matching is a substring test on
/// the raw border name, so `Mexico` matches `"US-Mexico Border"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderFilter {
    #[default]
    All,
    Mexico,
    Canada,
}

impl BorderFilter {
    pub const OPTIONS: [BorderFilter; 3] = [BorderFilter::All, BorderFilter::Mexico, BorderFilter::Canada];

    /// Substring that a border name must contain, `None` for no filter.
    pub fn needle(self) -> Option<&'static str> {
        match self {
            BorderFilter::All => None,
            BorderFilter::Mexico => Some("Mexico"),
            BorderFilter::Canada => Some("Canada"),
        }
    }

    pub fn matches(self, border: &str) -> bool {
        self.needle().map_or(true, |n| border.contains(n))
    }
}

impl fmt::Display for BorderFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BorderFilter::All => write!(f, "All"),
            BorderFilter::Mexico => write!(f, "Mexico"),
            BorderFilter::Canada => write!(f, "Canada"),
        }
    }
}

// ---------------------------------------------------------------------------
// Filter state
// ---------------------------------------------------------------------------

/// Which of the two dashboard modes is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewMode<'a> {
    /// Totals by year, shares across all years.
    AllYears,
    /// Totals by month, shares within the given year.
    SingleYear(&'a str),
}

/// The user's current selection. `year == None` means "All".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub year: Option<String>,
    pub border: BorderFilter,
}

impl FilterState {
    pub fn mode(&self) -> ViewMode<'_> {
        match self.year.as_deref() {
            None => ViewMode::AllYears,
            Some(y) => ViewMode::SingleYear(y),
        }
    }
}

/// Year predicate shared by the aggregations: no year selected passes
/// every record.
pub fn year_matches(record: &CrossingRecord, year: Option<&str>) -> bool {
    year.map_or(true, |y| record.year == y)
}
