use std::collections::HashMap;

use super::filter::{year_matches, BorderFilter, FilterState};
use super::model::{compare_years, CrossingRecord};

/// Calendar order used for the per-year series.
pub const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

/// Display name of a border: `"US-Mexico Border"` → `"Mexico"`.
pub fn normalize_border(raw: &str) -> String {
    raw.replacen("US-", "", 1).replacen(" Border", "", 1)
}

fn country_rank(country: &str) -> u8 {
    match country {
        "Mexico" => 0,
        "Canada" => 1,
        _ => 2,
    }
}

/// Canonical calendar name for a month label, `None` for anything else.
fn canonical_month(month: &str) -> Option<&'static str> {
    MONTH_NAMES
        .iter()
        .copied()
        .find(|m| m.eq_ignore_ascii_case(month.trim()))
}

fn month_rank(month: &str) -> usize {
    MONTH_NAMES
        .iter()
        .position(|m| m.eq_ignore_ascii_case(month.trim()))
        .unwrap_or(MONTH_NAMES.len())
}

/// Sum values per key, keeping keys in first-encountered order.
/// Records without a value still create their key.
fn sum_by_key<'a, K>(records: impl Iterator<Item = &'a CrossingRecord>, key: K) -> Vec<(String, i64)>
where
    K: Fn(&CrossingRecord) -> String,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, i64)> = Vec::new();
    for rec in records {
        let k = key(rec);
        let slot = *index.entry(k.clone()).or_insert_with(|| {
            groups.push((k, 0));
            groups.len() - 1
        });
        if let Some(v) = rec.value {
            groups[slot].1 = groups[slot].1.saturating_add(v);
        }
    }
    groups
}

// ---------------------------------------------------------------------------
// Share by country
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ShareEntry {
    pub country: String,
    pub total: i64,
    /// Percentage of the grand total; `None` when the grand total is zero.
    pub percent: Option<f64>,
}

/// Per-country totals in display order (Mexico, Canada, then the rest as
/// first encountered).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CountryShares {
    pub entries: Vec<ShareEntry>,
    pub total: i64,
}

impl CountryShares {
    pub fn has_data(&self) -> bool {
        self.total != 0
    }
}

pub fn country_shares(records: &[CrossingRecord], year: Option<&str>) -> CountryShares {
    let mut groups = sum_by_key(
        records
            .iter()
            .filter(|r| year_matches(r, year) && r.value.is_some())
            .filter(|r| !normalize_border(&r.border).is_empty()),
        |r| normalize_border(&r.border),
    );
    groups.sort_by_key(|(country, _)| country_rank(country));

    let total = groups.iter().fold(0i64, |acc, (_, v)| acc.saturating_add(*v));
    let entries = groups
        .into_iter()
        .map(|(country, sum)| ShareEntry {
            country,
            total: sum,
            percent: (total != 0).then(|| sum as f64 / total as f64 * 100.0),
        })
        .collect();

    CountryShares { entries, total }
}

// ---------------------------------------------------------------------------
// Time series
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeriesAxis {
    #[default]
    Year,
    Month,
}

/// Category labels and their summed values, index-aligned.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeSeries {
    pub axis: SeriesAxis,
    pub labels: Vec<String>,
    pub values: Vec<i64>,
}

impl TimeSeries {
    fn from_groups(axis: SeriesAxis, groups: Vec<(String, i64)>) -> Self {
        let (labels, values) = groups.into_iter().unzip();
        TimeSeries {
            axis,
            labels,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Totals per year over every record, years ascending.
pub fn yearly_totals(records: &[CrossingRecord]) -> TimeSeries {
    let mut groups = sum_by_key(records.iter(), |r| r.year.clone());
    groups.sort_by(|(a, _), (b, _)| compare_years(a, b));
    TimeSeries::from_groups(SeriesAxis::Year, groups)
}

/// Totals per month within `year`, in calendar order. Labels that are not
/// month names (the empty string included) follow December.
pub fn monthly_totals(records: &[CrossingRecord], year: &str) -> TimeSeries {
    let mut groups = sum_by_key(records.iter().filter(|r| r.year == year), |r| {
        canonical_month(&r.month)
            .map(str::to_string)
            .unwrap_or_else(|| r.month.clone())
    });
    groups.sort_by_key(|(month, _)| month_rank(month));
    TimeSeries::from_groups(SeriesAxis::Month, groups)
}

pub fn time_series(records: &[CrossingRecord], year: Option<&str>) -> TimeSeries {
    match year {
        None => yearly_totals(records),
        Some(y) => monthly_totals(records, y),
    }
}

// ---------------------------------------------------------------------------
// Heat points
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatPoint {
    pub longitude: f64,
    pub latitude: f64,
    pub weight: i64,
}

/// Map records to weighted positions. The year filter does not apply here.
pub fn heat_points(records: &[CrossingRecord], border: BorderFilter) -> Vec<HeatPoint> {
    records
        .iter()
        .filter(|r| border.matches(&r.border))
        .filter(|r| r.longitude.is_finite() && r.latitude.is_finite())
        .filter_map(|r| {
            Some(HeatPoint {
                longitude: r.longitude,
                latitude: r.latitude,
                weight: r.value?,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Titles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartTitles {
    pub share: String,
    pub series: String,
}

impl ChartTitles {
    pub fn for_year(year: Option<&str>) -> Self {
        match year {
            None => ChartTitles {
                share: "% of Historical Border Crossings by Country".to_string(),
                series: "Number of Historical Border Crossings".to_string(),
            },
            Some(y) => ChartTitles {
                share: format!("% of Border Crossings by Country ({y})"),
                series: format!("Border Crossings by Month in {y}"),
            },
        }
    }
}

impl Default for ChartTitles {
    fn default() -> Self {
        ChartTitles::for_year(None)
    }
}

// ---------------------------------------------------------------------------
// All derived views for one filter selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardViews {
    pub titles: ChartTitles,
    pub shares: CountryShares,
    pub series: TimeSeries,
    pub heat: Vec<HeatPoint>,
}

impl DashboardViews {
    /// Recompute every view for the given selection.
    pub fn compute(records: &[CrossingRecord], filters: &FilterState) -> Self {
        let year = filters.year.as_deref();
        DashboardViews {
            titles: ChartTitles::for_year(year),
            shares: country_shares(records, year),
            series: time_series(records, year),
            heat: heat_points(records, filters.border),
        }
    }

    /// Replace only the heat points; the border filter touches nothing else.
    pub fn refresh_heat(&mut self, records: &[CrossingRecord], border: BorderFilter) {
        self.heat = heat_points(records, border);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::parse_count;

    fn rec(border: &str, year: &str, month: &str, value: &str) -> CrossingRecord {
        CrossingRecord {
            border: border.to_string(),
            year: year.to_string(),
            month: month.to_string(),
            longitude: -100.0,
            latitude: 35.0,
            value: parse_count(value),
        }
    }

    fn sample() -> Vec<CrossingRecord> {
        vec![
            rec("US-Mexico Border", "2020", "", "100"),
            rec("US-Canada Border", "2020", "", "50"),
            rec("US-Mexico Border", "2021", "", "30"),
        ]
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.005
    }

    #[test]
    fn test_normalize_border() {
        assert_eq!(normalize_border("US-Mexico Border"), "Mexico");
        assert_eq!(normalize_border("US-Canada Border"), "Canada");
        assert_eq!(normalize_border("Other"), "Other");
    }

    #[test]
    fn test_shares_all_years() {
        let shares = country_shares(&sample(), None);
        assert_eq!(shares.total, 180);
        assert_eq!(shares.entries.len(), 2);
        assert_eq!(shares.entries[0].country, "Mexico");
        assert_eq!(shares.entries[0].total, 130);
        assert!(close(shares.entries[0].percent.unwrap(), 72.22));
        assert_eq!(shares.entries[1].country, "Canada");
        assert_eq!(shares.entries[1].total, 50);
        assert!(close(shares.entries[1].percent.unwrap(), 27.78));
    }

    #[test]
    fn test_shares_single_year() {
        let shares = country_shares(&sample(), Some("2020"));
        assert_eq!(shares.entries[0].total, 100);
        assert_eq!(shares.entries[1].total, 50);
        assert!(close(shares.entries[0].percent.unwrap(), 66.67));
        assert!(close(shares.entries[1].percent.unwrap(), 33.33));
    }

    #[test]
    fn test_share_ordering_ignores_input_order() {
        let records = vec![
            rec("US-Atlantis Border", "2020", "May", "5"),
            rec("US-Canada Border", "2020", "May", "7"),
            rec("Lakeside", "2020", "May", "3"),
            rec("US-Mexico Border", "2020", "May", "9"),
        ];
        let shares = country_shares(&records, None);
        let names: Vec<&str> = shares.entries.iter().map(|e| e.country.as_str()).collect();
        assert_eq!(names, vec!["Mexico", "Canada", "Atlantis", "Lakeside"]);
    }

    #[test]
    fn test_share_sums_match_input() {
        let records = vec![
            rec("US-Mexico Border", "2019", "June", "11"),
            rec("US-Canada Border", "2019", "June", "4"),
            rec("US-Mexico Border", "2020", "July", "20"),
            rec("US-Canada Border", "2021", "May", "6"),
            rec("US-Mexico Border", "2021", "May", "x"),
        ];
        let shares = country_shares(&records, None);
        let input_sum: i64 = records.iter().filter_map(|r| r.value).sum();
        let group_sum: i64 = shares.entries.iter().map(|e| e.total).sum();
        assert_eq!(group_sum, input_sum);
        assert_eq!(shares.total, input_sum);
        assert_eq!(shares.entries[0].total, 31);
        assert_eq!(shares.entries[1].total, 10);
    }

    #[test]
    fn test_zero_total_has_no_percent() {
        let records = vec![
            rec("US-Mexico Border", "2020", "May", "0"),
            rec("US-Canada Border", "2020", "May", "0"),
        ];
        let shares = country_shares(&records, None);
        assert!(!shares.has_data());
        assert!(shares.entries.iter().all(|e| e.percent.is_none()));

        let empty = country_shares(&[], Some("1990"));
        assert!(empty.entries.is_empty());
        assert!(!empty.has_data());
    }

    #[test]
    fn test_years_ascending() {
        let records = vec![
            rec("US-Mexico Border", "2010", "May", "1"),
            rec("US-Mexico Border", "1996", "May", "2"),
            rec("US-Mexico Border", "2003", "May", "3"),
            rec("US-Mexico Border", "1996", "June", "4"),
        ];
        let series = yearly_totals(&records);
        assert_eq!(series.axis, SeriesAxis::Year);
        assert_eq!(series.labels, vec!["1996", "2003", "2010"]);
        assert_eq!(series.values, vec![6, 3, 1]);
    }

    #[test]
    fn test_months_in_calendar_order() {
        let records = vec![
            rec("US-Mexico Border", "2020", "October", "10"),
            rec("US-Mexico Border", "2020", "April", "4"),
            rec("US-Mexico Border", "2020", "August", "8"),
            rec("US-Canada Border", "2020", "february", "2"),
            rec("US-Mexico Border", "2021", "January", "99"),
            rec("US-Mexico Border", "2020", "April", "1"),
        ];
        let series = monthly_totals(&records, "2020");
        assert_eq!(series.axis, SeriesAxis::Month);
        assert_eq!(series.labels, vec!["February", "April", "August", "October"]);
        assert_eq!(series.values, vec![2, 5, 8, 10]);
    }

    #[test]
    fn test_month_case_variants_share_a_category() {
        let records = vec![
            rec("US-Mexico Border", "2020", "May", "1"),
            rec("US-Canada Border", "2020", "may", "2"),
            rec("US-Mexico Border", "2020", " MAY ", "4"),
            rec("US-Mexico Border", "2020", "june", "8"),
        ];
        let series = monthly_totals(&records, "2020");
        assert_eq!(series.labels, vec!["May", "June"]);
        assert_eq!(series.values, vec![7, 8]);
    }

    #[test]
    fn test_huge_values_saturate_instead_of_overflowing() {
        let records = vec![
            rec("US-Mexico Border", "2020", "May", "9000000000000000000"),
            rec("US-Mexico Border", "2020", "May", "9000000000000000000"),
            rec("US-Canada Border", "2020", "May", "9000000000000000000"),
        ];
        let shares = country_shares(&records, None);
        assert_eq!(shares.entries[0].total, i64::MAX);
        assert_eq!(shares.total, i64::MAX);
        assert!(shares.entries.iter().all(|e| e.percent.is_some()));

        let series = yearly_totals(&records);
        assert_eq!(series.values, vec![i64::MAX]);
        assert_eq!(monthly_totals(&records, "2020").values, vec![i64::MAX]);
    }

    #[test]
    fn test_empty_month_is_its_own_category() {
        let series = time_series(&sample(), Some("2020"));
        assert_eq!(series.labels, vec![""]);
        assert_eq!(series.values, vec![150]);
    }

    #[test]
    fn test_unknown_months_follow_december() {
        let records = vec![
            rec("US-Mexico Border", "2020", "", "1"),
            rec("US-Mexico Border", "2020", "December", "2"),
            rec("US-Mexico Border", "2020", "Smarch", "3"),
            rec("US-Mexico Border", "2020", "March", "4"),
        ];
        let series = monthly_totals(&records, "2020");
        assert_eq!(series.labels, vec!["March", "December", "", "Smarch"]);
    }

    #[test]
    fn test_heat_points_filter_and_drop_invalid() {
        let mut no_coords = rec("US-Mexico Border", "2020", "May", "8");
        no_coords.longitude = f64::NAN;
        let records = vec![
            rec("US-Mexico Border", "2020", "May", "5"),
            rec("US-Canada Border", "2021", "May", "7"),
            rec("US-Mexico Border", "2021", "May", "bad"),
            no_coords,
        ];

        let all = heat_points(&records, BorderFilter::All);
        assert_eq!(all.len(), 2);

        let canada = heat_points(&records, BorderFilter::Canada);
        assert_eq!(canada.len(), 1);
        assert_eq!(canada[0].weight, 7);

        let mexico = heat_points(&records, BorderFilter::Mexico);
        assert_eq!(mexico.len(), 1);
        assert_eq!(mexico[0].weight, 5);
    }

    #[test]
    fn test_titles() {
        let all = ChartTitles::for_year(None);
        assert_eq!(all.share, "% of Historical Border Crossings by Country");
        assert_eq!(all.series, "Number of Historical Border Crossings");
        let one = ChartTitles::for_year(Some("2020"));
        assert_eq!(one.share, "% of Border Crossings by Country (2020)");
        assert_eq!(one.series, "Border Crossings by Month in 2020");
    }

    #[test]
    fn test_year_round_trip_restores_views() {
        let records = sample();
        let mut filters = FilterState::default();
        let initial = DashboardViews::compute(&records, &filters);

        filters.year = Some("2020".to_string());
        let single = DashboardViews::compute(&records, &filters);
        assert_ne!(single, initial);

        filters.year = None;
        assert_eq!(DashboardViews::compute(&records, &filters), initial);
    }

    #[test]
    fn test_border_filter_only_touches_heat() {
        let records = sample();
        let mut filters = FilterState::default();
        let mut views = DashboardViews::compute(&records, &filters);
        let before = views.clone();

        filters.border = BorderFilter::Canada;
        views.refresh_heat(&records, filters.border);

        assert_eq!(views.shares, before.shares);
        assert_eq!(views.series, before.series);
        assert_eq!(views.titles, before.titles);
        assert_eq!(views.heat.len(), 1);
        assert_eq!(views, DashboardViews::compute(&records, &filters));
    }
}
