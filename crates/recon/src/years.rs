use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

pub type Year = i32;

/// Ordered, deduplicated set of calendar years.
pub type YearSet = BTreeSet<Year>;

/// Inclusive `[start, end]` year interval. Never reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearWindow {
    pub start: Year,
    pub end: Year,
}

impl YearWindow {
    /// Returns `None` for a reversed window (`end < start`).
    pub fn new(start: Year, end: Year) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn contains(&self, year: Year) -> bool {
        self.start <= year && year <= self.end
    }

    pub fn intersect(&self, other: &YearWindow) -> Option<YearWindow> {
        YearWindow::new(self.start.max(other.start), self.end.min(other.end))
    }

    /// Every year in the window.
    pub fn years(&self) -> YearSet {
        (self.start..=self.end).collect()
    }
}

impl fmt::Display for YearWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}~{}", self.start, self.end)
        }
    }
}

/// Intersect `years` with `[window_start, window_end]`.
///
/// A reversed window yields the empty set.
pub fn clamp_years(years: &YearSet, window_start: Year, window_end: Year) -> YearSet {
    if years.is_empty() || window_end < window_start {
        return YearSet::new();
    }
    years.range(window_start..=window_end).copied().collect()
}

/// Like [`clamp_years`], but a missing window clamps everything away.
pub fn clamp_to_window(years: &YearSet, window: Option<YearWindow>) -> YearSet {
    match window {
        Some(w) => clamp_years(years, w.start, w.end),
        None => YearSet::new(),
    }
}

/// Partition years into maximal runs of consecutive integers, ascending.
pub fn year_runs<I>(years: I) -> Vec<YearWindow>
where
    I: IntoIterator<Item = Year>,
{
    let sorted: YearSet = years.into_iter().collect();
    let mut runs: Vec<YearWindow> = Vec::new();

    for year in sorted {
        match runs.last_mut() {
            Some(run) if run.end.checked_add(1) == Some(year) => run.end = year,
            _ => runs.push(YearWindow { start: year, end: year }),
        }
    }

    runs
}

/// Render years as range labels: `"Y"` for a single year, `"Ystart~Yend"` for a run.
pub fn compress_to_ranges<I>(years: I) -> Vec<String>
where
    I: IntoIterator<Item = Year>,
{
    year_runs(years).iter().map(ToString::to_string).collect()
}

/// Join range labels into the display form, e.g. `"2005~2008, 2012"`.
pub fn join_ranges(ranges: &[String]) -> String {
    ranges.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn set(years: &[Year]) -> YearSet {
        years.iter().copied().collect()
    }

    #[test]
    fn compress_splits_on_gaps() {
        assert_eq!(compress_to_ranges([2005, 2006, 2008]), vec!["2005~2006", "2008"]);
    }

    #[test]
    fn compress_sorts_and_dedups() {
        assert_eq!(
            compress_to_ranges([2010, 2008, 2009, 2009, 2001]),
            vec!["2001", "2008~2010"]
        );
    }

    #[test]
    fn compress_empty() {
        assert!(compress_to_ranges(Vec::<Year>::new()).is_empty());
    }

    #[test]
    fn clamp_keeps_years_inside_window() {
        let clamped = clamp_years(&set(&[1990, 1995, 2010]), 1994, 2006);
        assert_eq!(clamped, set(&[1995]));
        assert_eq!(compress_to_ranges(clamped), vec!["1995"]);
    }

    #[test]
    fn clamp_reversed_window_is_empty() {
        assert!(clamp_years(&set(&[2000, 2001]), 2005, 2000).is_empty());
    }

    #[test]
    fn clamp_missing_window_is_empty() {
        assert!(clamp_to_window(&set(&[2000]), None).is_empty());
    }

    #[test]
    fn single_year_window_is_valid() {
        let w = YearWindow::new(2001, 2001).unwrap();
        assert_eq!(w.years(), set(&[2001]));
        assert_eq!(clamp_years(&set(&[2000, 2001, 2002]), 2001, 2001), set(&[2001]));
    }

    #[test]
    fn window_intersection() {
        let backfile = YearWindow::new(1994, 2013).unwrap();
        let online = YearWindow::new(2000, 2020).unwrap();
        assert_eq!(backfile.intersect(&online), YearWindow::new(2000, 2013));

        let late = YearWindow::new(2014, 2020).unwrap();
        assert_eq!(backfile.intersect(&late), None);
    }

    #[test]
    fn join_uses_comma_space() {
        let ranges = compress_to_ranges([2005, 2006, 2007, 2008, 2012]);
        assert_eq!(join_ranges(&ranges), "2005~2008, 2012");
    }

    proptest! {
        #[test]
        fn runs_are_ascending_disjoint_and_cover_input(years in proptest::collection::vec(1900i32..2100, 0..64)) {
            let runs = year_runs(years.iter().copied());

            for pair in runs.windows(2) {
                // Maximal runs leave at least one missing year between them.
                prop_assert!(pair[0].end + 1 < pair[1].start);
            }

            let covered: YearSet = runs.iter().flat_map(|r| r.years()).collect();
            prop_assert_eq!(covered, years.iter().copied().collect::<YearSet>());
        }

        #[test]
        fn compress_ignores_input_order(mut years in proptest::collection::vec(1900i32..2100, 0..64)) {
            let forward = compress_to_ranges(years.clone());
            years.reverse();
            prop_assert_eq!(forward, compress_to_ranges(years));
        }
    }
}
