//! Rolling mean with a shrinking window at the start of the series.
//!
//! Position `i` averages the last `min(window, i + 1)` values, so the first
//! output equals the first input and there are no undefined leading points.

use crate::domain::CombinedTable;
use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct RollingMean {
    window: usize,
}

impl RollingMean {
    pub fn new(window: usize) -> Self {
        assert!(window >= 1, "rolling window must be >= 1");
        Self { window }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn compute(&self, values: &[f64]) -> Vec<f64> {
        let mut result = Vec::with_capacity(values.len());
        let mut sum = 0.0;

        for (i, &value) in values.iter().enumerate() {
            sum += value;
            if i >= self.window {
                sum -= values[i - self.window];
            }
            let count = (i + 1).min(self.window);
            result.push(sum / count as f64);
        }

        result
    }
}

/// Rolling mean of PR over the rows that have a PR value, keyed by their dates.
///
/// Rows without PR neither contribute nor receive a point.
pub fn pr_rolling_mean(table: &CombinedTable, window: usize) -> Vec<(NaiveDate, f64)> {
    let points = table.pr_points();
    let values: Vec<f64> = points.iter().map(|&(_, pr)| pr).collect();
    let means = RollingMean::new(window).compute(&values);
    points
        .into_iter()
        .zip(means)
        .map(|((date, _), mean)| (date, mean))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MergedRow;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn shrinking_window_at_start() {
        let result = RollingMean::new(3).compute(&[3.0, 5.0, 7.0, 9.0, 11.0]);
        assert_eq!(result.len(), 5);
        assert_approx(result[0], 3.0, DEFAULT_EPSILON);
        assert_approx(result[1], 4.0, DEFAULT_EPSILON);
        assert_approx(result[2], 5.0, DEFAULT_EPSILON);
        // Full window from here on.
        assert_approx(result[3], 7.0, DEFAULT_EPSILON);
        assert_approx(result[4], 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn window_one_is_identity() {
        let input = [1.5, -2.0, 8.25];
        let result = RollingMean::new(1).compute(&input);
        for (a, b) in result.iter().zip(input.iter()) {
            assert_approx(*a, *b, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn window_longer_than_series_is_cumulative_mean() {
        let result = RollingMean::new(30).compute(&[2.0, 4.0, 6.0]);
        assert_approx(result[2], 4.0, DEFAULT_EPSILON);
    }

    #[test]
    fn empty_input() {
        assert!(RollingMean::new(30).compute(&[]).is_empty());
    }

    #[test]
    #[should_panic(expected = "rolling window must be >= 1")]
    fn zero_window_panics() {
        RollingMean::new(0);
    }

    #[test]
    fn pr_mean_skips_rows_without_pr() {
        let day = |n: u32| NaiveDate::from_ymd_opt(2020, 1, n).unwrap();
        let table = CombinedTable::from_rows(vec![
            MergedRow { date: day(1), ghi: Some(1.0), pr: Some(70.0) },
            MergedRow { date: day(2), ghi: Some(2.0), pr: None },
            MergedRow { date: day(3), ghi: None, pr: Some(80.0) },
            MergedRow { date: day(4), ghi: Some(4.0), pr: Some(90.0) },
        ]);

        let means = pr_rolling_mean(&table, 2);
        let dates: Vec<NaiveDate> = means.iter().map(|&(d, _)| d).collect();
        assert_eq!(dates, vec![day(1), day(3), day(4)]);
        assert_approx(means[0].1, 70.0, DEFAULT_EPSILON);
        assert_approx(means[1].1, 75.0, DEFAULT_EPSILON);
        assert_approx(means[2].1, 85.0, DEFAULT_EPSILON);
    }
}
