//! Average PR over the last N calendar days of the table.

use crate::domain::CombinedTable;
use chrono::Duration;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailingAverage {
    /// Calendar days covered, counting back from the table's last date.
    pub days: u32,
    /// `None` when no PR value falls inside the period.
    pub average: Option<f64>,
    pub samples: usize,
}

/// For each period, average the PR values dated strictly after `last_date - days`.
/// A period reaching past the earliest representable date covers every row.
pub fn trailing_pr_averages(table: &CombinedTable, periods: &[u32]) -> Vec<TrailingAverage> {
    let last_date = table.last_date();

    periods
        .iter()
        .map(|&days| {
            let values: Vec<f64> = match last_date {
                Some(last) => {
                    let cutoff = last.checked_sub_signed(Duration::days(i64::from(days)));
                    table
                        .iter()
                        .filter(|row| cutoff.map_or(true, |c| row.date > c))
                        .filter_map(|row| row.pr)
                        .collect()
                }
                None => Vec::new(),
            };
            let average = if values.is_empty() {
                None
            } else {
                Some(values.iter().sum::<f64>() / values.len() as f64)
            };
            TrailingAverage {
                days,
                average,
                samples: values.len(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MergedRow;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};
    use chrono::NaiveDate;

    fn table(points: &[(u32, Option<f64>)]) -> CombinedTable {
        CombinedTable::from_rows(points.iter().map(|&(day, pr)| MergedRow {
            date: NaiveDate::from_ymd_opt(2020, 1, day).unwrap(),
            ghi: None,
            pr,
        }))
    }

    #[test]
    fn periods_count_back_from_last_date() {
        // Last date is Jan 10; a 3-day period covers Jan 8..=10.
        let t = table(&[(1, Some(10.0)), (7, Some(20.0)), (8, Some(30.0)), (10, Some(50.0))]);
        let avgs = trailing_pr_averages(&t, &[3, 30]);

        assert_eq!(avgs[0].days, 3);
        assert_eq!(avgs[0].samples, 2);
        assert_approx(avgs[0].average.unwrap(), 40.0, DEFAULT_EPSILON);

        assert_eq!(avgs[1].samples, 4);
        assert_approx(avgs[1].average.unwrap(), 27.5, DEFAULT_EPSILON);
    }

    #[test]
    fn missing_pr_is_not_averaged() {
        let t = table(&[(9, Some(60.0)), (10, None)]);
        let avgs = trailing_pr_averages(&t, &[7]);
        assert_eq!(avgs[0].samples, 1);
        assert_approx(avgs[0].average.unwrap(), 60.0, DEFAULT_EPSILON);
    }

    #[test]
    fn huge_period_covers_every_row() {
        let t = table(&[(1, Some(10.0)), (10, Some(30.0))]);
        let avgs = trailing_pr_averages(&t, &[u32::MAX]);
        assert_eq!(avgs[0].samples, 2);
        assert_approx(avgs[0].average.unwrap(), 20.0, DEFAULT_EPSILON);
    }

    #[test]
    fn empty_table_has_no_averages() {
        let avgs = trailing_pr_averages(&CombinedTable::default(), &[7, 30, 60]);
        assert_eq!(avgs.len(), 3);
        assert!(avgs.iter().all(|a| a.average.is_none() && a.samples == 0));
    }
}
