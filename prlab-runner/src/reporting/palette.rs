//! Continuous GHI color scale for the PR scatter.
//!
//! GHI is normalized over the plotted rows and interpolated through
//! navy → light blue → orange → brown. Rows without GHI get a neutral gray.

use plotters::style::RGBColor;
use prlab_core::CombinedTable;

const STOPS: [RGBColor; 4] = [
    RGBColor(0, 0, 128),
    RGBColor(173, 216, 230),
    RGBColor(255, 165, 0),
    RGBColor(165, 42, 42),
];

pub const MISSING_GHI_COLOR: RGBColor = RGBColor(150, 150, 150);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GhiColorScale {
    min: f64,
    max: f64,
}

impl GhiColorScale {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Scale spanning the GHI values present in `table` (0..1 when there are none).
    pub fn from_table(table: &CombinedTable) -> Self {
        let (min, max) = table
            .iter()
            .filter_map(|row| row.ghi)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        if min.is_finite() && max.is_finite() {
            Self::new(min, max)
        } else {
            Self::new(0.0, 1.0)
        }
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    pub fn color(&self, ghi: Option<f64>) -> RGBColor {
        match ghi {
            Some(value) => interpolate(self.normalize(value)),
            None => MISSING_GHI_COLOR,
        }
    }

    fn normalize(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span <= f64::EPSILON {
            return 0.5;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }
}

fn interpolate(t: f64) -> RGBColor {
    let scaled = t * (STOPS.len() - 1) as f64;
    let idx = (scaled.floor() as usize).min(STOPS.len() - 2);
    let frac = scaled - idx as f64;
    let (a, b) = (STOPS[idx], STOPS[idx + 1]);
    RGBColor(
        lerp(a.0, b.0, frac),
        lerp(a.1, b.1, frac),
        lerp(a.2, b.2, frac),
    )
}

fn lerp(a: u8, b: u8, t: f64) -> u8 {
    (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use prlab_core::MergedRow;

    #[test]
    fn endpoints_map_to_first_and_last_stop() {
        let scale = GhiColorScale::new(0.0, 8.0);
        assert_eq!(scale.color(Some(0.0)), STOPS[0]);
        assert_eq!(scale.color(Some(8.0)), STOPS[3]);
    }

    #[test]
    fn out_of_range_values_clamp() {
        let scale = GhiColorScale::new(2.0, 4.0);
        assert_eq!(scale.color(Some(-10.0)), STOPS[0]);
        assert_eq!(scale.color(Some(99.0)), STOPS[3]);
    }

    #[test]
    fn midpoints_interpolate() {
        let scale = GhiColorScale::new(0.0, 3.0);
        // Exactly on the second stop.
        assert_eq!(scale.color(Some(1.0)), STOPS[1]);
        let between = scale.color(Some(0.5));
        assert_ne!(between, STOPS[0]);
        assert_ne!(between, STOPS[1]);
    }

    #[test]
    fn missing_ghi_is_neutral() {
        let scale = GhiColorScale::new(0.0, 1.0);
        assert_eq!(scale.color(None), MISSING_GHI_COLOR);
    }

    #[test]
    fn flat_scale_uses_middle_color() {
        let scale = GhiColorScale::new(5.0, 5.0);
        assert_eq!(scale.color(Some(5.0)), interpolate(0.5));
    }

    #[test]
    fn bounds_come_from_present_ghi() {
        let day = |n| NaiveDate::from_ymd_opt(2020, 1, n).unwrap();
        let table = CombinedTable::from_rows(vec![
            MergedRow { date: day(1), ghi: Some(3.0), pr: None },
            MergedRow { date: day(2), ghi: None, pr: Some(0.8) },
            MergedRow { date: day(3), ghi: Some(7.5), pr: Some(0.9) },
        ]);
        assert_eq!(GhiColorScale::from_table(&table).bounds(), (3.0, 7.5));
        assert_eq!(
            GhiColorScale::from_table(&CombinedTable::default()).bounds(),
            (0.0, 1.0)
        );
    }
}
