//! Sector-average growth used when no live series is usable.
//! Everything produced here is tagged `estimated`.

use crate::confidence::forecast_confidence;
use crate::models::forecast::{ForecastSource, GrowthForecast, OutlookCategory, YearProjection};

/// SOC major-group prefix → ten-year growth percent.
const SECTOR_GROWTH: &[(&str, f64)] = &[
    ("15-", 10.2), // computer and mathematical
    ("13-", 6.8),  // business and financial
    ("29-", 8.4),  // healthcare practitioners
    ("27-", 2.5),  // arts, design, media
    ("11-", 4.1),  // management
];
/// Economy-wide average.
pub const DEFAULT_GROWTH_PERCENT: f64 = 3.1;
pub const BASE_WORKFORCE: u64 = 750_000;
const PROJECTION_YEARS: i32 = 10;

pub fn sector_growth_percent(soc_code: Option<&str>) -> f64 {
    soc_code
        .and_then(|soc| {
            SECTOR_GROWTH
                .iter()
                .find(|(prefix, _)| soc.starts_with(prefix))
                .map(|(_, rate)| *rate)
        })
        .unwrap_or(DEFAULT_GROWTH_PERCENT)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Eleven yearly points compounding smoothly from [`BASE_WORKFORCE`] so that
/// the last point is `BASE_WORKFORCE * (1 + growth/100)`.
pub fn estimated_forecast(soc_code: Option<&str>, job_title: &str, start_year: i32) -> GrowthForecast {
    let growth_percent = sector_growth_percent(soc_code);
    let annual = (1.0 + growth_percent / 100.0).powf(1.0 / PROJECTION_YEARS as f64) - 1.0;

    let mut projections: Vec<YearProjection> = Vec::with_capacity(PROJECTION_YEARS as usize + 1);
    for i in 0..=PROJECTION_YEARS {
        let employment = (BASE_WORKFORCE as f64 * (1.0 + annual).powi(i)).round() as u64;
        let previous = projections.last().map(|p| p.employment);
        projections.push(YearProjection {
            year: start_year + i,
            employment,
            change: previous.map(|prev| employment as i64 - prev as i64),
            growth_rate: previous.map(|_| round2(annual * 100.0)),
        });
    }

    let last = projections.last().map(|p| p.employment).unwrap_or(BASE_WORKFORCE);
    let (confidence, low_confidence) = forecast_confidence(projections.len(), false);
    let prefix_label = soc_code
        .and_then(|s| s.get(..3))
        .unwrap_or("unknown");

    GrowthForecast {
        soc_code: soc_code.map(str::to_string),
        job_title: job_title.to_string(),
        growth_percent,
        absolute_job_change: last as i64 - BASE_WORKFORCE as i64,
        current_workforce: BASE_WORKFORCE,
        median_wage: None,
        category: OutlookCategory::from_growth(growth_percent),
        source: ForecastSource::Estimated,
        projection_period: format!("{}-{}", start_year, start_year + PROJECTION_YEARS),
        data_points: projections.len(),
        projections,
        confidence,
        low_confidence,
        note: Some(format!(
            "Estimated from the sector average ({growth_percent}% over ten years, SOC group {prefix_label}) \
             on a nominal workforce of {BASE_WORKFORCE}. Yearly rates of {}% are derived from that \
             ten-year figure. Not measured data.",
            round2(annual * 100.0)
        )),
    }
}
