use std::fmt;

use serde::{Deserialize, Serialize};

/// Long-term outlook bucket, derived only from the growth percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutlookCategory {
    #[serde(rename = "Future-safe")]
    FutureSafe,
    Stable,
    Declining,
}

impl OutlookCategory {
    /// ≥10 → Future-safe, [0, 10) → Stable, <0 → Declining.
    pub fn from_growth(growth_percent: f64) -> Self {
        if growth_percent >= 10.0 {
            Self::FutureSafe
        } else if growth_percent >= 0.0 {
            Self::Stable
        } else {
            Self::Declining
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::FutureSafe => "Future-safe",
            Self::Stable => "Stable",
            Self::Declining => "Declining",
        }
    }
}

impl fmt::Display for OutlookCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Provenance of a forecast. Estimated figures are never measured data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ForecastSource {
    LiveApi,
    Estimated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearProjection {
    pub year: i32,
    pub employment: u64,
    pub change: Option<i64>,
    /// Percent change from the previous year.
    pub growth_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthForecast {
    pub soc_code: Option<String>,
    pub job_title: String,
    pub growth_percent: f64,
    pub absolute_job_change: i64,
    pub current_workforce: u64,
    /// Not published by the statistics source; `None` unless known.
    pub median_wage: Option<u64>,
    pub category: OutlookCategory,
    pub source: ForecastSource,
    pub projection_period: String,
    pub projections: Vec<YearProjection>,
    pub data_points: usize,
    pub confidence: f64,
    pub low_confidence: bool,
    pub note: Option<String>,
}
