use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Datelike, Utc};
use tracing::{info, warn};

use super::estimates::estimated_forecast;
use crate::cache::{cache_key, ns, TtlCache};
use crate::confidence::{forecast_confidence, MIN_FORECAST_DATA_POINTS};
use crate::errors::StageError;
use crate::models::forecast::{ForecastSource, GrowthForecast, OutlookCategory, YearProjection};
use crate::providers::{SeriesData, StatisticsSource};

/// Years before the current one included in the request. With the current
/// year this spans `MIN_FORECAST_DATA_POINTS` historical observations.
const HISTORY_YEARS: i32 = MIN_FORECAST_DATA_POINTS as i32 - 1;
/// Years after the current one included in the request.
const HORIZON_YEARS: i32 = 10;
/// Series values are published in thousands.
const SERIES_UNIT: f64 = 1000.0;

pub struct Forecaster {
    statistics: Option<Arc<dyn StatisticsSource>>,
    cache: TtlCache,
    ttl_seconds: u64,
}

pub fn series_ids(soc_code: &str) -> (String, String) {
    let clean = soc_code.replace('-', "");
    (format!("EPU{clean}01"), format!("EPU{clean}03"))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Joins the employment and change series into per-year projections with
/// year-over-year growth. `None` when fewer than two employment points exist
/// or the first is not positive.
pub fn build_projections(
    series: &[SeriesData],
    employment_id: &str,
    change_id: &str,
) -> Option<Vec<YearProjection>> {
    let mut employment: BTreeMap<i32, u64> = BTreeMap::new();
    let mut change: BTreeMap<i32, i64> = BTreeMap::new();
    for s in series {
        for &(year, value) in &s.observations {
            if s.series_id == employment_id && value >= 0.0 {
                employment.insert(year, (value * SERIES_UNIT).round() as u64);
            } else if s.series_id == change_id {
                change.insert(year, (value * SERIES_UNIT).round() as i64);
            }
        }
    }

    if employment.len() < 2 || employment.values().next().copied().unwrap_or(0) == 0 {
        return None;
    }

    let mut projections: Vec<YearProjection> = Vec::with_capacity(employment.len());
    for (&year, &value) in &employment {
        let growth_rate = projections
            .last()
            .filter(|prev| prev.employment > 0)
            .map(|prev| round2((value as f64 - prev.employment as f64) / prev.employment as f64 * 100.0));
        projections.push(YearProjection {
            year,
            employment: value,
            change: change.get(&year).copied(),
            growth_rate,
        });
    }
    Some(projections)
}

fn live_forecast(
    soc_code: &str,
    job_title: &str,
    projections: Vec<YearProjection>,
    current_year: i32,
) -> Option<GrowthForecast> {
    let first = projections.first()?;
    let last = projections.last()?;
    let growth_percent =
        round2((last.employment as f64 - first.employment as f64) / first.employment as f64 * 100.0);
    let current_workforce = projections
        .iter()
        .filter(|p| p.year <= current_year)
        .last()
        .unwrap_or(first)
        .employment;
    let historical = projections.iter().filter(|p| p.year <= current_year).count();
    let (confidence, low_confidence) = forecast_confidence(historical, true);

    Some(GrowthForecast {
        soc_code: Some(soc_code.to_string()),
        job_title: job_title.to_string(),
        growth_percent,
        absolute_job_change: last.employment as i64 - first.employment as i64,
        current_workforce,
        median_wage: None,
        category: OutlookCategory::from_growth(growth_percent),
        source: ForecastSource::LiveApi,
        projection_period: format!("{}-{}", first.year, last.year),
        data_points: projections.len(),
        note: low_confidence.then(|| {
            format!(
                "Only {historical} historical yearly observations available (fewer than {MIN_FORECAST_DATA_POINTS})."
            )
        }),
        projections,
        confidence,
        low_confidence,
    })
}

impl Forecaster {
    pub fn new(
        statistics: Option<Arc<dyn StatisticsSource>>,
        cache: TtlCache,
        ttl_seconds: u64,
    ) -> Self {
        Self {
            statistics,
            cache,
            ttl_seconds,
        }
    }

    pub fn has_statistics(&self) -> bool {
        self.statistics.is_some()
    }

    /// Live series first; the sector estimate otherwise. Only live results are cached.
    pub async fn forecast(
        &self,
        soc_code: Option<&str>,
        job_title: &str,
    ) -> Result<GrowthForecast, StageError> {
        let job_title = job_title.trim();
        if job_title.is_empty() {
            return Err(StageError::Unsupported("job title must not be empty".into()));
        }
        let soc_code = soc_code.map(str::trim).filter(|s| !s.is_empty());
        let current_year = Utc::now().year();

        let forecast = match (soc_code, &self.statistics) {
            (Some(soc), Some(statistics)) => {
                let key = cache_key(ns::FORECAST, &[soc]);
                if let Some(cached) = self.cache.get::<GrowthForecast>(&key).await {
                    return Ok(cached);
                }
                match self.fetch_live(statistics.as_ref(), soc, job_title, current_year).await {
                    Some(live) => {
                        self.cache.set(&key, &live, self.ttl_seconds).await;
                        live
                    }
                    None => estimated_forecast(Some(soc), job_title, current_year),
                }
            }
            (soc, _) => estimated_forecast(soc, job_title, current_year),
        };

        info!(
            stage = "forecast",
            growth = forecast.growth_percent,
            category = %forecast.category,
            source = ?forecast.source,
            confidence = forecast.confidence,
            "forecast ready"
        );
        Ok(forecast)
    }

    async fn fetch_live(
        &self,
        statistics: &dyn StatisticsSource,
        soc: &str,
        job_title: &str,
        current_year: i32,
    ) -> Option<GrowthForecast> {
        let (employment_id, change_id) = series_ids(soc);
        let ids = [employment_id.clone(), change_id.clone()];
        let series = match statistics
            .fetch_series(&ids, current_year - HISTORY_YEARS, current_year + HORIZON_YEARS)
            .await
        {
            Ok(series) => series,
            Err(e) => {
                warn!(stage = "forecast", error = %e, "statistics fetch failed, using sector estimate");
                return None;
            }
        };

        match build_projections(&series, &employment_id, &change_id) {
            Some(projections) => live_forecast(soc, job_title, projections, current_year),
            None => {
                warn!(stage = "forecast", soc, "no usable employment series, using sector estimate");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ProviderError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubStatistics {
        result: Result<Vec<SeriesData>, ()>,
        calls: AtomicUsize,
    }

    impl StubStatistics {
        fn new(result: Result<Vec<SeriesData>, ()>) -> Self {
            Self {
                result,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl StatisticsSource for StubStatistics {
        async fn fetch_series(
            &self,
            _series_ids: &[String],
            _start_year: i32,
            _end_year: i32,
        ) -> Result<Vec<SeriesData>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result
                .clone()
                .map_err(|_| ProviderError::Malformed("down".into()))
        }
    }

    fn employment_series(points: &[(i32, f64)]) -> SeriesData {
        SeriesData {
            series_id: "EPU152051".into(),
            observations: points.to_vec(),
        }
    }

    #[test]
    fn test_series_ids_strip_dash() {
        let (emp, chg) = series_ids("15-2051");
        assert_eq!(emp, "EPU15205101");
        assert_eq!(chg, "EPU15205103");
    }

    #[test]
    fn test_build_projections_computes_yearly_growth() {
        let series = vec![
            SeriesData {
                series_id: "E".into(),
                observations: vec![(2025, 110.0), (2024, 100.0), (2026, 121.0)],
            },
            SeriesData {
                series_id: "C".into(),
                observations: vec![(2025, 10.0)],
            },
        ];
        let projections = build_projections(&series, "E", "C").unwrap();
        assert_eq!(projections.len(), 3);
        assert_eq!(projections[0].year, 2024);
        assert_eq!(projections[0].growth_rate, None);
        assert_eq!(projections[1].growth_rate, Some(10.0));
        assert_eq!(projections[1].change, Some(10_000));
        assert_eq!(projections[2].growth_rate, Some(10.0));
    }

    #[test]
    fn test_build_projections_rejects_unusable_series() {
        let one_point = vec![SeriesData {
            series_id: "E".into(),
            observations: vec![(2024, 100.0)],
        }];
        assert!(build_projections(&one_point, "E", "C").is_none());

        let zero_start = vec![SeriesData {
            series_id: "E".into(),
            observations: vec![(2024, 0.0), (2025, 10.0)],
        }];
        assert!(build_projections(&zero_start, "E", "C").is_none());
    }

    #[tokio::test]
    async fn test_live_series_with_few_points_is_low_confidence() {
        let (emp, _) = series_ids("15-2051");
        let stub = StubStatistics::new(Ok(vec![SeriesData {
            series_id: emp,
            observations: vec![(2024, 200.0), (2034, 270.0)],
        }]));
        let forecaster = Forecaster::new(Some(Arc::new(stub)), TtlCache::in_memory(), 3600);
        let f = forecaster.forecast(Some("15-2051"), "Data Scientist").await.unwrap();

        assert_eq!(f.source, ForecastSource::LiveApi);
        assert_eq!(f.growth_percent, 35.0);
        assert_eq!(f.absolute_job_change, 70_000);
        assert_eq!(f.category, OutlookCategory::FutureSafe);
        assert!(f.low_confidence);
        assert!(f.confidence < 0.7);
    }

    #[tokio::test]
    async fn test_live_series_with_enough_points_is_confident_and_cached() {
        let (emp, _) = series_ids("15-1252");
        let year = Utc::now().year();
        let points: Vec<(i32, f64)> = (0..6).map(|i| (year - 5 + i, 1000.0 - i as f64)).collect();
        let stub = Arc::new(StubStatistics::new(Ok(vec![SeriesData {
            series_id: emp,
            observations: points,
        }])));
        let forecaster = Forecaster::new(Some(stub.clone()), TtlCache::in_memory(), 3600);

        let f = forecaster.forecast(Some("15-1252"), "Software Developer").await.unwrap();
        assert!(!f.low_confidence);
        assert_eq!(f.category, OutlookCategory::Declining);

        forecaster.forecast(Some("15-1252"), "Software Developer").await.unwrap();
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_projected_years_do_not_count_as_history() {
        let (emp, _) = series_ids("15-2051");
        let year = Utc::now().year();
        let points: Vec<(i32, f64)> = (0..10).map(|i| (year - 1 + i, 100.0 + i as f64)).collect();
        let stub = StubStatistics::new(Ok(vec![SeriesData {
            series_id: emp,
            observations: points,
        }]));
        let forecaster = Forecaster::new(Some(Arc::new(stub)), TtlCache::in_memory(), 3600);
        let f = forecaster.forecast(Some("15-2051"), "Data Scientist").await.unwrap();

        assert_eq!(f.data_points, 10);
        assert!(f.low_confidence);
        assert!(f.note.as_deref().unwrap_or_default().contains("Only 2 historical"));
    }

    #[tokio::test]
    async fn test_upstream_failure_falls_back_to_estimate_and_is_not_cached() {
        let stub = Arc::new(StubStatistics::new(Err(())));
        let forecaster = Forecaster::new(Some(stub.clone()), TtlCache::in_memory(), 3600);

        let f = forecaster.forecast(Some("15-2051"), "Data Scientist").await.unwrap();
        assert_eq!(f.source, ForecastSource::Estimated);
        assert_eq!(f.growth_percent, 10.2);

        forecaster.forecast(Some("15-2051"), "Data Scientist").await.unwrap();
        assert_eq!(stub.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_missing_soc_code_uses_default_estimate() {
        let forecaster = Forecaster::new(None, TtlCache::in_memory(), 3600);
        let f = forecaster.forecast(None, "Astronaut").await.unwrap();
        assert_eq!(f.source, ForecastSource::Estimated);
        assert_eq!(f.growth_percent, 3.1);
        assert_eq!(f.category, OutlookCategory::Stable);
    }

    #[test]
    fn test_employment_series_helper_is_sorted_by_year_in_output() {
        let series = vec![employment_series(&[(2030, 5.0), (2028, 4.0)])];
        let projections = build_projections(&series, "EPU152051", "none").unwrap();
        assert_eq!(projections[0].year, 2028);
    }
}
