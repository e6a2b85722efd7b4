//! Learning-resource discovery over the trusted channel allow-list.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::policy::{
    level_query, select_resources, RESULTS_PER_CHANNEL, SEARCHED_CHANNELS, TRUSTED_CHANNELS,
};
use crate::cache::{cache_key, ns, TtlCache};
use crate::errors::StageError;
use crate::models::resource::{LearningRecommendation, Resource, VideoCandidate};
use crate::models::resume::ExperienceLevel;
use crate::providers::VideoSearch;

pub const MAX_SKILLS: usize = 5;
pub const DEFAULT_MAX_RESULTS: usize = 3;

pub struct ResourceFinder {
    search: Option<Arc<dyn VideoSearch>>,
    cache: TtlCache,
    ttl_seconds: u64,
}

impl ResourceFinder {
    pub fn new(search: Option<Arc<dyn VideoSearch>>, cache: TtlCache, ttl_seconds: u64) -> Self {
        Self {
            search,
            cache,
            ttl_seconds,
        }
    }

    pub fn has_search(&self) -> bool {
        self.search.is_some()
    }

    /// One recommendation per skill, in the given order, for at most
    /// `MAX_SKILLS` skills. A skill with no qualifying video gets an empty list.
    pub async fn find(
        &self,
        skills: &[String],
        level: ExperienceLevel,
    ) -> Result<Vec<LearningRecommendation>, StageError> {
        let search = self
            .search
            .as_ref()
            .ok_or_else(|| StageError::Configuration("no video search source is configured".into()))?;

        let mut recommendations = Vec::new();
        for skill in skills
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .take(MAX_SKILLS)
        {
            let resources = self.resources_for(search.as_ref(), skill, level).await;
            recommendations.push(LearningRecommendation {
                skill: skill.to_string(),
                recommended_order: recommendations.len() as u32 + 1,
                resources,
            });
        }

        info!(
            stage = "resources",
            skills = recommendations.len(),
            resources = recommendations.iter().map(|r| r.resources.len()).sum::<usize>(),
            "resources ready"
        );
        Ok(recommendations)
    }

    async fn resources_for(
        &self,
        search: &dyn VideoSearch,
        skill: &str,
        level: ExperienceLevel,
    ) -> Vec<Resource> {
        let key = cache_key(ns::RESOURCES, &[skill, level.as_str()]);
        if let Some(cached) = self.cache.get::<Vec<Resource>>(&key).await {
            return cached;
        }

        let query = level_query(skill, level);
        let mut candidates: Vec<VideoCandidate> = Vec::new();
        for (channel, channel_id) in TRUSTED_CHANNELS.iter().take(SEARCHED_CHANNELS) {
            match search.search(&query, channel_id, RESULTS_PER_CHANNEL).await {
                Ok(found) => candidates.extend(found),
                Err(e) => {
                    warn!(stage = "resources", skill, channel, error = %e, "channel search failed, skipping");
                }
            }
        }

        let resources = select_resources(
            candidates,
            level,
            Utc::now().date_naive(),
            DEFAULT_MAX_RESULTS,
        );
        if !resources.is_empty() {
            self.cache.set(&key, &resources, self.ttl_seconds).await;
        }
        resources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ProviderError;
    use async_trait::async_trait;
    use chrono::Duration;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns one popular recent video per call, except for one failing channel.
    struct StubSearch {
        calls: AtomicUsize,
        failing_channel: Option<&'static str>,
    }

    impl StubSearch {
        fn new(failing_channel: Option<&'static str>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                failing_channel,
            }
        }
    }

    #[async_trait]
    impl VideoSearch for StubSearch {
        async fn search(
            &self,
            query: &str,
            channel_id: &str,
            _max_results: u32,
        ) -> Result<Vec<VideoCandidate>, ProviderError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing_channel == Some(channel_id) {
                return Err(ProviderError::Malformed("boom".into()));
            }
            Ok(vec![VideoCandidate {
                video_id: format!("{channel_id}-{n}"),
                title: format!("{query} #{n}"),
                channel: channel_id.to_string(),
                views: 100_000 + n as u64 * 1_000,
                duration_minutes: 45,
                upload_date: Utc::now().date_naive() - Duration::days(30),
            }])
        }
    }

    #[tokio::test]
    async fn test_searches_first_five_channels_and_keeps_top_three() {
        let search = Arc::new(StubSearch::new(None));
        let finder = ResourceFinder::new(Some(search.clone()), TtlCache::in_memory(), 60);

        let recs = finder
            .find(&["Docker".to_string()], ExperienceLevel::Junior)
            .await
            .unwrap();

        assert_eq!(search.calls.load(Ordering::SeqCst), SEARCHED_CHANNELS);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].recommended_order, 1);
        let views: Vec<u64> = recs[0].resources.iter().map(|r| r.views).collect();
        assert_eq!(views, vec![104_000, 103_000, 102_000]);
    }

    #[tokio::test]
    async fn test_failed_channel_is_skipped() {
        let failing = TRUSTED_CHANNELS[0].1;
        let finder = ResourceFinder::new(
            Some(Arc::new(StubSearch::new(Some(failing)))),
            TtlCache::in_memory(),
            60,
        );
        let recs = finder
            .find(&["AWS".to_string()], ExperienceLevel::Mid)
            .await
            .unwrap();
        assert_eq!(recs[0].resources.len(), 3);
        assert!(recs[0].resources.iter().all(|r| r.channel != failing));
    }

    #[tokio::test]
    async fn test_caps_skills_and_uses_cache() {
        let search = Arc::new(StubSearch::new(None));
        let finder = ResourceFinder::new(Some(search.clone()), TtlCache::in_memory(), 60);
        let skills: Vec<String> = (1..=7).map(|i| format!("Skill{i}")).collect();

        let first = finder.find(&skills, ExperienceLevel::Junior).await.unwrap();
        assert_eq!(first.len(), MAX_SKILLS);
        let calls = search.calls.load(Ordering::SeqCst);
        assert_eq!(calls, MAX_SKILLS * SEARCHED_CHANNELS);

        let second = finder.find(&skills, ExperienceLevel::Junior).await.unwrap();
        assert_eq!(second, first);
        assert_eq!(search.calls.load(Ordering::SeqCst), calls);
    }

    #[tokio::test]
    async fn test_missing_search_is_a_configuration_error() {
        let finder = ResourceFinder::new(None, TtlCache::in_memory(), 60);
        let err = finder
            .find(&["Go".to_string()], ExperienceLevel::Junior)
            .await
            .unwrap_err();
        assert!(matches!(err, StageError::Configuration(_)));
    }
}
