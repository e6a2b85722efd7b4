use std::str::FromStr;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every provider credential is optional; a missing one disables that provider.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub redis_url: Option<String>,

    pub anthropic_api_key: Option<String>,
    pub adzuna_app_id: Option<String>,
    pub adzuna_app_key: Option<String>,
    pub careeronestop_user_id: Option<String>,
    pub careeronestop_token: Option<String>,
    pub bls_api_key: Option<String>,
    pub youtube_api_key: Option<String>,

    pub upstream_timeout_secs: u64,
    pub llm_timeout_secs: u64,

    pub skills: SkillsSettings,
    pub ttl: CacheTtls,
    pub redact_email: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkillsSettings {
    pub min_sample_size: usize,
    pub min_skill_frequency: u32,
    pub max_posting_pages: u32,
    pub postings_max_age_days: u32,
}

impl Default for SkillsSettings {
    fn default() -> Self {
        Self {
            min_sample_size: 100,
            min_skill_frequency: 5,
            max_posting_pages: 3,
            postings_max_age_days: 90,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheTtls {
    pub skills: u64,
    pub role: u64,
    pub forecast: u64,
    pub resources: u64,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            skills: 86_400,
            role: 604_800,
            forecast: 604_800,
            resources: 604_800,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let skill_defaults = SkillsSettings::default();
        let ttl_defaults = CacheTtls::default();

        Ok(Config {
            port: env_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            redis_url: optional_env("REDIS_URL"),
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            adzuna_app_id: optional_env("ADZUNA_APP_ID"),
            adzuna_app_key: optional_env("ADZUNA_APP_KEY"),
            careeronestop_user_id: optional_env("CAREERONESTOP_USER_ID"),
            careeronestop_token: optional_env("CAREERONESTOP_TOKEN"),
            bls_api_key: optional_env("BLS_API_KEY"),
            youtube_api_key: optional_env("YOUTUBE_API_KEY"),
            upstream_timeout_secs: env_or("UPSTREAM_TIMEOUT_SECS", 10)?,
            llm_timeout_secs: env_or("LLM_TIMEOUT_SECS", 120)?,
            skills: SkillsSettings {
                min_sample_size: env_or("MIN_SAMPLE_SIZE", skill_defaults.min_sample_size)?,
                min_skill_frequency: env_or(
                    "MIN_SKILL_FREQUENCY",
                    skill_defaults.min_skill_frequency,
                )?,
                max_posting_pages: env_or("MAX_POSTING_PAGES", skill_defaults.max_posting_pages)?,
                postings_max_age_days: env_or(
                    "POSTINGS_MAX_AGE_DAYS",
                    skill_defaults.postings_max_age_days,
                )?,
            },
            ttl: CacheTtls {
                skills: env_or("SKILLS_CACHE_TTL_SECS", ttl_defaults.skills)?,
                role: env_or("ROLE_CACHE_TTL_SECS", ttl_defaults.role)?,
                forecast: env_or("FORECAST_CACHE_TTL_SECS", ttl_defaults.forecast)?,
                resources: env_or("RESOURCES_CACHE_TTL_SECS", ttl_defaults.resources)?,
            },
            redact_email: env_or("REDACT_EMAIL", true)?,
        })
    }
}

/// Unset or blank variables count as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_or_parses_and_defaults() {
        std::env::set_var("SKILLPATH_TEST_PORT", "9090");
        assert_eq!(env_or::<u16>("SKILLPATH_TEST_PORT", 8080).unwrap(), 9090);
        assert_eq!(env_or::<u16>("SKILLPATH_TEST_UNSET", 8080).unwrap(), 8080);
        std::env::remove_var("SKILLPATH_TEST_PORT");
    }

    #[test]
    fn test_env_or_rejects_garbage() {
        std::env::set_var("SKILLPATH_TEST_BOOL", "maybe");
        assert!(env_or::<bool>("SKILLPATH_TEST_BOOL", true).is_err());
        std::env::remove_var("SKILLPATH_TEST_BOOL");
    }

    #[test]
    fn test_blank_optional_env_is_absent() {
        std::env::set_var("SKILLPATH_TEST_BLANK", "   ");
        assert_eq!(optional_env("SKILLPATH_TEST_BLANK"), None);
        std::env::remove_var("SKILLPATH_TEST_BLANK");
    }
}
