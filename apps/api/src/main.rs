mod cache;
mod confidence;
mod config;
mod errors;
mod forecast;
mod gaps;
mod llm_client;
mod models;
mod pipeline;
mod providers;
mod resources;
mod resume;
mod roles;
mod routes;
mod skills;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cache::{RedisStore, TtlCache};
use crate::config::Config;
use crate::forecast::Forecaster;
use crate::gaps::{GapEngine, GapEvaluator, LlmGapEvaluator};
use crate::llm_client::LlmClient;
use crate::pipeline::Pipeline;
use crate::providers::{
    http_client, AdzunaClient, BlsClient, CareerOneStopClient, OccupationLookup, PostingsSource,
    StatisticsSource, VideoSearch, YouTubeClient,
};
use crate::resources::ResourceFinder;
use crate::resume::{DocumentModel, LlmResumeModel, ResumeParser};
use crate::roles::RoleMapper;
use crate::routes::build_router;
use crate::skills::{LlmSkillAnalyzer, SkillAnalyzer, SkillsExtractor};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SkillPath API v{}", env!("CARGO_PKG_VERSION"));

    let cache = build_cache(&config);
    info!("Cache backend: {}", cache.backend_name());

    let pipeline = build_pipeline(&config, cache);

    let state = AppState {
        pipeline: Arc::new(pipeline),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Redis when `REDIS_URL` is set and valid, process memory otherwise.
fn build_cache(config: &Config) -> TtlCache {
    match config.redis_url.as_deref() {
        Some(url) => match RedisStore::open(url) {
            Ok(store) => TtlCache::new(Arc::new(store)),
            Err(e) => {
                warn!("Invalid REDIS_URL ({e}); falling back to in-memory cache");
                TtlCache::in_memory()
            }
        },
        None => TtlCache::in_memory(),
    }
}

/// Constructs every provider whose credentials are present. Absent providers
/// leave their stage on its fallback path.
fn build_pipeline(config: &Config, cache: TtlCache) -> Pipeline {
    let http = http_client(Duration::from_secs(config.upstream_timeout_secs));
    let llm = config.anthropic_api_key.clone().map(|key| {
        LlmClient::new(key, Duration::from_secs(config.llm_timeout_secs))
    });
    match &llm {
        Some(_) => info!("LLM client initialized (model: {})", llm_client::MODEL),
        None => warn!("ANTHROPIC_API_KEY not set; model-backed stages use their fallbacks"),
    }

    let lookup: Option<Arc<dyn OccupationLookup>> = match (
        config.careeronestop_user_id.clone(),
        config.careeronestop_token.clone(),
    ) {
        (Some(user_id), Some(token)) => Some(Arc::new(CareerOneStopClient::new(
            http.clone(),
            user_id,
            token,
        ))),
        _ => None,
    };
    let postings: Option<Arc<dyn PostingsSource>> =
        match (config.adzuna_app_id.clone(), config.adzuna_app_key.clone()) {
            (Some(app_id), Some(app_key)) => {
                Some(Arc::new(AdzunaClient::new(http.clone(), app_id, app_key)))
            }
            _ => None,
        };
    // Public v1 access works without a key.
    let statistics: Option<Arc<dyn StatisticsSource>> =
        Some(Arc::new(BlsClient::new(http.clone(), config.bls_api_key.clone())));
    let videos: Option<Arc<dyn VideoSearch>> = config
        .youtube_api_key
        .clone()
        .map(|key| Arc::new(YouTubeClient::new(http.clone(), key)) as Arc<dyn VideoSearch>);

    let analyzer = llm
        .clone()
        .map(|c| Arc::new(LlmSkillAnalyzer(c)) as Arc<dyn SkillAnalyzer>);
    let document_model = llm
        .clone()
        .map(|c| Arc::new(LlmResumeModel(c)) as Arc<dyn DocumentModel>);
    let gap_model = llm.map(|c| Arc::new(LlmGapEvaluator(c)) as Arc<dyn GapEvaluator>);

    info!(
        occupation_lookup = lookup.is_some(),
        postings = postings.is_some(),
        video_search = videos.is_some(),
        bls_registered = config.bls_api_key.is_some(),
        "Providers configured"
    );

    Pipeline {
        roles: RoleMapper::new(lookup, cache.clone(), config.ttl.role),
        skills: SkillsExtractor::new(
            postings,
            analyzer,
            cache.clone(),
            config.skills,
            config.ttl.skills,
        ),
        forecast: Forecaster::new(statistics, cache.clone(), config.ttl.forecast),
        resume: ResumeParser::new(document_model, config.redact_email),
        gaps: GapEngine::new(gap_model),
        resources: ResourceFinder::new(videos, cache.clone(), config.ttl.resources),
        cache,
    }
}
