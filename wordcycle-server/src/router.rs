//! Router construction and shared state.

use std::sync::Arc;

use anyhow::Result;
use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use wordcycle_core::{
    CycleSampler, GistSeenStore, SeenSetSampler, ShuffleSampler, VocabularySource,
};

use crate::config::{Backend, ServerConfig};
use crate::handlers;

#[derive(Clone)]
pub struct AppState {
    pub sampler: Arc<dyn CycleSampler>,
}

impl AppState {
    pub fn new(sampler: Arc<dyn CycleSampler>) -> Self {
        Self { sampler }
    }

    /// Load the vocabulary and wire the configured backend. A dataset that
    /// fails to load yields an empty vocabulary, not a startup failure.
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let source = VocabularySource::new(&config.vocab_path);
        let vocabulary = source.load_or_empty();
        let reload = config.reload_on_cycle.then(|| source.clone());

        let sampler: Arc<dyn CycleSampler> = match &config.backend {
            Backend::Memory => {
                let mut sampler = ShuffleSampler::new(vocabulary);
                if let Some(source) = reload {
                    sampler = sampler.with_reload(source);
                }
                Arc::new(sampler)
            }
            Backend::Gist(gist) => {
                tracing::info!(
                    gist_id = %gist.gist_id,
                    file = %gist.filename,
                    "Using gist seen-set store"
                );
                let store = GistSeenStore::new(gist.clone())?;
                let mut sampler = SeenSetSampler::new(vocabulary, store);
                if let Some(source) = reload {
                    sampler = sampler.with_reload(source);
                }
                Arc::new(sampler)
            }
        };
        Ok(Self::new(sampler))
    }
}

/// Build the axum router.
///
/// `/get` always dispenses. `/` dispenses on the in-memory backend and is a
/// liveness probe on the remote backend.
pub fn build_router(state: AppState) -> Router {
    let root = if state.sampler.backend() == "memory" {
        get(handlers::next_word::next_word)
    } else {
        get(handlers::health::health)
    };

    Router::new()
        .route("/", root)
        .route("/get", get(handlers::next_word::next_word))
        .route("/api/next-word", get(handlers::next_word::next_word))
        .route("/health", get(handlers::health::health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
