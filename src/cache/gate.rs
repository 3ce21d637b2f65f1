//! Rate limiting and cache-first access to the content generator

use serde::{Deserialize, Serialize};

use super::expiring::{content_cache_key, ExpiringCache};
use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::errors::{EngineError, EngineResult};
use crate::session::{parse_generated_content, GeneratedContent, Session};

/// Characters of the previous stage passed along as context
const CONTEXT_HINT_CHARS: usize = 200;

/// Minimum-spacing limiter: consecutive generation calls must be at least
/// `window_ms / max_requests` apart.
///
/// `max_requests == 0` is treated as 1 (one call per window).
/// [`EngineConfig::validate`] rejects 0 in loaded config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimiter {
    pub window_ms: i64,
    pub max_requests: u32,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self {
            window_ms: 60_000,
            max_requests: 10,
        }
    }
}

impl RateLimiter {
    pub fn new(window_ms: i64, max_requests: u32) -> Self {
        Self {
            window_ms,
            max_requests,
        }
    }

    pub fn min_spacing_ms(&self) -> f64 {
        self.window_ms as f64 / self.max_requests.max(1) as f64
    }

    /// Reject when fewer than `min_spacing_ms` have passed since
    /// `last_api_call` (epoch ms, 0 = never).
    pub fn check(&self, last_api_call: i64, now_ms: i64) -> EngineResult<()> {
        let elapsed = now_ms.saturating_sub(last_api_call) as f64;
        let spacing = self.min_spacing_ms();
        if elapsed < spacing {
            return Err(EngineError::RateLimited {
                retry_after_ms: (spacing - elapsed).ceil() as i64,
            });
        }
        Ok(())
    }
}

/// What the controller wants generated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRequest {
    pub topic: String,
    pub stage: u32,
    #[serde(default)]
    pub previous_content: Option<String>,
    /// Epoch ms of the previous generation call, 0 if never
    #[serde(default)]
    pub last_api_call: i64,
}

impl ContentRequest {
    pub fn new(topic: impl Into<String>, stage: u32, last_api_call: i64) -> Self {
        Self {
            topic: topic.into(),
            stage,
            previous_content: None,
            last_api_call,
        }
    }

    /// Request for the stage after the session's current one, carrying
    /// `context` (e.g. an optimization hint) as the previous-content hint
    pub fn next_stage(session: &Session, context: Option<String>) -> Self {
        Self {
            topic: session.topic.clone(),
            stage: session.current_stage + 1,
            previous_content: context,
            last_api_call: session.last_api_call,
        }
    }

    /// Shortened previous content for the generator prompt, or "none"
    pub fn context_hint(&self) -> String {
        match self.previous_content.as_deref().filter(|c| !c.is_empty()) {
            Some(previous) => {
                let head: String = previous.chars().take(CONTEXT_HINT_CHARS).collect();
                format!("{}...", head)
            }
            None => "none".to_string(),
        }
    }
}

/// The external content generator (an LLM call, a fixture, ...)
pub trait ContentGenerator {
    /// Raw generated text, expected to be the JSON stage payload
    fn generate(
        &self,
        request: &ContentRequest,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;
}

/// Result of asking the gate for content
#[derive(Debug, Clone, PartialEq)]
pub enum GateOutcome {
    /// Served from cache; no generation call happened
    Cached(GeneratedContent),
    /// Freshly generated; the caller should record a new `last_api_call`
    Generated(GeneratedContent),
}

impl GateOutcome {
    pub fn content(&self) -> &GeneratedContent {
        match self {
            Self::Cached(c) | Self::Generated(c) => c,
        }
    }

    pub fn into_content(self) -> GeneratedContent {
        match self {
            Self::Cached(c) | Self::Generated(c) => c,
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, Self::Generated(_))
    }
}

/// Cache-first, rate-limited front for a [`ContentGenerator`]
pub struct ContentGate<G, C = SystemClock> {
    generator: G,
    cache: ExpiringCache<GeneratedContent, C>,
    limiter: RateLimiter,
    content_ttl_seconds: i64,
}

impl<G: ContentGenerator, C: Clock> ContentGate<G, C> {
    pub fn new(generator: G, clock: C, limiter: RateLimiter, content_ttl_seconds: i64) -> Self {
        Self {
            generator,
            cache: ExpiringCache::with_clock(clock),
            limiter,
            content_ttl_seconds,
        }
    }

    pub fn from_config(generator: G, clock: C, config: &EngineConfig) -> Self {
        Self::new(
            generator,
            clock,
            config.rate_limiter(),
            config.cache.content_ttl_seconds,
        )
    }

    pub fn cache(&self) -> &ExpiringCache<GeneratedContent, C> {
        &self.cache
    }

    /// For archiving or clearing cached stages
    pub fn cache_mut(&mut self) -> &mut ExpiringCache<GeneratedContent, C> {
        &mut self.cache
    }

    pub fn request(&mut self, request: &ContentRequest) -> EngineResult<GateOutcome> {
        let key = content_cache_key(&request.topic, request.stage);
        if let Some(cached) = self.cache.get(&key) {
            log::debug!("Content cache hit for {}", key);
            return Ok(GateOutcome::Cached(cached.clone()));
        }

        let now_ms = self.cache.clock().now_millis();
        if let Err(e) = self.limiter.check(request.last_api_call, now_ms) {
            log::warn!("Rejected generation for {}: {}", key, e);
            return Err(e);
        }

        log::info!("Generating content for {}", key);
        let raw = self
            .generator
            .generate(request)
            .map_err(|e| EngineError::Generation(e.to_string()))?;
        let content = parse_generated_content(&raw)?;

        self.cache.set(&key, content.clone(), self.content_ttl_seconds);
        Ok(GateOutcome::Generated(content))
    }
}
