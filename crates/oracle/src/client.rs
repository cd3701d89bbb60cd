//! The retrying oracle client.
//!
//! Wraps a [`DecisionOracle`] implementation with retries, the
//! per-provider circuit breaker and the rule-based fallback. The client
//! never fails: every request resolves to a decision, degraded or not.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::breaker::{CircuitBreaker, FAILURE_THRESHOLD};
use crate::decision::{Decision, DecisionRequest};
use crate::fallback::FallbackEngine;
use crate::OracleError;

/// An opaque, retryable, failable decision source.
///
/// Implementations wrap a concrete AI provider (or a test double). The
/// engine only ever talks to [`OracleClient`], which owns the failure
/// policy.
#[async_trait]
pub trait DecisionOracle: Send + Sync {
    async fn decide(&self, request: &DecisionRequest) -> Result<Decision, OracleError>;
}

/// Where a resolved decision came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionSource {
    /// The provider answered.
    Provider,
    /// The rule-based fallback answered.
    Fallback,
}

/// A decision plus its provenance.
#[derive(Debug, Clone)]
pub struct ResolvedDecision {
    pub decision: Decision,
    pub source: DecisionSource,
}

/// Client combining provider calls, retries, breaker and fallback.
pub struct OracleClient {
    oracle: Box<dyn DecisionOracle>,
    breaker: Mutex<CircuitBreaker>,
    fallback: FallbackEngine,
    max_attempts: u32,
}

impl OracleClient {
    pub fn new(oracle: Box<dyn DecisionOracle>) -> Self {
        Self::with_fallback(oracle, FallbackEngine::with_defaults())
    }

    pub fn with_fallback(oracle: Box<dyn DecisionOracle>, fallback: FallbackEngine) -> Self {
        Self {
            oracle,
            breaker: Mutex::new(CircuitBreaker::new()),
            fallback,
            max_attempts: FAILURE_THRESHOLD,
        }
    }

    /// Resolve a request. Never fails; the source tells the caller whether
    /// the provider or the fallback answered.
    pub async fn decide(&self, request: &DecisionRequest) -> ResolvedDecision {
        let provider = request.provider;

        for attempt in 1..=self.max_attempts {
            if self.breaker.lock().expect("breaker lock").is_open(provider) {
                break;
            }
            match self.oracle.decide(request).await {
                Ok(decision) => {
                    self.breaker
                        .lock()
                        .expect("breaker lock")
                        .record_success(provider);
                    return ResolvedDecision {
                        decision,
                        source: DecisionSource::Provider,
                    };
                }
                Err(error) => {
                    tracing::warn!(
                        provider = provider.as_str(),
                        attempt,
                        %error,
                        "oracle call failed"
                    );
                    self.breaker
                        .lock()
                        .expect("breaker lock")
                        .record_failure(provider);
                }
            }
        }

        ResolvedDecision {
            decision: self.fallback.decide(request),
            source: DecisionSource::Fallback,
        }
    }

    /// Whether the breaker is open for a provider.
    pub fn breaker_open(&self, provider: crate::decision::Provider) -> bool {
        self.breaker.lock().expect("breaker lock").is_open(provider)
    }
}

/// Oracle that always answers with a fixed decision. Useful for wiring
/// the engine without a provider and for deterministic tests.
#[derive(Debug, Clone)]
pub struct StaticOracle {
    decision: Decision,
}

impl StaticOracle {
    pub fn new(decision: Decision) -> Self {
        Self { decision }
    }

    /// A static oracle answering with the given confidence and a neutral
    /// observe decision.
    pub fn with_confidence(confidence: f32) -> Self {
        Self::new(Decision::from_text(
            "I will observe my surroundings before acting.",
            confidence,
        ))
    }
}

#[async_trait]
impl DecisionOracle for StaticOracle {
    async fn decide(&self, _request: &DecisionRequest) -> Result<Decision, OracleError> {
        Ok(self.decision.clone())
    }
}

/// Oracle that fails a configured number of calls before succeeding.
/// `u32::MAX` never succeeds. Tracks total call count for assertions on
/// breaker bypass behavior.
pub struct FlakyOracle {
    failures_before_success: u32,
    decision: Decision,
    calls: AtomicU32,
}

impl FlakyOracle {
    pub fn new(failures_before_success: u32, decision: Decision) -> Self {
        Self {
            failures_before_success,
            decision,
            calls: AtomicU32::new(0),
        }
    }

    pub fn always_failing() -> Self {
        Self::new(u32::MAX, Decision::from_text("unused", 0.0))
    }

    /// Total calls that actually reached this oracle.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DecisionOracle for FlakyOracle {
    async fn decide(&self, _request: &DecisionRequest) -> Result<Decision, OracleError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures_before_success {
            Err(OracleError::Unreachable("simulated outage".to_string()))
        } else {
            Ok(self.decision.clone())
        }
    }
}

#[async_trait]
impl<T: DecisionOracle + ?Sized> DecisionOracle for std::sync::Arc<T> {
    async fn decide(&self, request: &DecisionRequest) -> Result<Decision, OracleError> {
        (**self).decide(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::Provider;
    use swarm_events::{AgentSnapshot, DecisionSnapshot, KnowledgeSnapshot, WorldPos};

    fn snapshot(id: &str, faction: &str) -> AgentSnapshot {
        AgentSnapshot {
            id: id.to_string(),
            faction: faction.to_string(),
            position: WorldPos::default(),
            target: WorldPos::default(),
            speed: 0.5,
            task: "exploring".to_string(),
            knowledge: KnowledgeSnapshot::default(),
            last_decision: DecisionSnapshot::default(),
        }
    }

    fn request(provider: Provider) -> DecisionRequest {
        DecisionRequest::new(snapshot("blue-0", "blue"), snapshot("red-0", "red"), provider)
    }

    #[tokio::test]
    async fn test_provider_success() {
        let client = OracleClient::new(Box::new(StaticOracle::with_confidence(0.9)));
        let resolved = client.decide(&request(Provider::Anthropic)).await;
        assert_eq!(resolved.source, DecisionSource::Provider);
        assert_eq!(resolved.decision.confidence, 0.9);
    }

    #[tokio::test]
    async fn test_retry_recovers_within_one_call() {
        let client = OracleClient::new(Box::new(FlakyOracle::new(
            1,
            Decision::from_text("I will move up.", 0.8),
        )));
        let resolved = client.decide(&request(Provider::Anthropic)).await;
        assert_eq!(resolved.source, DecisionSource::Provider);
        assert!(!client.breaker_open(Provider::Anthropic));
    }

    #[tokio::test]
    async fn test_breaker_trips_and_bypasses_network() {
        let oracle = std::sync::Arc::new(FlakyOracle::always_failing());
        let client = OracleClient::new(Box::new(oracle.clone()));

        let first = client.decide(&request(Provider::Gemini)).await;
        assert_eq!(first.source, DecisionSource::Fallback);
        assert!(client.breaker_open(Provider::Gemini));
        assert_eq!(oracle.calls(), 3, "three consecutive failures trip the breaker");

        // Subsequent calls must not reach the oracle at all.
        let second = client.decide(&request(Provider::Gemini)).await;
        assert_eq!(second.source, DecisionSource::Fallback);
        assert_eq!(oracle.calls(), 3);
    }

    #[tokio::test]
    async fn test_breaker_is_per_provider() {
        let client = OracleClient::new(Box::new(FlakyOracle::always_failing()));
        let _ = client.decide(&request(Provider::Gemini)).await;
        assert!(client.breaker_open(Provider::Gemini));
        assert!(!client.breaker_open(Provider::Anthropic));
    }

    #[tokio::test]
    async fn test_fallback_decision_is_deterministic() {
        let client = OracleClient::new(Box::new(FlakyOracle::always_failing()));
        let a = client.decide(&request(Provider::OpenAi)).await;
        let b = client.decide(&request(Provider::OpenAi)).await;
        assert_eq!(a.decision, b.decision);
    }
}
