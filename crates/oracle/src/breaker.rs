//! Per-provider circuit breaking.
//!
//! The breaker is session-scoped: once a provider has failed
//! [`FAILURE_THRESHOLD`] times in a row it stays open until the process
//! (or simulation session) is torn down. There is no automatic reset;
//! an open breaker routes every subsequent call straight to the fallback
//! without touching the network.

use std::collections::HashMap;

use crate::decision::Provider;

/// Consecutive failures that trip the breaker for a provider.
pub const FAILURE_THRESHOLD: u32 = 3;

#[derive(Debug, Clone, Copy, Default)]
struct ProviderState {
    consecutive_failures: u32,
    open: bool,
}

/// Tracks consecutive failures per provider and trips permanently.
#[derive(Debug, Default)]
pub struct CircuitBreaker {
    states: HashMap<Provider, ProviderState>,
}

impl CircuitBreaker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether calls to this provider should be short-circuited.
    pub fn is_open(&self, provider: Provider) -> bool {
        self.states.get(&provider).map_or(false, |s| s.open)
    }

    /// Record a failed call. Returns true if this failure tripped the breaker.
    pub fn record_failure(&mut self, provider: Provider) -> bool {
        let state = self.states.entry(provider).or_default();
        if state.open {
            return false;
        }
        state.consecutive_failures += 1;
        if state.consecutive_failures >= FAILURE_THRESHOLD {
            state.open = true;
            tracing::warn!(
                provider = provider.as_str(),
                failures = state.consecutive_failures,
                "circuit breaker tripped; routing to fallback for the rest of the session"
            );
            return true;
        }
        false
    }

    /// Record a successful call. Resets the consecutive-failure count but
    /// never re-closes an open breaker.
    pub fn record_success(&mut self, provider: Provider) {
        let state = self.states.entry(provider).or_default();
        if !state.open {
            state.consecutive_failures = 0;
        }
    }

    /// Consecutive failures currently recorded for a provider.
    pub fn failure_count(&self, provider: Provider) -> u32 {
        self.states
            .get(&provider)
            .map_or(0, |s| s.consecutive_failures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trips_after_threshold() {
        let mut breaker = CircuitBreaker::new();
        assert!(!breaker.record_failure(Provider::Anthropic));
        assert!(!breaker.record_failure(Provider::Anthropic));
        assert!(!breaker.is_open(Provider::Anthropic));
        assert!(breaker.record_failure(Provider::Anthropic));
        assert!(breaker.is_open(Provider::Anthropic));
    }

    #[test]
    fn test_success_resets_count() {
        let mut breaker = CircuitBreaker::new();
        breaker.record_failure(Provider::Gemini);
        breaker.record_failure(Provider::Gemini);
        breaker.record_success(Provider::Gemini);
        assert_eq!(breaker.failure_count(Provider::Gemini), 0);
        breaker.record_failure(Provider::Gemini);
        assert!(!breaker.is_open(Provider::Gemini));
    }

    #[test]
    fn test_no_automatic_reset() {
        let mut breaker = CircuitBreaker::new();
        for _ in 0..3 {
            breaker.record_failure(Provider::OpenAi);
        }
        assert!(breaker.is_open(Provider::OpenAi));
        breaker.record_success(Provider::OpenAi);
        assert!(breaker.is_open(Provider::OpenAi), "open breaker must stay open");
    }

    #[test]
    fn test_providers_are_independent() {
        let mut breaker = CircuitBreaker::new();
        for _ in 0..3 {
            breaker.record_failure(Provider::OpenAi);
        }
        assert!(breaker.is_open(Provider::OpenAi));
        assert!(!breaker.is_open(Provider::Gemini));
        assert!(!breaker.is_open(Provider::Anthropic));
    }
}
