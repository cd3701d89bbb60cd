//! Deterministic rule-based fallback decisions.
//!
//! When the provider fails or its breaker is open, the interaction still
//! has to resolve. The fallback engine matches keywords from the request
//! against a template table and hands back a canned decision; a generic
//! observe decision covers everything else. Selection is deterministic:
//! rules are checked in declaration order and the first match wins.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::decision::{parse_action, Decision, DecisionRequest};

/// Confidence attached to every fallback decision.
///
/// Kept below the trust gate so a degraded oracle never moves trust
/// upward.
pub const FALLBACK_CONFIDENCE: f32 = 0.5;

/// One keyword-matched canned response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackRule {
    /// Lowercase keyword searched for in the request haystack.
    pub keyword: String,
    /// Canned decision text; actions are parsed from it like provider text.
    pub text: String,
    /// Reasoning lines reported with the decision.
    pub reasoning: Vec<String>,
}

/// The full fallback template table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackTemplates {
    #[serde(default)]
    pub rules: Vec<FallbackRule>,
    /// Text of the generic decision used when no rule matches.
    pub generic_text: String,
    /// Reasoning of the generic decision.
    pub generic_reasoning: Vec<String>,
}

impl FallbackTemplates {
    /// Loads templates from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, TemplateError> {
        let content = std::fs::read_to_string(path).map_err(TemplateError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Parses templates from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, TemplateError> {
        toml::from_str(content).map_err(TemplateError::Toml)
    }
}

impl Default for FallbackTemplates {
    fn default() -> Self {
        default_templates()
    }
}

/// Errors that can occur loading fallback templates.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("IO error: {0}")]
    Io(std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(toml::de::Error),
}

/// Picks canned decisions for failed oracle calls.
#[derive(Debug, Clone)]
pub struct FallbackEngine {
    templates: FallbackTemplates,
}

impl FallbackEngine {
    pub fn new(templates: FallbackTemplates) -> Self {
        Self { templates }
    }

    pub fn with_defaults() -> Self {
        Self::new(default_templates())
    }

    /// Resolve a request without the provider. First rule whose keyword
    /// appears in the request haystack wins; otherwise the generic decision.
    pub fn decide(&self, request: &DecisionRequest) -> Decision {
        let haystack = request.keyword_haystack();
        for rule in &self.templates.rules {
            if haystack.contains(&rule.keyword) {
                return Decision {
                    text: rule.text.clone(),
                    reasoning: rule.reasoning.clone(),
                    confidence: FALLBACK_CONFIDENCE,
                    action: Some(parse_action(&rule.text)),
                };
            }
        }
        Decision {
            text: self.templates.generic_text.clone(),
            reasoning: self.templates.generic_reasoning.clone(),
            confidence: FALLBACK_CONFIDENCE,
            action: Some(parse_action(&self.templates.generic_text)),
        }
    }

    pub fn templates(&self) -> &FallbackTemplates {
        &self.templates
    }
}

impl Default for FallbackEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Returns the compiled-in fallback table.
pub fn default_templates() -> FallbackTemplates {
    FallbackTemplates {
        rules: vec![
            FallbackRule {
                keyword: "deceiving".to_string(),
                text: "The other agent is acting strangely; I keep my distance and observe."
                    .to_string(),
                reasoning: vec![
                    "AI service unavailable".to_string(),
                    "Target behavior flagged as deceptive".to_string(),
                ],
            },
            FallbackRule {
                keyword: "red".to_string(),
                text: "A red agent is nearby; I stay cautious and observe before engaging."
                    .to_string(),
                reasoning: vec![
                    "AI service unavailable".to_string(),
                    "Adversarial faction detected nearby".to_string(),
                ],
            },
            FallbackRule {
                keyword: "blue".to_string(),
                text: "An allied agent is nearby; I move up and signal my route.".to_string(),
                reasoning: vec![
                    "AI service unavailable".to_string(),
                    "Cooperative faction detected nearby".to_string(),
                ],
            },
        ],
        generic_text: "Nothing notable nearby; I continue and observe.".to_string(),
        generic_reasoning: vec![
            "Error communicating with AI service".to_string(),
            "Falling back to observation mode".to_string(),
        ],
    }
}

/// Returns the default fallback table as a TOML string, for seeding a
/// user-editable file.
pub fn default_templates_toml() -> String {
    toml::to_string_pretty(&default_templates()).expect("default templates serialize")
}
