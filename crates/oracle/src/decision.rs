//! Decision requests, responses and free-text action parsing.

use serde::{Deserialize, Serialize};
use swarm_events::AgentSnapshot;

/// AI providers the simulation knows how to route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Gemini,
    #[default]
    Anthropic,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Gemini => "gemini",
            Provider::Anthropic => "anthropic",
        }
    }

    /// Parse a provider name as it appears in config files.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "openai" => Some(Provider::OpenAi),
            "gemini" => Some(Provider::Gemini),
            "anthropic" => Some(Provider::Anthropic),
            _ => None,
        }
    }
}

/// What the oracle is asked about: an initiating agent meeting a target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRequest {
    pub initiator: AgentSnapshot,
    pub target: AgentSnapshot,
    pub provider: Provider,
}

impl DecisionRequest {
    pub fn new(initiator: AgentSnapshot, target: AgentSnapshot, provider: Provider) -> Self {
        Self {
            initiator,
            target,
            provider,
        }
    }

    /// Lowercased text the fallback engine matches keywords against.
    pub fn keyword_haystack(&self) -> String {
        format!(
            "{} {} {} {}",
            self.initiator.faction, self.initiator.task, self.target.faction, self.target.task
        )
        .to_lowercase()
    }
}

/// Movement direction in a structured decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    fn from_word(word: &str) -> Option<Self> {
        match word {
            "up" => Some(Direction::Up),
            "right" => Some(Direction::Right),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            _ => None,
        }
    }
}

/// Structured action extracted from a decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AgentAction {
    Move {
        direction: Direction,
    },
    Communicate {
        target_agent_id: String,
        message: String,
    },
    Observe,
}

/// What the oracle hands back for one interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// Raw response text.
    pub text: String,
    /// Step-by-step reasoning lines.
    pub reasoning: Vec<String>,
    /// Provider confidence in [0, 1].
    pub confidence: f32,
    /// Structured action, when one could be extracted.
    pub action: Option<AgentAction>,
}

impl Decision {
    /// Build a decision from free provider text, extracting the thinking
    /// block into reasoning lines and parsing a structured action.
    pub fn from_text(text: impl Into<String>, confidence: f32) -> Self {
        let text = text.into();
        let (thinking, remainder) = split_thinking(&text);
        let action = parse_action(&remainder);
        let reasoning = if thinking.is_empty() {
            vec![default_reasoning_for(&action).to_string()]
        } else {
            thinking
        };
        Self {
            text,
            reasoning,
            confidence,
            action: Some(action),
        }
    }
}

fn default_reasoning_for(action: &AgentAction) -> &'static str {
    match action {
        AgentAction::Move { .. } => "Moving to explore or reach objective",
        AgentAction::Communicate { .. } => "Communication is necessary for coordination",
        AgentAction::Observe => "Observing the environment",
    }
}

/// Byte offset of an ASCII needle in the haystack, ignoring ASCII case.
///
/// Needles here are all ASCII, so matched offsets are valid char
/// boundaries in the original text.
fn find_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    let haystack = haystack.as_bytes();
    let needle = needle.as_bytes();
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
}

/// Split a "Thinking:" prefix off provider text.
///
/// Returns the thinking lines and the remaining decision text. Decision
/// markers are the ones the providers were prompted to use ("I will",
/// "I decide", ...); absent a marker, everything after the thinking block
/// is treated as decision text.
pub fn split_thinking(text: &str) -> (Vec<String>, String) {
    let Some(start) = find_ignore_case(text, "thinking:") else {
        return (Vec::new(), text.to_string());
    };
    let after = &text[start + "thinking:".len()..];

    let markers = ["i will", "i decide", "i choose", "my decision"];
    let cut = markers
        .iter()
        .filter_map(|m| find_ignore_case(after, m))
        .min()
        .unwrap_or(after.len());

    let thinking = after[..cut]
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();
    let remainder = format!("{}{}", &text[..start], &after[cut..]);
    (thinking, remainder)
}

/// Extract a structured action from decision text.
///
/// Recognized shapes, checked in order:
/// - `move <up|down|left|right>`
/// - `communicate with <agent-id> ... message: "<text>"` (or `'<text>'`)
/// - anything else falls back to [`AgentAction::Observe`]
pub fn parse_action(text: &str) -> AgentAction {
    if let Some(idx) = find_ignore_case(text, "move ") {
        let word = text[idx + "move ".len()..]
            .split_whitespace()
            .next()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
            .unwrap_or("")
            .to_ascii_lowercase();
        if let Some(direction) = Direction::from_word(&word) {
            return AgentAction::Move { direction };
        }
    }

    if let Some(idx) = find_ignore_case(text, "communicate with ") {
        let rest = &text[idx + "communicate with ".len()..];
        let target: String = rest
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .collect();
        if !target.is_empty() {
            let message = extract_quoted_message(rest).unwrap_or_else(|| "Hello".to_string());
            return AgentAction::Communicate {
                target_agent_id: target,
                message,
            };
        }
    }

    AgentAction::Observe
}

/// Pull the first quoted string after a `message:` marker, or the first
/// quoted string at all.
fn extract_quoted_message(text: &str) -> Option<String> {
    let search_from = find_ignore_case(text, "message:")
        .map(|i| i + "message:".len())
        .unwrap_or(0);
    let rest = &text[search_from..];
    for quote in ['"', '\''] {
        if let Some(start) = rest.find(quote) {
            if let Some(len) = rest[start + 1..].find(quote) {
                return Some(rest[start + 1..start + 1 + len].to_string());
            }
        }
    }
    None
}
