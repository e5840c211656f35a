//! Heuristic token budget estimation.
//!
//! Uses the approximation tokens ≈ characters / 4 with floor division. This is
//! a deliberate coarse heuristic, not a real tokenizer; boundary values depend
//! on the floor rounding.

use serde::Serialize;

/// Tokens held back from the prompt budget as room for the response.
pub const RESPONSE_RESERVE_TOKENS: u32 = 50;

/// Remaining-token threshold below which the budget counts as low.
const LOW_BUDGET_THRESHOLD: i64 = 100;

/// Characters per estimated token.
const CHARS_PER_TOKEN: usize = 4;

/// Token budget for one prompt, recomputed on every change to the input text.
///
/// `remaining` may go negative; it gates submission and feeds the
/// chat-protocol `max_tokens` field, it is never sent to the backend as-is
/// otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenBudget {
    pub max_tokens: u32,
    pub estimated_used: u32,
    pub reserve: u32,
    pub remaining: i64,
}

impl TokenBudget {
    pub fn status(&self) -> BudgetStatus {
        BudgetStatus::classify(self.remaining)
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining <= 0
    }
}

/// Estimate the budget for `text`, counting the system prompt against it when
/// one will be sent.
///
/// `text` must be the raw, untrimmed user input; trimming is only ever used
/// to test emptiness, never before counting.
pub fn estimate(text: &str, system_prompt: Option<&str>, max_tokens: u32) -> TokenBudget {
    let mut estimated_used = approx_tokens(text);
    if let Some(prompt) = system_prompt {
        estimated_used += approx_tokens(prompt);
    }

    let remaining =
        max_tokens as i64 - estimated_used as i64 - RESPONSE_RESERVE_TOKENS as i64;

    TokenBudget {
        max_tokens,
        estimated_used,
        reserve: RESPONSE_RESERVE_TOKENS,
        remaining,
    }
}

/// Floor division over Unicode scalar count.
fn approx_tokens(text: &str) -> u32 {
    (text.chars().count() / CHARS_PER_TOKEN) as u32
}

/// Tri-state classification of the remaining budget, shown as a color by the
/// presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetStatus {
    Ok,
    Low,
    Exhausted,
}

impl BudgetStatus {
    pub fn classify(remaining: i64) -> Self {
        if remaining <= 0 {
            BudgetStatus::Exhausted
        } else if remaining < LOW_BUDGET_THRESHOLD {
            BudgetStatus::Low
        } else {
            BudgetStatus::Ok
        }
    }

    /// Display color used by the token counter widget.
    pub fn display_color(&self) -> &'static str {
        match self {
            BudgetStatus::Ok => "green",
            BudgetStatus::Low => "orange",
            BudgetStatus::Exhausted => "red",
        }
    }
}
