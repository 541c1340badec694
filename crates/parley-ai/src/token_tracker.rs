//! Token usage tracking across turns and models.

use std::collections::HashMap;

use crate::TokenUsage;

/// Tracks cumulative token usage per model for one session.
pub struct TokenTracker {
    total: TokenUsage,
    by_model: HashMap<String, TokenUsage>,
    /// Number of successful invocations recorded.
    call_count: u64,
}

impl TokenTracker {
    pub fn new() -> Self {
        Self {
            total: TokenUsage::default(),
            by_model: HashMap::new(),
            call_count: 0,
        }
    }

    /// Record token usage from one invocation.
    pub fn record(&mut self, model: &str, usage: &TokenUsage) {
        self.total.input_tokens = self.total.input_tokens.saturating_add(usage.input_tokens);
        self.total.output_tokens = self.total.output_tokens.saturating_add(usage.output_tokens);
        self.call_count += 1;

        let entry = self.by_model.entry(model.to_string()).or_default();
        entry.input_tokens = entry.input_tokens.saturating_add(usage.input_tokens);
        entry.output_tokens = entry.output_tokens.saturating_add(usage.output_tokens);
    }

    pub fn for_model(&self, model: &str) -> Option<&TokenUsage> {
        self.by_model.get(model)
    }

    pub fn total_tokens(&self) -> u64 {
        self.total.total_tokens()
    }

    pub fn call_count(&self) -> u64 {
        self.call_count
    }
}

impl Default for TokenTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage(input: u64, output: u64) -> TokenUsage {
        TokenUsage {
            input_tokens: input,
            output_tokens: output,
        }
    }

    #[test]
    fn accumulates_per_model() {
        let mut tracker = TokenTracker::new();
        tracker.record("gemini-2.0-flash", &usage(100, 20));
        tracker.record("gemini-2.0-flash", &usage(50, 5));
        tracker.record("gemini-1.5-pro", &usage(1, 1));

        assert_eq!(tracker.call_count(), 3);
        assert_eq!(tracker.total_tokens(), 177);
        assert_eq!(
            tracker.for_model("gemini-2.0-flash"),
            Some(&usage(150, 25))
        );
        assert_eq!(tracker.for_model("unknown"), None);
    }

    #[test]
    fn starts_empty() {
        let tracker = TokenTracker::default();
        assert_eq!(tracker.total_tokens(), 0);
        assert_eq!(tracker.call_count(), 0);
    }
}
