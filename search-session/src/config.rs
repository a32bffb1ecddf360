use serde::Deserialize;
use serde::Serialize;

pub const DEFAULT_HISTORY_LIMIT: usize = 20;
pub const DEFAULT_INLINE_SUGGESTIONS: usize = 3;

/// Per-session knobs for the search box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Committed queries remembered, most recent first
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Suggestions shown next to the query line
    #[serde(default = "default_inline_suggestions")]
    pub inline_suggestions: usize,
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn default_inline_suggestions() -> usize {
    DEFAULT_INLINE_SUGGESTIONS
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            inline_suggestions: default_inline_suggestions(),
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.history_limit == 0 {
            return Err("history_limit must be > 0".to_string());
        }
        Ok(())
    }
}
