//! Configuration for a narrative session.

/// Default delay between two revealed characters, in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 30;

/// Configuration for a narrative session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Delay between two revealed characters, in milliseconds. Never zero.
    pub tick_interval_ms: u64,
    /// Reveal text one character per tick. When off, text appears at once.
    pub typewriter: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            typewriter: true,
        }
    }
}

impl EngineConfig {
    /// Set the reveal tick interval (clamped to at least 1 ms).
    pub fn with_tick_interval(mut self, ms: u64) -> Self {
        self.tick_interval_ms = ms.max(1);
        self
    }

    /// Enable or disable the character-by-character reveal.
    pub fn with_typewriter(mut self, enabled: bool) -> Self {
        self.typewriter = enabled;
        self
    }
}
