/// Virtual session time, driven by the host.
///
/// The engine never reads wall-clock time. Hosts report elapsed time through
/// [`NarrativeEngine::update`](crate::NarrativeEngine::update), which moves
/// this clock forward in steps that land exactly on each scheduled deadline.
#[derive(Debug, Clone, Default)]
pub struct EngineClock {
    now_ms: u64,
    fired: u64,
}

impl EngineClock {
    /// Create a clock at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time in milliseconds since the engine was created.
    pub fn now(&self) -> u64 {
        self.now_ms
    }

    /// Number of scheduled actions fired so far.
    pub fn fired(&self) -> u64 {
        self.fired
    }

    /// Move the clock to `ms`. Time never runs backwards.
    pub fn advance_to(&mut self, ms: u64) {
        self.now_ms = self.now_ms.max(ms);
    }

    /// Record that a scheduled action fired at the current time.
    pub fn record_fire(&mut self) -> u64 {
        self.fired += 1;
        self.fired
    }

    /// The time `delay_ms` from now.
    pub fn after(&self, delay_ms: u64) -> u64 {
        self.now_ms.saturating_add(delay_ms)
    }
}
