//! The narrative state machine.

use std::sync::Arc;

use nv_core::{Node, NodeId, ScriptGraph};
use serde::Serialize;
use tracing::{debug, warn};

use crate::clock::EngineClock;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::event::{EffectSignal, EngineEvent, RevealProgress, ViewModel};
use crate::schedule::{PendingAction, Schedule, Scheduled};
use crate::state::{EngineState, SessionId, SessionState};

/// What an `advance()` call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the node's continuation.
    Entered(NodeId),
    /// Left an ending and restarted at the start node.
    Restarted,
    /// Dialogue-only node without a continuation; nothing happened.
    Stayed,
}

/// Derived progress of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    /// Nodes entered since the last (re)start.
    pub step_count: u32,
    /// The script's chapter label.
    pub chapter_label: String,
}

/// Drives one play-through of a [`ScriptGraph`].
///
/// The engine is single-threaded and never blocks. Hosts call [`start`],
/// [`choose`], [`advance`] and [`skip`] on user input, report elapsed time
/// through [`update`], and collect output with [`drain_events`]. Inputs that
/// arrive in a state that does not accept them are rejected with a
/// recoverable [`EngineError`] and change nothing.
///
/// [`start`]: NarrativeEngine::start
/// [`choose`]: NarrativeEngine::choose
/// [`advance`]: NarrativeEngine::advance
/// [`skip`]: NarrativeEngine::skip
/// [`update`]: NarrativeEngine::update
/// [`drain_events`]: NarrativeEngine::drain_events
#[derive(Debug)]
pub struct NarrativeEngine {
    id: SessionId,
    graph: Arc<ScriptGraph>,
    config: EngineConfig,
    session: SessionState,
    clock: EngineClock,
    schedule: Schedule,
    events: Vec<EngineEvent>,
}

impl NarrativeEngine {
    /// Create an idle engine for `graph`.
    pub fn new(graph: impl Into<Arc<ScriptGraph>>, config: EngineConfig) -> Self {
        Self {
            id: SessionId::new(),
            graph: graph.into(),
            config,
            session: SessionState::new(),
            clock: EngineClock::new(),
            schedule: Schedule::new(),
            events: Vec::new(),
        }
    }

    /// Create an idle engine with [`EngineConfig::default`].
    pub fn with_defaults(graph: impl Into<Arc<ScriptGraph>>) -> Self {
        Self::new(graph, EngineConfig::default())
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// This session's ID.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// The script being played.
    pub fn graph(&self) -> &ScriptGraph {
        &self.graph
    }

    /// The session configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The state machine position.
    pub fn state(&self) -> EngineState {
        self.session.phase
    }

    /// The full session state.
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// ID of the node being shown.
    pub fn current_node_id(&self) -> Option<&NodeId> {
        self.session.current.as_ref()
    }

    /// The node being shown.
    pub fn current_node(&self) -> Option<&Node> {
        self.session
            .current
            .as_ref()
            .and_then(|id| self.graph.get(id.as_str()).ok())
    }

    /// Nodes entered since the last (re)start.
    pub fn step_count(&self) -> u32 {
        self.session.step
    }

    /// Step counter and chapter label.
    pub fn progress(&self) -> Progress {
        Progress {
            step_count: self.session.step,
            chapter_label: self.graph.chapter().to_string(),
        }
    }

    /// Characters of the current node's text shown so far.
    pub fn revealed_count(&self) -> usize {
        self.session.reveal.revealed()
    }

    /// The visible part of the current node's text.
    pub fn revealed_text(&self) -> &str {
        self.current_node()
            .map(|node| self.session.reveal.visible(&node.text))
            .unwrap_or_default()
    }

    /// Current virtual time in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.clock.now()
    }

    /// The pending timer, if any.
    pub fn pending(&self) -> Option<&Scheduled> {
        self.schedule.pending()
    }

    /// Events emitted since the last drain, oldest first.
    pub fn events(&self) -> &[EngineEvent] {
        &self.events
    }

    /// Take all events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    /// Begin the session at the script's start node.
    pub fn start(&mut self) -> EngineResult<()> {
        if self.session.phase != EngineState::Idle {
            warn!(session = %self.id, state = %self.session.phase, "start rejected");
            return Err(EngineError::AlreadyStarted(self.session.phase));
        }
        debug!(session = %self.id, chapter = self.graph.chapter(), "session started");
        let start = self.graph.start_id().clone();
        self.enter(start)
    }

    /// Reset the session and enter the start node again.
    ///
    /// Cancels any pending timer and resets the step counter, so the start
    /// node becomes step 1.
    pub fn restart(&mut self) -> EngineResult<()> {
        if let Some(cancelled) = self.schedule.cancel() {
            debug!(session = %self.id, node = %cancelled.node, "cancelled pending timer on restart");
        }
        let was_running = self.session.phase != EngineState::Idle;
        self.session.reset();
        if was_running {
            self.events.push(EngineEvent::Restarted);
            debug!(session = %self.id, "session restarted");
        }
        let start = self.graph.start_id().clone();
        self.enter(start)
    }

    /// Select the choice leading to `target`.
    pub fn choose(&mut self, target: &str) -> EngineResult<()> {
        let graph = Arc::clone(&self.graph);
        let node = self.settled_node(&graph)?;
        if !node.has_target(target) {
            warn!(session = %self.id, node = %node.id, target, "invalid choice");
            return Err(EngineError::InvalidChoice {
                node: node.id.clone(),
                target: target.to_string(),
            });
        }
        debug!(session = %self.id, from = %node.id, to = target, "choice selected");
        self.enter(NodeId::from(target))
    }

    /// Perform the current node's continue action.
    ///
    /// On an ending this restarts the session. On a pass-through node it
    /// enters the continuation, skipping any remaining transition delay. On a
    /// dialogue-only node it does nothing.
    pub fn advance(&mut self) -> EngineResult<Advance> {
        let graph = Arc::clone(&self.graph);
        let node = self.settled_node(&graph)?;
        if node.is_ending {
            self.restart()?;
            return Ok(Advance::Restarted);
        }
        if node.has_choices() {
            warn!(session = %self.id, node = %node.id, "advance rejected: choice required");
            return Err(EngineError::ChoiceRequired(node.id.clone()));
        }
        match node.continuation() {
            Some(next) => {
                debug!(session = %self.id, from = %node.id, to = %next, "continue");
                self.enter(next.clone())?;
                Ok(Advance::Entered(next.clone()))
            }
            None => Ok(Advance::Stayed),
        }
    }

    /// Show the current node's whole text at once.
    ///
    /// Idempotent once the text is fully shown.
    pub fn skip(&mut self) -> EngineResult<()> {
        match self.session.phase {
            EngineState::Idle => Err(EngineError::NotStarted),
            EngineState::Revealing => {
                if let Some(cancelled) = self.schedule.cancel() {
                    debug!(session = %self.id, node = %cancelled.node, "reveal skipped");
                }
                self.session.reveal.complete();
                self.push_reveal();
                self.settle()
            }
            EngineState::AwaitingInput | EngineState::Terminal => Ok(()),
        }
    }

    /// Move virtual time forward by `elapsed_ms`, firing every timer that
    /// falls due, in order.
    ///
    /// At most one auto-advance fires per deadline instant in a single call.
    /// A chain of zero-delay transitions moves one node per call, so a cycle
    /// of them cannot stall the host.
    pub fn update(&mut self, elapsed_ms: u64) -> EngineResult<()> {
        let target = self.clock.after(elapsed_ms);
        let mut last_hop = None;
        while let Some(pending) = self.schedule.pending().filter(|p| p.due_ms <= target) {
            let due = pending.due_ms;
            let is_hop = matches!(pending.action, PendingAction::AutoAdvance(_));
            if is_hop && last_hop == Some(due) {
                debug!(
                    session = %self.id,
                    node = %pending.node,
                    due,
                    "auto-advance deferred to next update"
                );
                break;
            }
            self.clock.advance_to(due);
            if let Some(fired) = self.schedule.take_due(due) {
                if is_hop {
                    last_hop = Some(due);
                }
                self.fire(fired)?;
            }
        }
        self.clock.advance_to(target);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// The current node, provided the engine accepts `choose`/`advance`.
    fn settled_node<'g>(&self, graph: &'g ScriptGraph) -> EngineResult<&'g Node> {
        let current = self.session.current.as_ref().ok_or(EngineError::NotStarted)?;
        match self.session.phase {
            EngineState::Idle => Err(EngineError::NotStarted),
            EngineState::Revealing => {
                warn!(session = %self.id, node = %current, "input rejected while revealing");
                Err(EngineError::NotReady(current.clone()))
            }
            EngineState::AwaitingInput | EngineState::Terminal => {
                Ok(graph.get(current.as_str())?)
            }
        }
    }

    /// Enter `id`: cancel any timer, count the step, emit the view-model,
    /// then begin revealing.
    fn enter(&mut self, id: NodeId) -> EngineResult<()> {
        let graph = Arc::clone(&self.graph);
        let node = graph.get(id.as_str())?;

        if let Some(cancelled) = self.schedule.cancel() {
            debug!(session = %self.id, node = %cancelled.node, "cancelled stale timer");
        }
        self.session.enter(id, node.text_len());
        self.events.push(EngineEvent::View(ViewModel::for_node(
            node,
            self.session.step,
            graph.chapter(),
        )));
        debug!(
            session = %self.id,
            node = %node.id,
            step = self.session.step,
            "entered node"
        );

        if !self.config.typewriter || self.session.reveal.is_complete() {
            self.session.reveal.complete();
            self.push_reveal();
            self.settle()
        } else {
            self.arm_tick(node.id.clone());
            Ok(())
        }
    }

    fn arm_tick(&mut self, node: NodeId) {
        let due = self.clock.after(self.config.tick_interval_ms);
        self.schedule.arm(node, due, PendingAction::RevealTick);
    }

    fn fire(&mut self, fired: Scheduled) -> EngineResult<()> {
        debug_assert_eq!(self.session.current.as_ref(), Some(&fired.node));
        self.clock.record_fire();
        match fired.action {
            PendingAction::RevealTick => {
                self.session.reveal.step();
                self.push_reveal();
                if self.session.reveal.is_complete() {
                    self.settle()
                } else {
                    self.arm_tick(fired.node);
                    Ok(())
                }
            }
            PendingAction::AutoAdvance(goto) => {
                debug!(session = %self.id, from = %fired.node, to = %goto, "auto-advance");
                self.enter(goto)
            }
        }
    }

    /// Finish the reveal: wait for input, or arm a transition.
    fn settle(&mut self) -> EngineResult<()> {
        let graph = Arc::clone(&self.graph);
        let current = self.session.current.clone().ok_or(EngineError::NotStarted)?;
        let node = graph.get(current.as_str())?;

        self.session.phase = if node.is_ending {
            EngineState::Terminal
        } else {
            EngineState::AwaitingInput
        };

        if let Some(auto) = &node.auto_advance {
            if let Some(effect) = &auto.effect {
                self.events.push(EngineEvent::Effect(EffectSignal {
                    node_id: current.clone(),
                    effect: effect.clone(),
                }));
            }
            let due = self.clock.after(auto.delay_ms);
            self.schedule
                .arm(current, due, PendingAction::AutoAdvance(auto.goto.clone()));
        }
        Ok(())
    }

    fn push_reveal(&mut self) {
        if let Some(node_id) = self.session.current.clone() {
            self.events.push(EngineEvent::Reveal(RevealProgress {
                node_id,
                revealed_count: self.session.reveal.revealed(),
                complete: self.session.reveal.is_complete(),
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BRANCHING: &str = r#"{
        "chapter": "Test Chapter",
        "startNode": "start",
        "nodes": {
            "start": {
                "id": "start", "name": "Guide", "text": "abc",
                "choices": [
                    {"text": "a", "goto": "ending1"},
                    {"text": "b", "goto": "ending2"},
                    {"text": "c", "goto": "gate"},
                    {"text": "d", "goto": "talk"}
                ]
            },
            "gate": {
                "id": "gate", "text": "Light.",
                "autoAdvance": {"delayMs": 200, "effect": "flash", "goto": "next"}
            },
            "next": {"id": "next", "text": "", "next": "ending1"},
            "talk": {"id": "talk", "text": "Just talk."},
            "ending1": {"id": "ending1", "text": "End one.", "isEnding": true},
            "ending2": {"id": "ending2", "text": "End two.", "isEnding": true}
        }
    }"#;

    fn engine() -> NarrativeEngine {
        NarrativeEngine::new(
            ScriptGraph::from_json(BRANCHING).unwrap(),
            EngineConfig::default(),
        )
    }

    fn views(events: &[EngineEvent]) -> Vec<&ViewModel> {
        events
            .iter()
            .filter_map(|e| match e {
                EngineEvent::View(v) => Some(v),
                _ => None,
            })
            .collect()
    }

    fn reveals(events: &[EngineEvent]) -> Vec<&RevealProgress> {
        events
            .iter()
            .filter_map(|e| match e {
                EngineEvent::Reveal(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn start_emits_view_before_reveal() {
        let mut engine = engine();
        assert_eq!(engine.state(), EngineState::Idle);
        engine.start().unwrap();

        let events = engine.drain_events();
        assert_eq!(events.len(), 1);
        let EngineEvent::View(view) = &events[0] else {
            panic!("expected view, got {events:?}");
        };
        assert_eq!(view.node_id, "start");
        assert_eq!(view.speaker_name.as_deref(), Some("Guide"));
        assert_eq!(view.step_count, 1);
        assert_eq!(view.chapter_label, "Test Chapter");
        assert_eq!(view.choices.len(), 4);
        assert_eq!(engine.state(), EngineState::Revealing);
        assert_eq!(engine.revealed_count(), 0);
    }

    #[test]
    fn input_before_start_is_rejected() {
        let mut engine = engine();
        assert!(matches!(engine.skip(), Err(EngineError::NotStarted)));
        assert!(matches!(engine.choose("ending1"), Err(EngineError::NotStarted)));
        assert!(matches!(engine.advance(), Err(EngineError::NotStarted)));
        assert_eq!(engine.state(), EngineState::Idle);
        assert!(engine.events().is_empty());
    }

    #[test]
    fn start_twice_is_rejected() {
        let mut engine = engine();
        engine.start().unwrap();
        assert!(matches!(
            engine.start(),
            Err(EngineError::AlreadyStarted(EngineState::Revealing))
        ));
        assert_eq!(engine.step_count(), 1);
    }

    #[test]
    fn tick_then_skip_reveals_everything() {
        let mut engine = engine();
        engine.start().unwrap();
        engine.drain_events();

        engine.update(30).unwrap();
        assert_eq!(engine.revealed_count(), 1);
        assert_eq!(engine.revealed_text(), "a");

        engine.skip().unwrap();
        assert_eq!(engine.revealed_count(), 3);
        assert_eq!(engine.state(), EngineState::AwaitingInput);
        assert!(engine.pending().is_none());

        let events = engine.drain_events();
        let counts: Vec<usize> = reveals(&events).iter().map(|r| r.revealed_count).collect();
        assert_eq!(counts, vec![1, 3]);

        engine.update(1_000).unwrap();
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn ticks_land_on_their_deadlines() {
        let mut engine = engine();
        engine.start().unwrap();
        engine.update(29).unwrap();
        assert_eq!(engine.revealed_count(), 0);
        engine.update(1).unwrap();
        assert_eq!(engine.revealed_count(), 1);
        engine.update(60).unwrap();
        assert_eq!(engine.revealed_count(), 3);
        assert_eq!(engine.state(), EngineState::AwaitingInput);
        assert!(engine.pending().is_none());

        let events = engine.drain_events();
        let last = reveals(&events).pop().unwrap();
        assert!(last.complete);
        assert_eq!(engine.now_ms(), 90);
    }

    #[test]
    fn one_long_update_matches_many_short_ones() {
        let mut stepped = engine();
        stepped.start().unwrap();
        for _ in 0..9 {
            stepped.update(10).unwrap();
        }

        let mut jumped = engine();
        jumped.start().unwrap();
        jumped.update(90).unwrap();

        assert_eq!(stepped.drain_events(), jumped.drain_events());
        assert_eq!(stepped.session(), jumped.session());
        assert_eq!(stepped.now_ms(), jumped.now_ms());
    }

    #[test]
    fn skip_is_idempotent() {
        let mut once = engine();
        once.start().unwrap();
        once.skip().unwrap();

        let mut twice = engine();
        twice.start().unwrap();
        twice.skip().unwrap();
        twice.skip().unwrap();

        assert_eq!(once.session(), twice.session());
        assert_eq!(once.drain_events(), twice.drain_events());
    }

    #[test]
    fn input_while_revealing_is_not_ready() {
        let mut engine = engine();
        engine.start().unwrap();
        engine.update(30).unwrap();
        let before = engine.session().clone();

        assert!(matches!(engine.choose("ending1"), Err(EngineError::NotReady(id)) if id == "start"));
        assert!(matches!(engine.advance(), Err(EngineError::NotReady(_))));
        assert_eq!(engine.session(), &before);
    }

    #[test]
    fn invalid_choice_leaves_state_unchanged() {
        let mut engine = engine();
        engine.start().unwrap();
        engine.skip().unwrap();
        engine.drain_events();
        let before = engine.session().clone();

        let err = engine.choose("next").unwrap_err();
        assert!(matches!(err, EngineError::InvalidChoice { .. }));
        assert!(err.is_recoverable());
        assert_eq!(engine.session(), &before);
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn branch_to_ending_and_restart() {
        let mut engine = engine();
        engine.start().unwrap();
        engine.skip().unwrap();
        assert_eq!(engine.step_count(), 1);

        engine.choose("ending1").unwrap();
        let events = engine.drain_events();
        let view = views(&events).pop().unwrap();
        assert_eq!(view.node_id, "ending1");
        assert_eq!(view.step_count, 2);
        assert!(view.is_ending);

        engine.skip().unwrap();
        assert_eq!(engine.state(), EngineState::Terminal);
        engine.drain_events();

        assert_eq!(engine.advance().unwrap(), Advance::Restarted);
        let events = engine.drain_events();
        assert!(matches!(events[0], EngineEvent::Restarted));
        assert!(matches!(&events[1], EngineEvent::View(v) if v.node_id == "start"));
        let view = views(&events).pop().unwrap();
        assert_eq!(view.node_id, "start");
        assert_eq!(view.step_count, 1);
        assert_eq!(engine.step_count(), 1);
        assert_eq!(engine.current_node_id().unwrap(), "start");
        assert_eq!(engine.state(), EngineState::Revealing);
    }

    #[test]
    fn transition_fires_effect_then_advances() {
        let mut engine = engine();
        engine.start().unwrap();
        engine.skip().unwrap();
        engine.choose("gate").unwrap();
        engine.drain_events();

        engine.skip().unwrap();
        assert_eq!(engine.state(), EngineState::AwaitingInput);
        let events = engine.drain_events();
        assert!(events.contains(&EngineEvent::Effect(EffectSignal {
            node_id: NodeId::from("gate"),
            effect: "flash".into(),
        })));

        engine.update(199).unwrap();
        assert_eq!(engine.current_node_id().unwrap(), "gate");
        engine.update(1).unwrap();
        assert_eq!(engine.current_node_id().unwrap(), "next");
        assert_eq!(engine.step_count(), 3);

        // "next" has empty text: fully revealed on entry.
        assert_eq!(engine.state(), EngineState::AwaitingInput);
    }

    #[test]
    fn advance_skips_transition_delay() {
        let mut engine = engine();
        engine.start().unwrap();
        engine.skip().unwrap();
        engine.choose("gate").unwrap();
        engine.skip().unwrap();
        assert!(engine.pending().is_some());

        assert_eq!(
            engine.advance().unwrap(),
            Advance::Entered(NodeId::from("next"))
        );
        assert!(engine.pending().is_none());
        engine.update(1_000).unwrap();
        assert_eq!(engine.current_node_id().unwrap(), "next");
    }

    #[test]
    fn advance_follows_next_and_stays_on_dialogue() {
        let mut engine = engine();
        engine.start().unwrap();
        engine.skip().unwrap();
        engine.choose("talk").unwrap();
        engine.skip().unwrap();
        assert_eq!(engine.advance().unwrap(), Advance::Stayed);
        assert_eq!(engine.current_node_id().unwrap(), "talk");
        assert_eq!(engine.step_count(), 2);

        let mut engine = self::engine();
        engine.start().unwrap();
        engine.skip().unwrap();
        engine.choose("gate").unwrap();
        engine.skip().unwrap();
        engine.update(200).unwrap();
        assert_eq!(
            engine.advance().unwrap(),
            Advance::Entered(NodeId::from("ending1"))
        );
    }

    #[test]
    fn advance_on_choice_node_requires_choice() {
        let mut engine = engine();
        engine.start().unwrap();
        engine.skip().unwrap();
        assert!(matches!(engine.advance(), Err(EngineError::ChoiceRequired(id)) if id == "start"));
        assert_eq!(engine.step_count(), 1);
    }

    #[test]
    fn restart_cancels_pending_tick() {
        let mut engine = engine();
        engine.start().unwrap();
        engine.skip().unwrap();
        engine.choose("ending2").unwrap();
        engine.update(30).unwrap();
        engine.drain_events();

        engine.restart().unwrap();
        engine.update(10_000).unwrap();
        let events = engine.drain_events();
        assert!(
            events
                .iter()
                .filter_map(EngineEvent::node_id)
                .all(|id| id == "start")
        );
    }

    #[test]
    fn instant_mode_reveals_on_entry() {
        let mut engine = NarrativeEngine::new(
            ScriptGraph::from_json(BRANCHING).unwrap(),
            EngineConfig::default().with_typewriter(false),
        );
        engine.start().unwrap();
        assert_eq!(engine.state(), EngineState::AwaitingInput);
        assert_eq!(engine.revealed_text(), "abc");
        let events = engine.drain_events();
        assert!(matches!(events[0], EngineEvent::View(_)));
        assert_eq!(reveals(&events)[0].revealed_count, 3);
    }

    #[test]
    fn sessions_sharing_a_graph_are_independent() {
        let graph = Arc::new(ScriptGraph::from_json(BRANCHING).unwrap());
        let mut first = NarrativeEngine::new(Arc::clone(&graph), EngineConfig::default());
        let mut second = NarrativeEngine::new(graph, EngineConfig::default());
        assert_ne!(first.id(), second.id());

        first.start().unwrap();
        first.skip().unwrap();
        first.choose("ending1").unwrap();
        second.start().unwrap();

        assert_eq!(first.step_count(), 2);
        assert_eq!(second.step_count(), 1);
        assert_eq!(second.current_node_id().unwrap(), "start");
    }

    #[test]
    fn demo_playthrough() {
        let mut engine = NarrativeEngine::new(
            nv_core::demo::script().unwrap(),
            EngineConfig::default(),
        );
        engine.start().unwrap();
        engine.skip().unwrap();
        engine.choose("before_travel").unwrap();
        engine.skip().unwrap();
        engine.update(200).unwrap();
        assert_eq!(engine.current_node_id().unwrap(), "first_travel");
        assert_eq!(engine.progress().step_count, 3);
        assert_eq!(engine.progress().chapter_label, "Chapter 1 - The Library Diary");
    }

    const ZERO_DELAY_LOOP: &str = r#"{
        "startNode": "a",
        "nodes": {
            "a": {"text": "", "autoAdvance": {"delayMs": 0, "goto": "b"}},
            "b": {"text": "", "autoAdvance": {"delayMs": 0, "effect": "flash", "goto": "a"}}
        }
    }"#;

    #[test]
    fn zero_delay_cycle_moves_one_node_per_update() {
        let mut engine = NarrativeEngine::new(
            ScriptGraph::from_json(ZERO_DELAY_LOOP).unwrap(),
            EngineConfig::default(),
        );
        engine.start().unwrap();
        assert_eq!(engine.current_node_id().unwrap(), "a");
        assert_eq!(engine.pending().unwrap().due_ms, 0);

        engine.update(0).unwrap();
        assert_eq!(engine.current_node_id().unwrap(), "b");
        assert_eq!(engine.step_count(), 2);

        engine.update(0).unwrap();
        assert_eq!(engine.current_node_id().unwrap(), "a");
        engine.update(1_000).unwrap();
        assert_eq!(engine.current_node_id().unwrap(), "b");
        assert_eq!(engine.step_count(), 4);
        assert_eq!(engine.now_ms(), 1_000);
        assert!(engine.pending().is_some());
    }

    #[test]
    fn zero_delay_chain_still_reaches_target() {
        let json = r#"{
            "startNode": "a",
            "nodes": {
                "a": {"text": "", "autoAdvance": {"delayMs": 0, "goto": "b"}},
                "b": {"text": "", "autoAdvance": {"delayMs": 0, "goto": "c"}},
                "c": {"text": "Here.", "isEnding": true}
            }
        }"#;
        let mut engine = NarrativeEngine::new(
            ScriptGraph::from_json(json).unwrap(),
            EngineConfig::default().with_typewriter(false),
        );
        engine.start().unwrap();
        engine.update(0).unwrap();
        engine.update(0).unwrap();
        assert_eq!(engine.current_node_id().unwrap(), "c");
        assert_eq!(engine.state(), EngineState::Terminal);
        assert!(engine.pending().is_none());
    }

    mod properties {
        use proptest::prelude::*;

        use super::*;

        #[derive(Debug, Clone)]
        enum Op {
            Start,
            Skip,
            Choose(usize),
            ChooseBogus,
            Advance,
            Restart,
            Update(u64),
        }

        fn arb_op() -> impl Strategy<Value = Op> {
            prop_oneof![
                Just(Op::Start),
                Just(Op::Skip),
                (0usize..4).prop_map(Op::Choose),
                Just(Op::ChooseBogus),
                Just(Op::Advance),
                Just(Op::Restart),
                (0u64..250).prop_map(Op::Update),
            ]
        }

        fn apply(engine: &mut NarrativeEngine, op: &Op) {
            let _ = match op {
                Op::Start => engine.start(),
                Op::Skip => engine.skip(),
                Op::Choose(i) => {
                    let target = engine
                        .current_node()
                        .and_then(|n| n.choices.get(*i))
                        .map(|c| c.goto.to_string())
                        .unwrap_or_else(|| "start".to_string());
                    engine.choose(&target)
                }
                Op::ChooseBogus => engine.choose("no-such-node"),
                Op::Advance => engine.advance().map(|_| ()),
                Op::Restart => engine.restart(),
                Op::Update(ms) => engine.update(*ms),
            };
        }

        proptest! {
            #[test]
            fn events_track_steps_and_current_node(ops in proptest::collection::vec(arb_op(), 1..60)) {
                let mut engine = engine();
                let mut expected_step = 0u32;
                let mut shown: Option<NodeId> = None;
                let mut last_revealed = 0usize;

                for op in &ops {
                    apply(&mut engine, op);
                    for event in engine.drain_events() {
                        match event {
                            EngineEvent::Restarted => expected_step = 0,
                            EngineEvent::View(view) => {
                                expected_step += 1;
                                prop_assert_eq!(view.step_count, expected_step);
                                shown = Some(view.node_id);
                                last_revealed = 0;
                            }
                            EngineEvent::Reveal(progress) => {
                                prop_assert_eq!(Some(&progress.node_id), shown.as_ref());
                                prop_assert!(progress.revealed_count > last_revealed
                                    || (progress.revealed_count == 0 && progress.complete));
                                last_revealed = progress.revealed_count;
                            }
                            EngineEvent::Effect(signal) => {
                                prop_assert_eq!(Some(&signal.node_id), shown.as_ref());
                            }
                        }
                    }
                    prop_assert_eq!(engine.step_count(), expected_step);
                    prop_assert_eq!(engine.current_node_id(), shown.as_ref());
                    if let Some(pending) = engine.pending() {
                        prop_assert_eq!(Some(&pending.node), engine.current_node_id());
                    }
                }
            }

            #[test]
            fn rejected_choices_change_nothing(ops in proptest::collection::vec(arb_op(), 0..30)) {
                let mut engine = engine();
                for op in &ops {
                    apply(&mut engine, op);
                }
                engine.drain_events();
                let before = engine.session().clone();
                let pending = engine.pending().cloned();

                prop_assert!(engine.choose("no-such-node").is_err());
                prop_assert_eq!(engine.session(), &before);
                prop_assert_eq!(engine.pending(), pending.as_ref());
                prop_assert!(engine.events().is_empty());
            }
        }
    }
}
