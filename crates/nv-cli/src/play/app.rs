//! Player state: the engine plus what the screen currently shows.

use crossterm::event::{KeyCode, KeyEvent};
use nv_engine::{EngineError, EngineEvent, EngineState, NarrativeEngine, ViewModel};
use tracing::debug;

/// How long a `flash` effect inverts the screen.
pub const FLASH_MS: u64 = 150;

pub struct PlayApp {
    engine: NarrativeEngine,
    /// The node being shown, from the latest `View` event.
    pub view: Option<ViewModel>,
    /// Remaining time of a flash effect.
    pub flash_ms: u64,
    /// Message for the status line (rejected input, restarts).
    pub notice: Option<String>,
    pub show_help: bool,
    pub should_quit: bool,
}

impl PlayApp {
    pub fn new(engine: NarrativeEngine) -> Self {
        Self {
            engine,
            view: None,
            flash_ms: 0,
            notice: None,
            show_help: false,
            should_quit: false,
        }
    }

    pub fn start(&mut self) -> Result<(), String> {
        self.engine.start().map_err(|e| e.to_string())?;
        self.absorb_events();
        Ok(())
    }

    pub fn state(&self) -> EngineState {
        self.engine.state()
    }

    pub fn chapter(&self) -> &str {
        self.engine.graph().chapter()
    }

    /// The visible prefix of the current node's text.
    pub fn visible_text(&self) -> &str {
        self.engine.revealed_text()
    }

    /// Whether the choices and continue control should be offered.
    pub fn settled(&self) -> bool {
        self.engine.state().accepts_input()
    }

    /// Report elapsed wall time to the engine.
    pub fn tick(&mut self, elapsed_ms: u64) -> Result<(), String> {
        self.flash_ms = self.flash_ms.saturating_sub(elapsed_ms);
        self.engine.update(elapsed_ms).map_err(|e| e.to_string())?;
        self.absorb_events();
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<(), String> {
        if self.show_help {
            self.show_help = false;
            return Ok(());
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('r') => {
                let result = self.engine.restart();
                self.apply(result)?;
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                let result = if self.engine.state() == EngineState::Revealing {
                    self.engine.skip()
                } else {
                    self.engine.advance().map(|_| ())
                };
                self.apply(result)?;
            }
            KeyCode::Char(c) => {
                if let Some(index) = c.to_digit(10).and_then(|d| (d as usize).checked_sub(1)) {
                    self.choose(index)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn choose(&mut self, index: usize) -> Result<(), String> {
        let Some(target) = self
            .view
            .as_ref()
            .and_then(|v| v.choices.get(index))
            .map(|c| c.target_node_id.clone())
        else {
            self.notice = Some(format!("there is no choice {}", index + 1));
            return Ok(());
        };
        let result = self.engine.choose(target.as_str());
        self.apply(result)
    }

    /// Show recoverable rejections on the status line; fail on the rest.
    fn apply(&mut self, result: Result<(), EngineError>) -> Result<(), String> {
        match result {
            Ok(()) => {
                self.absorb_events();
                Ok(())
            }
            Err(e) if e.is_recoverable() => {
                debug!(error = %e, "input rejected");
                self.notice = Some(e.to_string());
                Ok(())
            }
            Err(e) => Err(e.to_string()),
        }
    }

    fn absorb_events(&mut self) {
        let mut restarted = false;
        for event in self.engine.drain_events() {
            match event {
                EngineEvent::View(view) => {
                    self.view = Some(view);
                    self.notice = None;
                }
                EngineEvent::Reveal(_) => {}
                EngineEvent::Effect(signal) if signal.effect == "flash" => {
                    self.flash_ms = FLASH_MS;
                }
                EngineEvent::Effect(signal) => {
                    debug!(effect = %signal.effect, "ignoring unknown effect");
                }
                EngineEvent::Restarted => restarted = true,
            }
        }
        if restarted {
            self.notice = Some("Restarted".to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use nv_engine::EngineConfig;

    use super::*;

    fn app() -> PlayApp {
        let engine = NarrativeEngine::new(nv_core::demo::script().unwrap(), EngineConfig::default());
        let mut app = PlayApp::new(engine);
        app.start().unwrap();
        app
    }

    fn press(app: &mut PlayApp, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE)).unwrap();
    }

    #[test]
    fn text_reveals_with_time_and_enter_skips() {
        let mut app = app();
        assert_eq!(app.visible_text(), "");
        app.tick(60).unwrap();
        assert_eq!(app.visible_text(), "Wh");
        assert!(!app.settled());

        press(&mut app, KeyCode::Enter);
        assert!(app.settled());
        assert!(app.visible_text().ends_with("between the pages."));
    }

    #[test]
    fn visible_text_follows_engine_reveal() {
        let mut app = app();
        app.tick(90).unwrap();
        let full = &app.view.as_ref().unwrap().full_text;
        let expected: String = full.chars().take(3).collect();
        assert_eq!(app.visible_text(), expected);
    }

    #[test]
    fn number_keys_choose_and_flash_fires() {
        let mut app = app();
        press(&mut app, KeyCode::Char('1'));
        assert!(app.notice.is_some());
        assert_eq!(app.view.as_ref().unwrap().node_id, "start");

        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.view.as_ref().unwrap().node_id, "before_travel");

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.flash_ms, FLASH_MS);
        app.tick(200).unwrap();
        assert_eq!(app.flash_ms, 0);
        assert_eq!(app.view.as_ref().unwrap().node_id, "first_travel");
    }

    #[test]
    fn missing_choice_number_is_reported() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('9'));
        assert_eq!(app.notice.as_deref(), Some("there is no choice 9"));
    }

    #[test]
    fn q_quits() {
        let mut app = app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
