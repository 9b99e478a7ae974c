use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::{ConfigStore, Settings};
use crate::engine::RateEngine;
use crate::runtime::{key_identifier, HostEvent};

/// Characters of scratch text kept for display.
const SCRATCH_LIMIT: usize = 4096;

/// What the event loop should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Redraw,
    Continue,
    Quit,
}

/// Terminal host state: the engine, the scratch text being typed and the
/// settings store that UI toggles are written to.
pub struct App<S: ConfigStore> {
    pub engine: RateEngine,
    pub scratch: String,
    store: S,
    /// What is on disk. Command-line overrides live only in the engine.
    stored: Settings,
}

impl<S: ConfigStore> App<S> {
    pub fn new(store: S, stored: Settings, effective: Settings) -> Self {
        Self {
            engine: RateEngine::new(effective),
            scratch: String::new(),
            store,
            stored,
        }
    }

    pub fn stored_settings(&self) -> &Settings {
        &self.stored
    }

    pub fn handle(&mut self, event: HostEvent) -> Flow {
        match event {
            HostEvent::Tick => {
                self.engine.on_tick();
                Flow::Redraw
            }
            HostEvent::Resize => Flow::Redraw,
            HostEvent::Key(key) => self.on_key(key),
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> Flow {
        match key.code {
            KeyCode::Esc => return Flow::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Flow::Quit
            }
            KeyCode::Tab => {
                self.cycle_metric();
                return Flow::Redraw;
            }
            KeyCode::F(2) => {
                self.toggle_minmax();
                return Flow::Redraw;
            }
            KeyCode::F(3) => {
                self.cycle_darken();
                return Flow::Redraw;
            }
            KeyCode::F(4) => {
                self.toggle_word_counting();
                return Flow::Redraw;
            }
            KeyCode::Backspace => {
                self.scratch.pop();
                return Flow::Redraw;
            }
            KeyCode::Enter => {
                self.push_scratch('\n');
                return Flow::Redraw;
            }
            _ => {}
        }

        match key_identifier(&key) {
            Some(id) => {
                self.engine.on_key(&id);
                for c in id.chars() {
                    self.push_scratch(c);
                }
                Flow::Redraw
            }
            None => Flow::Continue,
        }
    }

    fn push_scratch(&mut self, c: char) {
        self.scratch.push(c);
        if self.scratch.len() > SCRATCH_LIMIT {
            let cut = self
                .scratch
                .char_indices()
                .map(|(idx, _)| idx)
                .find(|&idx| self.scratch.len() - idx <= SCRATCH_LIMIT)
                .unwrap_or(0);
            self.scratch.drain(..cut);
        }
    }

    fn cycle_metric(&mut self) {
        let next = self.engine.metric().next();
        self.engine.set_metric(next);
        self.stored.metrics = next;
        self.persist();
    }

    fn toggle_minmax(&mut self) {
        let mut settings = self.engine.settings().clone();
        settings.show_minmax = !settings.show_minmax;
        self.stored.show_minmax = settings.show_minmax;
        self.engine.update_settings(settings);
        self.persist();
    }

    fn cycle_darken(&mut self) {
        let mut settings = self.engine.settings().clone();
        settings.darken_after_pausing = settings.darken_after_pausing.next();
        self.stored.darken_after_pausing = settings.darken_after_pausing;
        log::info!("darken_after_pausing -> {}", settings.darken_after_pausing);
        self.engine.update_settings(settings);
        self.persist();
    }

    fn toggle_word_counting(&mut self) {
        let mut settings = self.engine.settings().clone();
        settings.monkeytype_counting = !settings.monkeytype_counting;
        self.stored.monkeytype_counting = settings.monkeytype_counting;
        self.engine.update_settings(settings);
        self.persist();
    }

    fn persist(&self) {
        if let Err(err) = self.store.save(&self.stored) {
            log::warn!("could not save settings: {err}");
        }
    }
}
