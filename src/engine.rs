use crate::accumulator::TickAccumulator;
use crate::classifier::{KeyClass, WordCounting};
use crate::config::Settings;
use crate::display::{status_line, Activity, Reading, Visibility};
use crate::idle::IdleDetector;
use crate::metric::Metric;
use crate::rate::display_rate;
use crate::smoothing::smoothed_min_max;
use crate::window::SlidingWindow;

/// What a tick produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub activity: Activity,
    /// Sample appended to the window, `None` on idle ticks.
    pub sample: Option<f64>,
    /// The reading to display; unchanged from the previous one on idle ticks.
    pub reading: Reading,
    pub visibility: Visibility,
}

/// Rate estimation state: counters, window and settings.
///
/// `on_key` and `on_tick` must never run concurrently. The host feeds both
/// from one event queue, which is what keeps the counters consistent.
#[derive(Debug, Clone)]
pub struct RateEngine {
    settings: Settings,
    accumulator: TickAccumulator,
    window: SlidingWindow,
    idle: IdleDetector,
    reading: Reading,
    visibility: Visibility,
}

impl RateEngine {
    pub fn new(settings: Settings) -> Self {
        let tick_rate = settings.tick_rate.max(1);
        Self {
            accumulator: TickAccumulator::new(),
            window: SlidingWindow::for_tick_rate(tick_rate),
            idle: IdleDetector::for_tick_rate(tick_rate),
            reading: Reading::default(),
            visibility: Visibility::Full,
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn metric(&self) -> Metric {
        self.settings.metrics
    }

    pub fn window(&self) -> &SlidingWindow {
        &self.window
    }

    pub fn accumulator(&self) -> &TickAccumulator {
        &self.accumulator
    }

    pub fn reading(&self) -> Reading {
        self.reading
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn status_line(&self) -> String {
        status_line(&self.reading, self.settings.metrics)
    }

    /// Keyboard handler.
    pub fn on_key(&mut self, key: &str) -> KeyClass {
        let counting = WordCounting::from_monkeytype(self.settings.monkeytype_counting);
        self.accumulator.on_key(key, counting)
    }

    /// Timer handler.
    pub fn on_tick(&mut self) -> TickReport {
        let added = self.accumulator.drain(self.settings.metrics);
        let idle_before = self.idle.is_idle(&self.window);

        if idle_before && added == 0.0 {
            self.visibility = self.settings.darken_after_pausing.visibility(Activity::Idle);
            log::debug!("idle tick, keeping {:?}", self.reading);
            return TickReport {
                activity: Activity::Idle,
                sample: None,
                reading: self.reading,
                visibility: self.visibility,
            };
        }

        if idle_before {
            log::info!("typing resumed, resetting window");
            self.window.reset();
        }
        self.window.append(added);

        let metric = self.settings.metrics;
        let band = if self.settings.show_minmax {
            smoothed_min_max(&self.window).map(|band| band.to_display(metric))
        } else {
            None
        };
        self.reading = Reading {
            rate: display_rate(&self.window, metric),
            band,
        };
        self.visibility = self.settings.darken_after_pausing.visibility(Activity::Active);
        log::debug!("active tick, sample {added}, {:?}", self.reading);

        TickReport {
            activity: Activity::Active,
            sample: Some(added),
            reading: self.reading,
            visibility: self.visibility,
        }
    }

    /// Switch metric. Accumulated counts and window history are discarded.
    pub fn set_metric(&mut self, metric: Metric) {
        if metric == self.settings.metrics {
            return;
        }
        log::info!("metric changed {} -> {}, restarting window", self.settings.metrics, metric);
        self.settings.metrics = metric;
        self.restart();
    }

    /// Apply new settings. Metric or tick rate changes restart the window.
    pub fn update_settings(&mut self, settings: Settings) {
        let restart = settings.metrics != self.settings.metrics
            || settings.tick_rate != self.settings.tick_rate;
        if !settings.show_minmax {
            self.reading.band = None;
        }
        if restart {
            log::info!(
                "settings changed ({} @ {}/s -> {} @ {}/s), restarting window",
                self.settings.metrics,
                self.settings.tick_rate,
                settings.metrics,
                settings.tick_rate
            );
        }
        self.settings = settings;
        if restart {
            let tick_rate = self.settings.tick_rate.max(1);
            self.window = SlidingWindow::for_tick_rate(tick_rate);
            self.idle = IdleDetector::for_tick_rate(tick_rate);
            self.restart();
        }
    }

    fn restart(&mut self) {
        self.accumulator.clear();
        self.window.restart();
        self.reading = Reading::default();
        self.visibility = Visibility::Full;
    }
}
