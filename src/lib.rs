// Library surface for the binary and for headless integration tests.
pub mod accumulator;
pub mod app;
pub mod app_dirs;
pub mod classifier;
pub mod config;
pub mod display;
pub mod engine;
pub mod idle;
pub mod metric;
pub mod rate;
pub mod runtime;
pub mod smoothing;
pub mod ui;
pub mod util;
pub mod window;

pub use config::{DarkenPolicy, Settings};
pub use engine::{RateEngine, TickReport};
pub use metric::Metric;
