use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// Unit the readout is displayed in.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Metric {
    #[default]
    Wpm,
    Cps,
    Cpm,
}

/// Which accumulator counter feeds the window for a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterFamily {
    Characters,
    Words,
}

impl Metric {
    /// Multiplier turning a per-second rate into this metric's unit.
    pub fn scale_factor(self) -> f64 {
        match self {
            Metric::Cps => 1.0,
            Metric::Cpm | Metric::Wpm => 60.0,
        }
    }

    pub fn counter_family(self) -> CounterFamily {
        match self {
            Metric::Cps | Metric::Cpm => CounterFamily::Characters,
            Metric::Wpm => CounterFamily::Words,
        }
    }

    /// The metric after this one, wrapping around.
    pub fn next(self) -> Self {
        let all: Vec<Metric> = Metric::iter().collect();
        let idx = all.iter().position(|m| *m == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }
}
