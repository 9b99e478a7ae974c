use crate::config::DarkenPolicy;
use crate::metric::Metric;
use crate::smoothing::DisplayBand;

/// Outcome of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Active,
    Idle,
}

/// How the status line should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Full,
    Dimmed,
    Hidden,
}

impl DarkenPolicy {
    pub fn visibility(self, activity: Activity) -> Visibility {
        match (self, activity) {
            (_, Activity::Active) | (DarkenPolicy::Show, Activity::Idle) => Visibility::Full,
            (DarkenPolicy::Darken, Activity::Idle) => Visibility::Dimmed,
            (DarkenPolicy::Hide, Activity::Idle) => Visibility::Hidden,
        }
    }
}

/// The numbers currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Reading {
    pub rate: u64,
    pub band: Option<DisplayBand>,
}

/// `"<rate> <metric>"`, plus `" (<min>-<max>)"` when a band is present.
pub fn status_line(reading: &Reading, metric: Metric) -> String {
    match reading.band {
        Some(band) => format!("{} {} ({}-{})", reading.rate, metric, band.min, band.max),
        None => format!("{} {}", reading.rate, metric),
    }
}
