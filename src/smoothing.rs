use itertools::Itertools;

use crate::metric::Metric;
use crate::rate::scale_and_round;
use crate::window::SlidingWindow;

/// Lowest and highest 3-point averages in the window, in sample units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub min: f64,
    pub max: f64,
}

/// A band scaled and rounded for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayBand {
    pub min: u64,
    pub max: u64,
}

impl Band {
    pub fn to_display(self, metric: Metric) -> DisplayBand {
        DisplayBand {
            min: scale_and_round(self.min, metric),
            max: scale_and_round(self.max, metric),
        }
    }
}

/// 3-point box filter over the interior of the window.
pub fn blurred(window: &SlidingWindow) -> Vec<f64> {
    window
        .iter()
        .tuple_windows::<(_, _, _)>()
        .map(|(prev, cur, next)| (prev + cur + next) / 3.0)
        .collect()
}

/// `None` while fewer than three samples exist.
pub fn smoothed_min_max(window: &SlidingWindow) -> Option<Band> {
    blurred(window)
        .into_iter()
        .minmax_by(|a, b| a.total_cmp(b))
        .into_option()
        .map(|(min, max)| Band { min, max })
}
