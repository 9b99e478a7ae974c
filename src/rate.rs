use crate::metric::Metric;
use crate::util::round_display;
use crate::window::SlidingWindow;

/// Scale a per-tick-sample value into `metric` units and round it for display.
pub fn scale_and_round(value: f64, metric: Metric) -> u64 {
    round_display(value * metric.scale_factor())
}

/// The readout for the current window contents.
pub fn display_rate(window: &SlidingWindow, metric: Metric) -> u64 {
    scale_and_round(window.average(), metric)
}
