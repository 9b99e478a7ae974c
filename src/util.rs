pub fn mean<'a, I>(data: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a f64>,
{
    let (sum, count) = data
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));

    match count {
        positive if positive > 0 => Some(sum / count as f64),
        _ => None,
    }
}

/// Rounding used for every displayed number: half away from zero.
pub fn round_display(value: f64) -> u64 {
    value.max(0.0).round() as u64
}
