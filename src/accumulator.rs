use crate::classifier::{classify_key, KeyClass, WordCounting};
use crate::metric::{CounterFamily, Metric};

/// Counters filled by keystrokes between two ticks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickAccumulator {
    chars_in_tick: u32,
    words_in_tick: f64,
    chars_since_space: u32,
}

impl TickAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one key identifier. Returns how the key was classified.
    pub fn on_key(&mut self, key: &str, counting: WordCounting) -> KeyClass {
        let class = classify_key(key);
        match class {
            KeyClass::Countable => {
                self.chars_in_tick += 1;
                self.chars_since_space += 1;
            }
            KeyClass::Space if self.chars_since_space > 0 => {
                self.words_in_tick += counting.increment(self.chars_since_space);
                self.chars_since_space = 0;
            }
            KeyClass::Space | KeyClass::Ignored => {}
        }
        class
    }

    /// Read and zero the counter backing `metric`.
    pub fn drain(&mut self, metric: Metric) -> f64 {
        match metric.counter_family() {
            CounterFamily::Characters => std::mem::take(&mut self.chars_in_tick) as f64,
            CounterFamily::Words => std::mem::take(&mut self.words_in_tick),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn chars_in_tick(&self) -> u32 {
        self.chars_in_tick
    }

    pub fn words_in_tick(&self) -> f64 {
        self.words_in_tick
    }

    pub fn chars_since_space(&self) -> u32 {
        self.chars_since_space
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(acc: &mut TickAccumulator, text: &str, counting: WordCounting) {
        for c in text.chars() {
            acc.on_key(&c.to_string(), counting);
        }
    }

    #[test]
    fn four_letters_and_a_space_make_one_normalized_word() {
        let mut acc = TickAccumulator::new();
        type_str(&mut acc, "abcd ", WordCounting::Normalized);
        assert_eq!(acc.words_in_tick(), 1.0);
        assert_eq!(acc.chars_in_tick(), 4);
        assert_eq!(acc.chars_since_space(), 0);
    }

    #[test]
    fn ten_letter_word_counts_two_point_two() {
        let mut acc = TickAccumulator::new();
        type_str(&mut acc, "abcdefghij ", WordCounting::Normalized);
        assert!((acc.words_in_tick() - 2.2).abs() < 1e-12);
    }

    #[test]
    fn double_space_adds_nothing() {
        let mut acc = TickAccumulator::new();
        type_str(&mut acc, "abcd ", WordCounting::Normalized);
        let before = acc.words_in_tick();
        acc.on_key(" ", WordCounting::Normalized);
        assert_eq!(acc.words_in_tick(), before);

        let mut empty = TickAccumulator::new();
        type_str(&mut empty, "   ", WordCounting::Normalized);
        assert_eq!(empty.words_in_tick(), 0.0);
    }

    #[test]
    fn simple_counting_is_one_per_word() {
        let mut acc = TickAccumulator::new();
        type_str(&mut acc, "a bb ccccccccc ", WordCounting::Simple);
        assert_eq!(acc.words_in_tick(), 3.0);
    }

    #[test]
    fn ignored_keys_do_not_count_toward_a_word() {
        let mut acc = TickAccumulator::new();
        assert_eq!(acc.on_key("0", WordCounting::Normalized), KeyClass::Ignored);
        assert_eq!(acc.on_key(".", WordCounting::Normalized), KeyClass::Ignored);
        assert_eq!(acc.on_key("Shift", WordCounting::Normalized), KeyClass::Ignored);
        acc.on_key(" ", WordCounting::Normalized);
        assert_eq!(acc.chars_in_tick(), 0);
        assert_eq!(acc.words_in_tick(), 0.0);
    }

    #[test]
    fn drain_reads_active_family_and_zeroes_it() {
        let mut acc = TickAccumulator::new();
        type_str(&mut acc, "abcd ", WordCounting::Normalized);

        assert_eq!(acc.drain(Metric::Cps), 4.0);
        assert_eq!(acc.chars_in_tick(), 0);
        // the word counter is untouched by a character drain
        assert_eq!(acc.words_in_tick(), 1.0);

        assert_eq!(acc.drain(Metric::Wpm), 1.0);
        assert_eq!(acc.drain(Metric::Wpm), 0.0);
    }

    #[test]
    fn word_in_progress_survives_a_drain() {
        let mut acc = TickAccumulator::new();
        type_str(&mut acc, "ab", WordCounting::Normalized);
        acc.drain(Metric::Wpm);
        type_str(&mut acc, "cd ", WordCounting::Normalized);
        assert_eq!(acc.drain(Metric::Wpm), 1.0);
    }

    #[test]
    fn clear_resets_everything() {
        let mut acc = TickAccumulator::new();
        type_str(&mut acc, "abc", WordCounting::Normalized);
        acc.clear();
        assert_eq!(acc, TickAccumulator::default());
    }
}
