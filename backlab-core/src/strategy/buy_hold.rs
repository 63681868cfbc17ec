//! Buy and hold — the degenerate baseline: long on every bar.

use crate::domain::Bar;
use crate::strategy::Signal;

pub(super) fn signals(bars: &[Bar]) -> Vec<Signal> {
    vec![Signal::Long; bars.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn always_long() {
        let bars = make_bars(&[100.0, 90.0, 110.0, 80.0]);
        let result = signals(&bars);
        assert_eq!(result.len(), 4);
        assert!(result.iter().all(|s| *s == Signal::Long));
    }

    #[test]
    fn single_bar() {
        let bars = make_bars(&[100.0]);
        assert_eq!(signals(&bars), vec![Signal::Long]);
    }
}
