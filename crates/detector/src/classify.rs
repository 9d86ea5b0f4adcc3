use common::{Trend, TrendResult};

use crate::window::BarWindow;

/// Classify the window: does it end in a strictly monotonic run of at
/// least `threshold` adjacent moves?
///
/// Walks from the newest close backward, counting strictly-increasing
/// adjacent pairs until the first pair that breaks the run, then does the
/// same for strictly-decreasing pairs. Equal adjacent closes break a run
/// in both directions — a flat close is "no movement" and terminates any
/// active run. Up is checked first; since an adjacent pair is exclusively
/// >, < or =, both counts can never reach the threshold at once, but the
/// precedence is fixed anyway.
///
/// Pure function of its inputs, no side effects.
pub fn classify(window: &BarWindow, threshold: usize) -> TrendResult {
    let closes = window.snapshot();
    if closes.len() < threshold + 1 {
        return TrendResult::none();
    }

    let up_run = run_length(&closes, |newer, older| newer > older);
    if up_run >= threshold {
        return TrendResult {
            trend: Some(Trend::Up),
            run_length: up_run,
        };
    }

    let down_run = run_length(&closes, |newer, older| newer < older);
    if down_run >= threshold {
        return TrendResult {
            trend: Some(Trend::Down),
            run_length: down_run,
        };
    }

    TrendResult::none()
}

/// Count adjacent pairs satisfying `holds(newer, older)`, scanning from
/// the newest end until the first failing pair.
fn run_length(closes: &[f64], holds: impl Fn(f64, f64) -> bool) -> usize {
    closes
        .windows(2)
        .rev()
        .take_while(|pair| holds(pair[1], pair[0]))
        .count()
}
