//! Progress reporting and cooperative cancellation for batch generation.

use tracing::info;

/// Receives progress during a full generation and may ask it to stop.
pub trait ProgressReporter {
    /// Called after each created segment. Return `true` to cancel.
    fn report(&mut self, current: usize, total: usize) -> bool;
}

impl<F> ProgressReporter for F
where
    F: FnMut(usize, usize) -> bool,
{
    fn report(&mut self, current: usize, total: usize) -> bool {
        self(current, total)
    }
}

/// Ignores progress and never cancels.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&mut self, _current: usize, _total: usize) -> bool {
        false
    }
}

/// Logs progress at every `step`-th segment and at the end. Never cancels.
#[derive(Clone, Copy, Debug)]
pub struct LogProgress {
    step: usize,
}

impl LogProgress {
    /// Log every `step` segments (at least every segment).
    pub fn every(step: usize) -> Self {
        Self { step: step.max(1) }
    }
}

impl ProgressReporter for LogProgress {
    fn report(&mut self, current: usize, total: usize) -> bool {
        if current % self.step == 0 || current == total {
            info!(current, total, "Forging ring segment {current} of {total}");
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_reporter_can_cancel() {
        let mut calls = Vec::new();
        let mut reporter = |current: usize, total: usize| {
            calls.push((current, total));
            current >= 2
        };
        assert!(!reporter.report(1, 5));
        assert!(reporter.report(2, 5));
        assert_eq!(calls, vec![(1, 5), (2, 5)]);
    }

    #[test]
    fn test_builtin_reporters_never_cancel() {
        assert!(!NoProgress.report(1, 1));
        let mut log = LogProgress::every(0);
        assert!(!log.report(3, 10));
        assert!(!log.report(10, 10));
    }
}
