//! Piecewise-linear remapping of normalized noise to a height factor.

use ringworld_config::CurveKey;

/// A monotonic-in-time list of keys evaluated by linear interpolation.
///
/// Inputs before the first key or after the last key are held at the end
/// values. An empty curve is the identity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeightCurve {
    keys: Vec<CurveKey>,
}

impl HeightCurve {
    /// Build a curve from keys in any order.
    pub fn new(keys: &[CurveKey]) -> Self {
        let mut keys = keys.to_vec();
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { keys }
    }

    /// The identity curve.
    pub fn linear() -> Self {
        Self::new(&[
            CurveKey {
                time: 0.0,
                value: 0.0,
            },
            CurveKey {
                time: 1.0,
                value: 1.0,
            },
        ])
    }

    /// Evaluate the curve at `t`.
    pub fn evaluate(&self, t: f64) -> f64 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return t,
        };
        if t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }

        // First key strictly after `t`; t lies in (first.time, last.time) so 1 <= hi < len.
        let hi = self.keys.partition_point(|k| k.time <= t);
        let a = self.keys[hi - 1];
        let b = self.keys[hi];
        let span = b.time - a.time;
        if span <= 0.0 {
            return b.value;
        }
        a.value + (b.value - a.value) * (t - a.time) / span
    }

    /// The keys in ascending time order.
    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }
}
