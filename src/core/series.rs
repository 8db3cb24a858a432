use std::{
    cmp::Ordering,
    ops::{Add, Mul, Sub},
};

use itertools::Itertools;

impl<T> Quantile for T where T: ?Sized {}

pub trait Quantile {
    /// Quantile with linear interpolation between the closest ranks.
    ///
    /// `p` is clamped to `0.0..=1.0`. Returns [`None`] for an empty iterator.
    #[must_use]
    fn quantile<V>(self, p: f64) -> Option<V>
    where
        Self: Sized + Iterator<Item = V>,
        V: Copy + PartialOrd + Add<Output = V> + Sub<Output = V> + Mul<f64, Output = V>,
    {
        let mut values = self.collect_vec();
        if values.is_empty() {
            return None;
        }
        values.sort_unstable_by(compare);

        #[expect(clippy::cast_precision_loss)]
        let rank = p.clamp(0.0, 1.0) * (values.len() - 1) as f64;

        #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let (lower, upper) = (rank.floor() as usize, rank.ceil() as usize);

        #[expect(clippy::cast_precision_loss)]
        let weight = rank - lower as f64;

        Some(values[lower] + (values[upper] - values[lower]) * weight)
    }
}

fn compare<V: PartialOrd>(lhs: &V, rhs: &V) -> Ordering {
    lhs.partial_cmp(rhs).unwrap_or(Ordering::Equal)
}
