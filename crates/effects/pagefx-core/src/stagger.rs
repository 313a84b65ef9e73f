//! Stagger ordering for grouped children.

use serde::{Deserialize, Serialize};

/// Order in which staggered children start animating.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaggerOrder {
    /// Last child first.
    Reverse,
    /// A fresh shuffle every time the group fires.
    Random,
    /// Document order. Any unrecognized order name also lands here.
    #[default]
    #[serde(other)]
    Default,
}

/// Firing plan for `len` children: `(child_index, delay)` pairs in firing order.
///
/// The n-th fired child waits `n * step` seconds. `random` yields values in
/// `[0, 1)` and is only consulted for [`StaggerOrder::Random`].
pub fn plan(
    len: usize,
    order: StaggerOrder,
    step: f64,
    mut random: impl FnMut() -> f64,
) -> Vec<(usize, f64)> {
    let mut indices: Vec<usize> = (0..len).collect();
    match order {
        StaggerOrder::Default => {}
        StaggerOrder::Reverse => indices.reverse(),
        StaggerOrder::Random => {
            // Fisher-Yates
            for i in (1..len).rev() {
                let j = ((random() * (i + 1) as f64) as usize).min(i);
                indices.swap(i, j);
            }
        }
    }
    indices
        .into_iter()
        .enumerate()
        .map(|(n, child)| (child, n as f64 * step))
        .collect()
}
