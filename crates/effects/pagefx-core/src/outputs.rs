//! Output contract of one evaluation pass.
//!
//! A pass records which items fired and in which direction, in registration order.
//! Handlers have already run by the time the caller sees it; the record is for
//! logging, tests and JS consumers.

use serde::{Deserialize, Serialize};

use crate::ids::WatchId;

/// Direction of a visibility transition.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Enter,
    Leave,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Firing {
    pub watch: WatchId,
    pub edge: Edge,
}

/// Firings produced by [`crate::ScrollTracker::evaluate`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Pass {
    #[serde(default)]
    pub firings: Vec<Firing>,
}

impl Pass {
    #[inline]
    pub fn clear(&mut self) {
        self.firings.clear();
    }

    #[inline]
    pub fn push(&mut self, watch: WatchId, edge: Edge) {
        self.firings.push(Firing { watch, edge });
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.firings.is_empty()
    }

    pub fn entered(&self) -> impl Iterator<Item = WatchId> + '_ {
        self.edges(Edge::Enter)
    }

    pub fn left(&self) -> impl Iterator<Item = WatchId> + '_ {
        self.edges(Edge::Leave)
    }

    fn edges(&self, edge: Edge) -> impl Iterator<Item = WatchId> + '_ {
        self.firings
            .iter()
            .filter(move |f| f.edge == edge)
            .map(|f| f.watch)
    }
}
