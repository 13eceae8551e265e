//! Per-conversion enable/disable table for field kinds.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::model::FieldKind;

/// Which field kinds the dispatcher may build.
///
/// Starts with every registered kind enabled. `unknown` has no translator
/// and is never enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldRegistry {
    disabled: BTreeSet<FieldKind>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the given kinds disabled.
    pub fn with_disabled<I>(kinds: I) -> Self
    where
        I: IntoIterator<Item = FieldKind>,
    {
        Self {
            disabled: kinds.into_iter().collect(),
        }
    }

    pub fn set_enabled(&mut self, kind: FieldKind, enabled: bool) {
        if enabled {
            self.disabled.remove(&kind);
        } else {
            self.disabled.insert(kind);
        }
    }

    pub fn is_enabled(&self, kind: FieldKind) -> bool {
        kind != FieldKind::Unknown && !self.disabled.contains(&kind)
    }

    /// Re-enable every kind.
    pub fn reset_all(&mut self) {
        self.disabled.clear();
    }

    /// State of every registered kind.
    pub fn all_states(&self) -> BTreeMap<FieldKind, bool> {
        FieldKind::REGISTERED
            .iter()
            .map(|&kind| (kind, self.is_enabled(kind)))
            .collect()
    }

    pub fn disabled_kinds(&self) -> impl Iterator<Item = FieldKind> + '_ {
        self.disabled.iter().copied()
    }
}
