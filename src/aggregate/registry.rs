//! Scope lookup shared across all files of a run.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::{debug, info};

use crate::aggregate::accumulator::{LabelSet, ScopedAccumulator};
use crate::error::AppError;

/// Accumulators keyed by their label values.
///
/// A scope seen again in a later file keeps accumulating from where it left off.
#[derive(Debug)]
pub struct ScopeRegistry<L: LabelSet> {
    scopes: HashMap<Vec<String>, ScopedAccumulator<L>>,
}

impl<L: LabelSet> Default for ScopeRegistry<L> {
    fn default() -> Self {
        Self {
            scopes: HashMap::new(),
        }
    }
}

impl<L: LabelSet> ScopeRegistry<L> {
    pub fn get_or_insert(&mut self, labels: Vec<String>) -> Result<&mut ScopedAccumulator<L>, AppError> {
        match self.scopes.entry(labels) {
            Entry::Occupied(entry) => {
                debug!(scope = %entry.key().join("/"), "scope already exists");
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                let acc = ScopedAccumulator::new(entry.key().clone())?;
                info!(scope = %entry.key().join("/"), "added scope");
                Ok(entry.insert(acc))
            }
        }
    }

    pub fn get(&self, labels: &[String]) -> Option<&ScopedAccumulator<L>> {
        self.scopes.get(labels)
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}
