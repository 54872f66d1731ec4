//! Setup-time mapping from row id to result slot.

use crate::config::DomConfig;
use crate::page::{Page, ResultSlot};
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

/// A trigger resolved to its customer, row and slot.
#[derive(Debug, Clone)]
pub struct Binding {
    pub customer_id: String,
    pub row_id: String,
    pub slot: ResultSlot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingCustomerId,
    MissingRowId,
    MissingSlot { slot_id: String },
    DuplicateRow,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingCustomerId => write!(f, "missing customer id attribute"),
            SkipReason::MissingRowId => write!(f, "missing row id attribute"),
            SkipReason::MissingSlot { slot_id } => write!(f, "no element with id {}", slot_id),
            SkipReason::DuplicateRow => write!(f, "row id already bound by an earlier trigger"),
        }
    }
}

/// A trigger that could not be bound; `index` is its position in the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedTrigger {
    pub index: usize,
    pub row_id: Option<String>,
    pub reason: SkipReason,
}

#[derive(Debug, Default)]
pub struct SlotRegistry {
    bindings: HashMap<String, Binding>,
    order: Vec<String>,
    skipped: Vec<SkippedTrigger>,
}

impl SlotRegistry {
    pub fn build(page: &Page, dom: &DomConfig) -> Self {
        let mut registry = Self::default();

        for (index, trigger) in page.triggers().iter().enumerate() {
            let unbound = |reason: SkipReason| SkippedTrigger {
                index,
                row_id: trigger.row_id.clone(),
                reason,
            };

            let Some(row_id) = trigger.row_id.as_deref() else {
                registry.skip(unbound(SkipReason::MissingRowId));
                continue;
            };
            let Some(customer_id) = trigger.customer_id.as_deref() else {
                registry.skip(unbound(SkipReason::MissingCustomerId));
                continue;
            };
            if registry.bindings.contains_key(row_id) {
                registry.skip(unbound(SkipReason::DuplicateRow));
                continue;
            }
            let slot_id = dom.slot_id(row_id);
            let Some(slot) = page.slot(&slot_id) else {
                registry.skip(unbound(SkipReason::MissingSlot { slot_id }));
                continue;
            };

            registry.order.push(row_id.to_string());
            registry.bindings.insert(
                row_id.to_string(),
                Binding {
                    customer_id: customer_id.to_string(),
                    row_id: row_id.to_string(),
                    slot: slot.clone(),
                },
            );
        }

        registry
    }

    fn skip(&mut self, skipped: SkippedTrigger) {
        warn!(
            index = skipped.index,
            row_id = ?skipped.row_id,
            reason = %skipped.reason,
            "Predict trigger left unbound"
        );
        self.skipped.push(skipped);
    }

    pub fn get(&self, row_id: &str) -> Option<&Binding> {
        self.bindings.get(row_id)
    }

    /// Bindings in page order.
    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.order.iter().filter_map(|row| self.bindings.get(row))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn skipped(&self) -> &[SkippedTrigger] {
        &self.skipped
    }
}
