//! The rendered console page as seen by the dispatcher and the banner.
//!
//! Elements are addressed the way the markup addresses them: triggers in
//! document order, slots and the banner by element id.

pub mod elements;
pub mod html;

pub use elements::{ResultSlot, StatusBanner, TriggerElement};

use crate::config::DomConfig;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct Page {
    triggers: Vec<TriggerElement>,
    slots: HashMap<String, ResultSlot>,
    banner: Option<StatusBanner>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a trigger together with its slot under the default naming.
    pub fn with_row(self, customer_id: &str, row_id: &str) -> Self {
        let slot_id = DomConfig::default().slot_id(row_id);
        self.with_trigger(TriggerElement::new(customer_id, row_id))
            .with_slot(&slot_id)
    }

    pub fn with_trigger(mut self, trigger: TriggerElement) -> Self {
        self.triggers.push(trigger);
        self
    }

    pub fn with_slot(mut self, element_id: &str) -> Self {
        self.slots
            .entry(element_id.to_string())
            .or_insert_with(ResultSlot::default);
        self
    }

    pub fn with_banner(mut self, visible: bool) -> Self {
        self.banner = Some(StatusBanner::new(visible));
        self
    }

    pub fn triggers(&self) -> &[TriggerElement] {
        &self.triggers
    }

    pub fn slot(&self, element_id: &str) -> Option<&ResultSlot> {
        self.slots.get(element_id)
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn banner(&self) -> Option<&StatusBanner> {
        self.banner.as_ref()
    }

    pub(crate) fn insert_slot(&mut self, element_id: String, slot: ResultSlot) {
        // First element with a given id wins, as with getElementById.
        self.slots.entry(element_id).or_insert(slot);
    }

    pub(crate) fn push_trigger(&mut self, trigger: TriggerElement) {
        self.triggers.push(trigger);
    }

    pub(crate) fn set_banner(&mut self, banner: StatusBanner) {
        if self.banner.is_none() {
            self.banner = Some(banner);
        }
    }
}
