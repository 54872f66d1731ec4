//! Element handles of the rendered page.
//!
//! Handles are cheap clones over shared cells, so the page, the dispatcher's
//! registry and in-flight prediction tasks all observe the same element.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// A control that starts a prediction when activated.
///
/// Attributes are kept exactly as found; a missing one stays `None` and is
/// dealt with when triggers are bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerElement {
    pub customer_id: Option<String>,
    pub row_id: Option<String>,
}

impl TriggerElement {
    pub fn new(customer_id: impl Into<String>, row_id: impl Into<String>) -> Self {
        Self {
            customer_id: Some(customer_id.into()),
            row_id: Some(row_id.into()),
        }
    }
}

/// Text cell that displays the outcome of one row's prediction.
#[derive(Debug, Clone, Default)]
pub struct ResultSlot {
    text: Arc<RwLock<String>>,
}

impl ResultSlot {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            text: Arc::new(RwLock::new(initial.into())),
        }
    }

    pub fn set_text(&self, text: impl Into<String>) {
        let mut guard = self.text.write().unwrap_or_else(PoisonError::into_inner);
        *guard = text.into();
    }

    pub fn text(&self) -> String {
        self.text
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// True when both handles point at the same element.
    pub fn same_element(&self, other: &ResultSlot) -> bool {
        Arc::ptr_eq(&self.text, &other.text)
    }
}

/// Singleton status element toggled between visible and hidden.
#[derive(Debug, Clone, Default)]
pub struct StatusBanner {
    visible: Arc<AtomicBool>,
}

impl StatusBanner {
    pub fn new(visible: bool) -> Self {
        Self {
            visible: Arc::new(AtomicBool::new(visible)),
        }
    }

    pub fn show(&self) {
        self.visible.store(true, Ordering::SeqCst);
    }

    pub fn hide(&self) {
        self.visible.store(false, Ordering::SeqCst);
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }
}
