//! Predict-dispatcher: wires every trigger of a ready page to the
//! prediction endpoint and writes the outcome into the row's slot.
//!
//! Slots are resolved once, when the page is bound. A click sets the
//! loading text before it returns and leaves the request to a spawned task;
//! nothing de-duplicates clicks, so the last response to arrive wins.

pub mod registry;

pub use registry::{Binding, SkipReason, SkippedTrigger, SlotRegistry};

use crate::config::DomConfig;
use crate::error::{RequestError, UiError, UiResult};
use crate::page::Page;
use crate::transport::PredictClient;
use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredictionOutcome {
    /// The response body, exactly as it was written to the slot.
    Displayed(String),
    Failed,
}

impl PredictionOutcome {
    /// Collapses a request result into what the row shows. Failures are
    /// logged here, in the caller's span.
    pub fn from_result(result: Result<String, RequestError>) -> Self {
        match result {
            Ok(body) => PredictionOutcome::Displayed(body),
            Err(e) => {
                error!(error = %e, "Prediction request failed");
                PredictionOutcome::Failed
            }
        }
    }

    pub fn display_text<'a>(&'a self, error_text: &'a str) -> &'a str {
        match self {
            PredictionOutcome::Displayed(body) => body,
            PredictionOutcome::Failed => error_text,
        }
    }
}

/// A click whose request may still be in flight.
///
/// Dropping it detaches the request; it still runs to completion.
#[derive(Debug)]
pub struct PendingPrediction {
    pub row_id: String,
    pub request_id: Uuid,
    handle: JoinHandle<PredictionOutcome>,
}

impl PendingPrediction {
    pub async fn wait(self) -> UiResult<PredictionOutcome> {
        Ok(self.handle.await?)
    }
}

/// Current state of one bound row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowSnapshot {
    pub row_id: String,
    pub customer_id: String,
    pub text: String,
}

pub struct PredictDispatcher {
    registry: SlotRegistry,
    client: Arc<dyn PredictClient>,
    loading_text: String,
    error_text: String,
}

impl PredictDispatcher {
    /// Binds every trigger present in `page`.
    pub fn bind(page: &Page, client: Arc<dyn PredictClient>, dom: &DomConfig) -> Self {
        let registry = SlotRegistry::build(page, dom);
        info!(
            bound = registry.len(),
            skipped = registry.skipped().len(),
            client = client.name(),
            "Predict triggers bound"
        );

        Self {
            registry,
            client,
            loading_text: dom.loading_text.clone(),
            error_text: dom.error_text.clone(),
        }
    }

    /// Activates the trigger of `row_id`. Must run inside a Tokio runtime.
    pub fn click(&self, row_id: &str) -> UiResult<PendingPrediction> {
        let binding = self
            .registry
            .get(row_id)
            .ok_or_else(|| UiError::UnknownRow(row_id.to_string()))?;
        Ok(self.dispatch(binding))
    }

    /// Clicks every bound row in page order.
    pub fn click_all(&self) -> Vec<PendingPrediction> {
        self.registry.iter().map(|b| self.dispatch(b)).collect()
    }

    fn dispatch(&self, binding: &Binding) -> PendingPrediction {
        binding.slot.set_text(self.loading_text.as_str());

        let request_id = Uuid::new_v4();
        let span = info_span!(
            "predict",
            %request_id,
            row_id = %binding.row_id,
            customer_id = %binding.customer_id
        );

        let client = Arc::clone(&self.client);
        let slot = binding.slot.clone();
        let customer_id = binding.customer_id.clone();
        let error_text = self.error_text.clone();

        let handle = tokio::spawn(
            async move {
                let outcome = PredictionOutcome::from_result(client.predict(&customer_id).await);
                slot.set_text(outcome.display_text(&error_text));
                if let PredictionOutcome::Displayed(body) = &outcome {
                    info!(bytes = body.len(), "Prediction displayed");
                }
                outcome
            }
            .instrument(span),
        );

        PendingPrediction {
            row_id: binding.row_id.clone(),
            request_id,
            handle,
        }
    }

    pub fn is_bound(&self, row_id: &str) -> bool {
        self.registry.get(row_id).is_some()
    }

    pub fn rows(&self) -> impl Iterator<Item = &Binding> {
        self.registry.iter()
    }

    pub fn skipped(&self) -> &[SkippedTrigger] {
        self.registry.skipped()
    }

    pub fn snapshot(&self) -> Vec<RowSnapshot> {
        self.registry
            .iter()
            .map(|b| RowSnapshot {
                row_id: b.row_id.clone(),
                customer_id: b.customer_id.clone(),
                text: b.slot.text(),
            })
            .collect()
    }
}
