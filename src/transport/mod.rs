//! Outbound calls to the prediction service.

pub mod http;

pub use http::{HttpBackend, IndexQuery};

use crate::error::RequestError;
use async_trait::async_trait;

#[async_trait]
pub trait PredictClient: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &'static str;

    /// Requests a prediction for one customer and returns the raw body.
    async fn predict(&self, customer_id: &str) -> Result<String, RequestError>;
}
