//! Periodic review store probe.

use std::sync::Arc;

use domain::services::RatingSchemaService;

use super::scheduler::{Job, JobFrequency};

/// Publishes the `review_store_available` gauge.
///
/// Probes the store directly rather than reading the memoized availability
/// the pipeline uses, so the gauge follows the live state.
pub struct StoreProbeJob {
    service: Arc<RatingSchemaService>,
}

impl StoreProbeJob {
    pub fn new(service: Arc<RatingSchemaService>) -> Self {
        Self { service }
    }
}

#[async_trait::async_trait]
impl Job for StoreProbeJob {
    fn name(&self) -> &'static str {
        "review_store_probe"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Seconds(30)
    }

    async fn execute(&self) -> Result<(), String> {
        let result = self.service.check_store().await;
        let available = matches!(result, Ok(true));
        metrics::gauge!("review_store_available").set(if available { 1.0 } else { 0.0 });
        match result {
            Ok(true) => Ok(()),
            Ok(false) => Err("review store is not available".to_string()),
            Err(err) => Err(err.to_string()),
        }
    }
}
