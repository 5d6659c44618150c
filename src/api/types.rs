//! Shared state for the analyzer API.

use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::pipeline::runner::AnalysisPipeline;

/// Shared context for all routes. Cheap to clone; each request borrows the
/// same pipeline and configuration, and owns nothing mutable.
#[derive(Clone)]
pub struct ApiContext {
    pub config: Arc<ServiceConfig>,
    pub pipeline: Arc<AnalysisPipeline>,
}

impl ApiContext {
    pub fn new(config: Arc<ServiceConfig>, pipeline: Arc<AnalysisPipeline>) -> Self {
        Self { config, pipeline }
    }
}
