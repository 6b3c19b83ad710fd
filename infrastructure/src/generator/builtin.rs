//! Generator backed by the built-in catalog

use async_trait::async_trait;
use tracing::debug;
use tripvote_application::{ContentGenerator, GenerationRequest, GeneratorError};
use tripvote_domain::{ItemDetails, catalog::fallback};

const DEFAULT_DEPARTURE: &str = "Home";

/// Offers the fixed catalog lists. Never fails except for stages without
/// items, and its items are not marked as AI-generated.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinContentGenerator;

impl BuiltinContentGenerator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ContentGenerator for BuiltinContentGenerator {
    fn name(&self) -> &str {
        "builtin"
    }

    fn is_ai(&self) -> bool {
        false
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<ItemDetails>, GeneratorError> {
        let departure = request
            .departure_location
            .as_deref()
            .unwrap_or(DEFAULT_DEPARTURE);
        let mut items = fallback::for_stage(request.stage, departure);
        if items.is_empty() {
            return Err(GeneratorError::Empty(request.stage));
        }
        items.truncate(request.count);
        debug!("Builtin catalog offers {} {} item(s)", items.len(), request.stage);
        Ok(items)
    }
}
