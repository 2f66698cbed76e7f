//! Per-request orchestration: validate, walk the strategy chain, respond.

use std::sync::Arc;

use super::{HeuristicStrategy, ReflectionRequest, ReflectionResult};
use crate::config::Config;
use crate::error::ReflectError;
use crate::providers::{OpenAiStrategy, ReflectionStrategy};

/// Stateless request handler. Strategies are tried in construction order;
/// the heuristic sits last and always produces a result, so a request that
/// passes validation cannot fail.
pub struct ReflectionService {
    strategies: Vec<Arc<dyn ReflectionStrategy>>,
}

impl ReflectionService {
    pub fn new(config: &Config) -> Self {
        let mut strategies: Vec<Arc<dyn ReflectionStrategy>> = Vec::with_capacity(2);
        if let Some(ref api_key) = config.openai_api_key {
            strategies.push(Arc::new(OpenAiStrategy::new(
                api_key,
                config.external_timeout,
            )));
        }
        strategies.push(Arc::new(HeuristicStrategy));
        Self { strategies }
    }

    /// Build from an explicit strategy chain. Used by tests and by callers
    /// that need a non-default external endpoint.
    pub fn with_strategies(strategies: Vec<Arc<dyn ReflectionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Handle one request end to end. The only error surfaces are
    /// validation (422 at the boundary) and the unreachable empty-chain
    /// case (500); external-provider trouble degrades to heuristic output.
    pub async fn handle(&self, request: &ReflectionRequest) -> Result<ReflectionResult, ReflectError> {
        request.validate()?;

        let goal = request.goal_text();
        let content = request.content.trim();

        for strategy in &self.strategies {
            if let Some(result) = strategy.try_generate(goal, content).await {
                tracing::debug!(strategy = strategy.name(), entry_id = %request.entry_id, "reflection generated");
                return Ok(result);
            }
        }

        Err(ReflectError::Internal(
            "no strategy produced a result".to_string(),
        ))
    }
}
