pub mod openai;

pub use openai::OpenAiStrategy;

use async_trait::async_trait;

use crate::reflection::ReflectionResult;

/// One way of producing a reflection. Strategies are tried in a fixed
/// order; returning `None` means "no result, let the next strategy run",
/// never an error the caller sees.
#[async_trait]
pub trait ReflectionStrategy: Send + Sync {
    /// Short label for logs.
    fn name(&self) -> &'static str;

    async fn try_generate(&self, goal: &str, content: &str) -> Option<ReflectionResult>;
}
