use async_trait::async_trait;

use crate::error::DomainError;

/// Liveness of the backing store
#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn ping(&self) -> Result<(), DomainError>;
}
