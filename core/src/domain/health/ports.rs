use std::future::Future;

use crate::domain::{common::entities::app_errors::CoreError, health::entities::HealthStatus};

#[cfg_attr(test, mockall::automock)]
pub trait HealthCheckRepository: Send + Sync {
    /// Round-trip to the history store, in milliseconds
    fn health(&self) -> impl Future<Output = Result<u64, CoreError>> + Send;
}

pub trait HealthCheckService: Send + Sync {
    fn health(&self) -> impl Future<Output = HealthStatus> + Send;
}
