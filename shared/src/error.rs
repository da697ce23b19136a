//! Error taxonomy shared by every service.
//!
//! Validation, NotFound, Conflict and CapacityUnavailable carry caller-facing
//! messages. Database and cache failures are internal: they surface to the
//! caller as a generic failure and keep their detail for the logs.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or out-of-range input. No mutation has occurred.
    #[error("{0}")]
    Validation(String),

    /// A referenced zone or vehicle does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Duplicate id on creation, or a vehicle currently locked.
    /// Retryable by the caller after a short delay.
    #[error("{0}")]
    Conflict(String),

    /// Rescue is needed but structurally impossible to serve: no vehicles,
    /// or none within range. Distinct from "nothing to do".
    #[error("{0}")]
    CapacityUnavailable(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("cache pool error: {0}")]
    CachePool(#[from] deadpool_redis::PoolError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type AppResult<T> = Result<T, AppError>;
