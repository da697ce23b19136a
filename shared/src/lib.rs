pub mod config;
pub mod error;
pub mod geo;
pub mod http;
pub mod logger;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::{AppError, AppResult};
