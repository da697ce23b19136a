//! Core evacuation dispatch: plan generation, trip recording under
//! per-vehicle locks, the status cache and the bulk reset.

pub mod cache;
pub mod keys;
pub mod lock;
pub mod planner;
pub mod recorder;
pub mod repository;
pub mod reset;
pub mod routes;
pub mod service;


pub use service::DispatchService;
