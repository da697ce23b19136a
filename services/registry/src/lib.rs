//! Zone and vehicle record keeping: validation, persistence and the CRUD
//! HTTP surface.

pub mod repository;
pub mod routes;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use service::{VehicleService, ZoneService};
