//! Service Layer
//!
//! Application services that orchestrate domain logic behind the
//! inbound port.

pub mod gcs_filter_service;

pub use gcs_filter_service::GcsFilterService;
