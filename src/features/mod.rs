//! The individual pipeline steps, from file validation to presenting the address.
pub mod coordinates;
pub mod error;
pub mod extraction;
pub mod geocoding;
pub mod presentation;
pub mod validation;
