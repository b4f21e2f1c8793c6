//! Concurrent inventory of live GCP resources
//!
//! Enumerates resources of many types, reading each one's full state with a
//! bounded number of concurrent requests, and produces a typed inventory to
//! compare against a Terraform baseline. Types the credentials may not list
//! are left out and reported through the [`alerter::Alerter`] instead of
//! failing the scan.

pub mod alerter;
pub mod config;
pub mod error;
pub mod gcp;
pub mod output;
pub mod parallel;
pub mod remote;
pub mod resource;
pub mod scan;

pub use error::{Error, Result};
