//! Google Cloud REST backend
//!
//! Concrete implementations of [`crate::remote::ListApi`] and, through
//! [`client::GcpClient`], the HTTP side of [`crate::remote::GcpStateReader`].
//!
//! ```ignore
//! use gcpinv::gcp::client::{GcpClient, Service};
//!
//! let client = GcpClient::new("my-project", None).await?;
//! let url = client.service_url(Service::Compute, "projects/my-project/global/networks");
//! let networks = client.get(&url).await?;
//! ```

pub mod auth;
pub mod client;
pub mod http;
pub mod list;
