//! Infoblox WAPI Client
//!
//! A Rust client library for the Infoblox Web API (WAPI) object manager.
//! Provides type-safe models and methods for the network and DNS record
//! objects managed by the Infoblox resource provider.
//!
//! # Example
//!
//! ```no_run
//! use infoblox_client::{ClientConfig, ExtAttrs, InfobloxClient, ObjectManagerTrait};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = InfobloxClient::new(ClientConfig {
//!     server: "infoblox.example.com".to_string(),
//!     username: "admin".to_string(),
//!     password: "infoblox".to_string(),
//!     ..ClientConfig::default()
//! })?;
//!
//! // Claim a fixed network
//! let network = client
//!     .create_network("default", "10.10.0.0/24", "demo-network", "tenant-a", &ExtAttrs::new())
//!     .await?;
//!
//! // Allocate the next free /24 from a container
//! let allocated = client
//!     .allocate_network("default", "10.0.0.0/16", 24, "demo-network", "tenant-a", &ExtAttrs::new())
//!     .await?;
//!
//! client.delete_network(&network.reference).await?;
//! client.delete_network(&allocated.reference).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **IPAM Operations**: fixed networks and next-available-network allocation
//! - **DNS Operations**: SRV records
//! - **Object-manager EAs**: `CMP Type` and `Tenant ID` stamped on every created object
//! - **Retry Logic**: connection failures retried with Fibonacci backoff
//! - **Mocking**: in-memory `MockObjectManager` behind the `test-util` feature

pub mod backoff;
pub mod client;
pub mod common;
pub mod error;
pub mod models;
#[path = "trait.rs"]
pub mod object_manager_trait;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;

pub use client::{ClientConfig, InfobloxClient};
pub use common::HttpClient;
pub use error::InfobloxError;
pub use models::*;
pub use object_manager_trait::ObjectManagerTrait;
#[cfg(any(test, feature = "test-util"))]
pub use mock::MockObjectManager;
