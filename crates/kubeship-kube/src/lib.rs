//! Kubeship Kube - API server client and batch operations
//!
//! This crate provides:
//! - **REST client**: entity CRUD and discovery over `reqwest`, with every
//!   failure logged and returned as a [`RequestFailure`] value
//! - **Readiness**: polling the discovery endpoint until the API version is served
//! - **Batches**: create, update or delete everything in an entities directory,
//!   rendering templated manifests with secrets on the way

pub mod client;
pub mod error;
pub mod orchestrator;
pub mod readiness;
pub mod resources;

pub use client::{DEFAULT_REQUEST_TIMEOUT, RestClient, RestResult};
pub use error::{KubeError, RequestFailure, Result};
pub use orchestrator::{BulkOrchestrator, EntityFile, list_entries};
pub use readiness::{DEFAULT_POLL_INTERVAL, ReadinessPoller, ReadinessProbe, Sleeper, TokioSleeper};
pub use resources::{EntityAction, OperationSummary};
