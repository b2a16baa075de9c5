pub mod config;
pub mod logging;

pub mod cache;
pub mod decoded;
pub mod orchestrator;
pub mod persist;
pub mod request;
pub mod transport;

pub use decoded::Image;
pub use orchestrator::{Orchestrator, OrchestratorBuilder, OrchestratorError, OrchestratorStats};
pub use request::{
    Delivery, DeliveryStatus, FetchPolicy, ImageRequest, ImageTarget, RequestHandle, TargetHandle,
};
