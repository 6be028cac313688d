pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::http::ReqwestTransport;
pub use config::AggregatorConfig;
pub use crate::core::{
    aggregator::Aggregator,
    registry::{ServiceDefinition, ServiceRegistry},
};
pub use domain::model::{FetchedResponse, ResponseBody, ServiceOutput, ShareReport};
pub use domain::ports::Transport;
pub use utils::error::{Result, SocialworthError};
