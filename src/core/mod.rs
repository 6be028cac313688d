pub mod aggregator;
pub mod parsers;
pub mod registry;

pub use crate::domain::model::{FetchedResponse, ResponseBody, ServiceOutput, ShareReport};
pub use crate::domain::ports::Transport;
pub use crate::utils::error::Result;
