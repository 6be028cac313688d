pub mod toml_config;

pub use toml_config::{AggregationConfig, AggregatorConfig, HttpConfig, ServicesConfig, TargetConfig};
