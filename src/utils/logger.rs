use crate::utils::error::{Result, SocialworthError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    /// JSON lines for log collectors.
    Json,
}

/// Installs the global subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_logger(verbose: bool, format: LogFormat) -> Result<()> {
    let default_directive = if verbose {
        "socialworth=debug,info"
    } else {
        "socialworth=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false);

    // 兩種格式的 layer 型別不同，分開初始化
    let installed = match format {
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(layer.compact())
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(layer.json())
            .try_init(),
    };

    installed.map_err(|e| SocialworthError::Config {
        message: format!("Logger already initialized: {}", e),
    })
}
