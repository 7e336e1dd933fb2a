use crate::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    /// Unrecognized names fall back to compact output.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

/// Install the global subscriber on stderr; stdout belongs to the MCP transport.
///
/// `RUST_LOG` wins over the configured level. A subscriber that is already
/// installed is left in place.
pub fn init(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter);

    let installed = match LogFormat::parse(&config.format) {
        LogFormat::Json => builder.json().try_init().is_ok(),
        LogFormat::Pretty => builder.pretty().try_init().is_ok(),
        LogFormat::Compact => builder.compact().try_init().is_ok(),
    };

    if installed {
        tracing::debug!(level = %config.level, format = %config.format, "Logging initialized");
    }
    Ok(())
}

/// Redact an API token for safe logging
/// Shows first 4 chars + last 2 chars, hides middle
/// Returns "[REDACTED]" for strings ≤8 characters
pub fn redact_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "[REDACTED]".to_string();
    }

    let start: String = chars[..4].iter().collect();
    let end: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", start, end)
}
