use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

/// `RUST_LOG` wins over the configured level. Without it, request spans from
/// `tower_http` are kept at debug so every request shows up in the log.
pub fn init_logging(default_level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(request_filter(default_level))
            .map_err(|e| anyhow!("invalid log level {default_level:?}: {e}"))?,
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(())
}

fn request_filter(default_level: &str) -> String {
    format!("{},tower_http=debug", default_level.trim())
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::EnvFilter;

    use super::request_filter;

    #[test]
    fn request_filter_keeps_http_traces() {
        let directives = request_filter(" warn ");
        assert_eq!(directives, "warn,tower_http=debug");
        assert!(EnvFilter::try_new(directives).is_ok());
    }
}
