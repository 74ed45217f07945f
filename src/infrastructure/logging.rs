use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber, filtered through `RUST_LOG` with
/// `info` as the default. Going through `fmt().try_init()` also installs the
/// log-facade bridge, so actix's request `Logger` lines (emitted via the
/// `log` crate) end up in the same output.
pub fn setup_tracing() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).try_init()?;
    Ok(())
}
