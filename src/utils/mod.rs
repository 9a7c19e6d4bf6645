pub mod paths;
pub mod persistence;

/// Installs the global tracing subscriber with sensible defaults.
///
/// Later calls leave the first subscriber in place.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = match "expense_core=info".parse() {
        Ok(directive) => EnvFilter::from_default_env().add_directive(directive),
        Err(_) => EnvFilter::from_default_env(),
    };

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    #[test]
    fn repeated_init_keeps_first_subscriber() {
        super::init_tracing();
        super::init_tracing();
        crate::init();
    }
}
