/// Initialize the logger with the specified verbosity level
///
/// `RUST_LOG` takes precedence over the verbosity flag when set.
///
/// # Arguments
/// * `verbose` - Verbosity level (0=warn, 1=info, 2=debug, 3+=trace)
pub fn setup_logger(verbose: u8) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter_for(verbose)))
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();
}

fn filter_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "sensorfetch=warn",
        1 => "sensorfetch=info",
        2 => "sensorfetch=debug",
        _ => "sensorfetch=trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_levels() {
        assert_eq!(filter_for(0), "sensorfetch=warn");
        assert_eq!(filter_for(1), "sensorfetch=info");
        assert_eq!(filter_for(2), "sensorfetch=debug");
        assert_eq!(filter_for(3), "sensorfetch=trace");
        assert_eq!(filter_for(9), "sensorfetch=trace");
    }
}
