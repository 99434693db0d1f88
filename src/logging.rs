use env_logger::{Builder, Env};
use log::LevelFilter;
use std::io::Write;

/// Default filter for the given verbosity.
pub fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Initializes the global logger.
///
/// `RUST_LOG` wins when set. Otherwise `verbose` selects debug output and the
/// default is info. Each line is stamped with local wall-clock time.
///
/// Calling it again is harmless.
pub fn init(verbose: bool) {
    let env = Env::default().default_filter_or(default_level(verbose).to_string());
    let mut builder = Builder::from_env(env);
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} {:<5} {}: {}",
            chrono::Local::now().format("%H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        )
    });

    let _ = builder.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level() {
        assert_eq!(default_level(true), LevelFilter::Debug);
        assert_eq!(default_level(false), LevelFilter::Info);
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init(false);
        init(true);
        log::info!("logger initialized");
    }
}
