//! Logger setup for the binary.

use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::error::Error;

/// Default log4rs configuration file, relative to the working directory.
pub const LOG_CONFIG_FILE: &str = "log4rs.yml";

const CONSOLE_APPENDER: &str = "stderr";
const CONSOLE_PATTERN: &str = "{d(%H:%M:%S)} {h({l:5})} {M} - {m}{n}";

/// Stderr-only configuration used when the config file cannot be loaded.
pub fn console_config() -> Result<Config, Box<dyn Error>> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(CONSOLE_PATTERN)))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build(CONSOLE_APPENDER, Box::new(stderr)))
        .build(
            Root::builder()
                .appender(CONSOLE_APPENDER)
                .build(LevelFilter::Info),
        )?;
    Ok(config)
}

/// Initialise log4rs from `config_file`, falling back to [`console_config`].
pub fn init_logging(config_file: &str) -> Result<(), Box<dyn Error>> {
    if let Err(e) = log4rs::init_file(config_file, Default::default()) {
        log4rs::init_config(console_config()?)?;
        log::warn!("{config_file} not loaded ({e}), logging to stderr only");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_config() {
        let config = console_config().unwrap();
        assert_eq!(config.root().level(), LevelFilter::Info);
        assert_eq!(config.root().appenders().to_vec(), vec![CONSOLE_APPENDER]);
        assert_eq!(config.appenders().len(), 1);
    }

    // only test in the crate that installs the global logger
    #[test]
    fn test_init_logging_without_config_file() {
        assert!(init_logging("no/such/dir/log4rs.yml").is_ok());
        log::info!("logging to stderr");
    }
}
