use std::str::FromStr;

pub fn setup_logging(conf: &crate::config::LoggingConfig) -> Result<(), String> {
    let level = log::LevelFilter::from_str(&conf.level)
        .map_err(|_| format!("Unknown log level: {}", conf.level))?;

    let mut logger = fern::Dispatch::new()
        .format(|out, message, record| {
            let level = record.level();
            let colored_level = match level {
                log::Level::Error => format!("\x1b[31m{level}\x1b[0m"),
                log::Level::Warn => format!("\x1b[33m{level}\x1b[0m"),
                log::Level::Info => format!("\x1b[32m{level}\x1b[0m"),
                log::Level::Debug => format!("\x1b[34m{level}\x1b[0m"),
                log::Level::Trace => format!("\x1b[36m{level}\x1b[0m"),
            };
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                colored_level,
                message
            ));
        })
        .level(level);

    // stdout carries the dumped record, diagnostics go to stderr by default
    logger = if conf.log_to_stdout {
        logger.chain(std::io::stdout())
    } else {
        logger.chain(std::io::stderr())
    };

    logger
        .apply()
        .map_err(|e| format!("Error while setting up logger: {e}"))
}
