use log::LevelFilter;
use log4rs::{
    append::{
        console::{ConsoleAppender, Target},
        rolling_file::{
            policy::compound::{
                roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger, CompoundPolicy,
            },
            RollingFileAppender,
        },
    },
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use std::path::Path;
use std::str::FromStr;

/// Log level override, e.g. `CONTACTBOOK_LOG=debug`.
pub const LEVEL_ENV: &str = "CONTACTBOOK_LOG";

const LOG_SIZE_LIMIT: u64 = 1024 * 1024; // 1 MB

const LOG_FILE_COUNT: u32 = 3;

fn file_level() -> LevelFilter {
    std::env::var(LEVEL_ENV)
        .ok()
        .and_then(|v| LevelFilter::from_str(v.trim()).ok())
        .unwrap_or(LevelFilter::Info)
}

/// Log to a rolling file next to the data, and warnings to stderr.
/// Stderr stays at `warn` so the interactive screen is not cluttered.
pub fn init_logger(log_file: &Path) -> anyhow::Result<()> {
    let file_level = file_level();
    let stderr_level = LevelFilter::Warn;

    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{l}: {m}{n}")))
        .build();

    let archive_pattern = format!("{}.{{}}", log_file.display());
    let trigger = SizeTrigger::new(LOG_SIZE_LIMIT);
    let roller = FixedWindowRoller::builder().build(&archive_pattern, LOG_FILE_COUNT)?;
    let policy = CompoundPolicy::new(Box::new(trigger), Box::new(roller));

    let logfile = RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{d} {l} {t} - {m}{n}")))
        .build(log_file, Box::new(policy))?;

    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(file_level)))
                .build("logfile", Box::new(logfile)),
        )
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(stderr_level)))
                .build("stderr", Box::new(stderr)),
        )
        .build(
            Root::builder()
                .appender("logfile")
                .appender("stderr")
                .build(file_level.max(stderr_level)),
        )?;

    log4rs::init_config(config)?;
    Ok(())
}
