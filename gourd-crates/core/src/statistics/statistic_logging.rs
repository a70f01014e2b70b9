//! Writes statistics as `{prefix} {name}={value}` lines to a process-wide, once-configured
//! writer.

use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::io::stdout;
use std::io::Write;
use std::sync::OnceLock;
use std::sync::RwLock;

use convert_case::Case;
use convert_case::Casing;

/// How statistics are written: the prefix of every line, an optional closing line after a
/// block of statistics, an optional casing for the statistic names and the destination.
pub struct StatisticOptions {
    statistic_prefix: &'static str,
    after_statistics: Option<&'static str>,
    statistics_casing: Option<Case>,
    statistics_writer: Box<dyn Write + Send + Sync>,
}

impl Debug for StatisticOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatisticOptions")
            .field("statistic_prefix", &self.statistic_prefix)
            .field("after_statistics", &self.after_statistics)
            .field("statistics_casing", &self.statistics_casing)
            .field("statistics_writer", &"<Writer>")
            .finish()
    }
}

static STATISTIC_OPTIONS: OnceLock<RwLock<StatisticOptions>> = OnceLock::new();

/// Enables statistic logging.
///
/// Only the first call has an effect; later calls are ignored. Without a writer the statistics
/// go to stdout. Until this function is called, [`log_statistic`] is a no-op.
pub fn configure_statistic_logging(
    prefix: &'static str,
    after: Option<&'static str>,
    casing: Option<Case>,
    writer: Option<Box<dyn Write + Send + Sync>>,
) {
    let _ = STATISTIC_OPTIONS.get_or_init(|| {
        RwLock::new(StatisticOptions {
            statistic_prefix: prefix,
            after_statistics: after,
            statistics_casing: casing,
            statistics_writer: writer.unwrap_or_else(|| Box::new(stdout())),
        })
    });
}

/// Logs the statistic `name` with `value` as `{prefix} {name}={value}`.
pub fn log_statistic(name: impl Display, value: impl Display) {
    let Some(options_lock) = STATISTIC_OPTIONS.get() else {
        return;
    };
    let Ok(mut options) = options_lock.write() else {
        return;
    };

    let name = match options.statistics_casing {
        Some(casing) => name.to_string().to_case(casing),
        None => name.to_string(),
    };
    let prefix = options.statistic_prefix;
    let _ = writeln!(options.statistics_writer, "{prefix} {name}={value}");
}

/// Writes the closing line of a block of statistics, if one was configured.
pub fn log_statistic_postfix() {
    let Some(options_lock) = STATISTIC_OPTIONS.get() else {
        return;
    };
    let Ok(mut options) = options_lock.write() else {
        return;
    };

    if let Some(postfix) = options.after_statistics {
        let _ = writeln!(options.statistics_writer, "{postfix}");
    }
}

/// Whether [`configure_statistic_logging`] has been called.
pub fn should_log_statistics() -> bool {
    STATISTIC_OPTIONS.get().is_some()
}
