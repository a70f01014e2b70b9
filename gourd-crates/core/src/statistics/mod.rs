//! Counters kept by the [`Solver`] and its propagators, and the machinery to log them.
//!
//! Nothing is logged until [`configure_statistic_logging`] has been called; each statistic is
//! then written as one line `<prefix> <name>=<value>`.
pub(crate) mod statistic_logger;
pub(crate) mod statistic_logging;

use std::fmt::Display;
use std::fmt::Write;

pub use statistic_logger::StatisticLogger;
pub use statistic_logging::configure_statistic_logging;
pub use statistic_logging::log_statistic;
pub use statistic_logging::log_statistic_postfix;
pub use statistic_logging::should_log_statistics;
pub use statistic_logging::StatisticOptions;

#[cfg(doc)]
use crate::Solver;

/// A value which can be written to a [`StatisticLogger`].
///
/// Every [`Display`] type is a statistic; structs of statistics are generated with
/// [`create_statistics_struct!`](crate::create_statistics_struct).
pub trait Statistic {
    fn log(&self, statistic_logger: StatisticLogger);
}

impl<Value: Display> Statistic for Value {
    fn log(&self, mut statistic_logger: StatisticLogger) {
        // Writing to a `StatisticLogger` cannot fail.
        let _ = write!(statistic_logger, "{self}");
    }
}

/// Generates a struct of counters which implements [`Statistic`] by logging every field under
/// its own name.
///
/// # Example
/// ```rust
/// # use gourd_core::create_statistics_struct;
/// create_statistics_struct!(pub SearchCounters {
///     num_restarts: usize
/// });
///
/// let statistics = SearchCounters::default();
///
/// assert_eq!(statistics.num_restarts, 0);
/// ```
#[macro_export]
macro_rules! create_statistics_struct {
    ($(#[$struct_documentation:meta])* $vis:vis $name:ident { $($(#[$variable_documentation:meta])* $field:ident : $type:ident),+ $(,)? }) => {
        $(#[$struct_documentation])*
        #[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
        $vis struct $name {
            $($(#[$variable_documentation])* $vis $field: $type),+
        }

        impl $crate::statistics::Statistic for $name {
            fn log(&self, statistic_logger: $crate::statistics::StatisticLogger) {
                $(self.$field.log(statistic_logger.attach_to_prefix(stringify!($field),)));+
            }
        }
    };
}
