// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


//! Bridge the [`log`] crate macros to the process-wide logger.

use crate::Context;
use crate::Message;
use crate::global;
use crate::trap::DefaultTrap;
use crate::trap::Trap;

struct LogCrateLogger(());

impl log::Log for LogCrateLogger {
    fn enabled(&self, _: &log::Metadata) -> bool {
        global::is_initialized()
    }

    fn log(&self, record: &log::Record) {
        let logger = match global::get() {
            Ok(logger) => logger,
            Err(err) => {
                let err = err.with_context("payload", record.args());
                DefaultTrap::default().trap(&err);
                return;
            }
        };

        let context = Context::capture(logger.time_zone());
        let message = Message::enriched(record.args().to_string(), record.level().as_str(), &context);
        if let Err(err) = logger.log(&message) {
            logger.trap().trap(&err);
        }
    }

    fn flush(&self) {
        if let Ok(logger) = global::get() {
            if let Err(err) = logger.flush() {
                logger.trap().trap(&err);
            }
        }
    }
}

/// Set up the log crate global logger.
///
/// This function calls [`log::set_logger`] to install a proxy that forwards every record of the
/// log crate macros to the process-wide logger, tagged with the level name (`ERROR`, `WARN`,
/// `INFO`, `DEBUG`, `TRACE`). Records emitted while no logger is initialized are reported to
/// standard error instead.
///
/// This function will set the global maximum log level to `Trace`. To override this, call
/// [`log::set_max_level`] after this function.
///
/// # Errors
///
/// Return an error if the log crate global logger has already been set.
///
/// # Examples
///
/// ```
/// logtee::bridge::try_setup_log_crate().unwrap();
/// logtee::builder().sink("console").apply();
///
/// log::info!("Hello info!");
/// ```
pub fn try_setup_log_crate() -> Result<(), log::SetLoggerError> {
    static LOGGER: LogCrateLogger = LogCrateLogger(());
    log::set_logger(&LOGGER)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

/// Set up the log crate global logger.
///
/// See [`try_setup_log_crate`].
///
/// # Panics
///
/// Panic if the log crate global logger has already been set.
pub fn setup_log_crate() {
    try_setup_log_crate().expect(
        "logtee::bridge::setup_log_crate must be called before the log crate global logger initialized",
    )
}
