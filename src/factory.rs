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


use std::collections::BTreeSet;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use jiff::tz::TimeZone;

use crate::Error;
use crate::Logger;
use crate::SinkChain;
use crate::global;
use crate::sink;
use crate::sink::Sink;
use crate::trap::DefaultTrap;
use crate::trap::Trap;

/// The environment variable read by [`LoggerBuilder::from_env`]: a comma-separated list of sink
/// descriptors, e.g. `console,/var/log/app.log`.
pub const SINKS_ENV: &str = "LOGTEE_SINKS";

const CONSOLE: &str = "console";
const FILE_SCHEME: &str = "file://";

/// A parsed sink descriptor.
///
/// * `console` denotes the [console sink](sink::Console).
/// * `file://<path>`, or any token without a `scheme://` prefix, denotes a [file sink](sink::File).
///
/// Empty tokens and any other scheme are rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkDescriptor {
    Console,
    File(PathBuf),
}

impl SinkDescriptor {
    /// Parse one descriptor token.
    pub fn parse(token: &str) -> Result<SinkDescriptor, Error> {
        if token == CONSOLE {
            return Ok(SinkDescriptor::Console);
        }

        let path = match token.strip_prefix(FILE_SCHEME) {
            Some(path) => path,
            None if token.contains("://") => {
                return Err(Error::config_invalid("unknown sink scheme")
                    .with_context("descriptor", token));
            }
            None => token,
        };

        if path.is_empty() {
            return Err(
                Error::config_invalid("empty sink descriptor").with_context("descriptor", token)
            );
        }
        Ok(SinkDescriptor::File(PathBuf::from(path)))
    }

    /// Create the (unopened) sink this descriptor denotes.
    pub fn into_sink(self) -> Box<dyn Sink> {
        match self {
            SinkDescriptor::Console => Box::new(sink::Console::default()),
            SinkDescriptor::File(path) => Box::new(sink::File::new(path)),
        }
    }
}

impl FromStr for SinkDescriptor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SinkDescriptor::parse(s)
    }
}

/// Build a [`Logger`] from a set of sink descriptors.
///
/// Shorthand for `logtee::builder().sinks(descriptors).build()`; see [`LoggerBuilder`] for how
/// the descriptors are ordered.
///
/// # Examples
///
/// ```
/// let logger = logtee::create(["console"]).unwrap();
/// logger.stream("INFO").write("ready");
/// ```
pub fn create<I, S>(descriptors: I) -> Result<Logger, Error>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    builder().sinks(descriptors).build()
}

/// Create a new empty [`LoggerBuilder`].
///
/// # Examples
///
/// ```
/// logtee::builder().sink("console").apply();
/// logtee::info().write("installed");
/// logtee::teardown().unwrap();
/// ```
pub fn builder() -> LoggerBuilder {
    LoggerBuilder::new()
}

/// A builder assembling a [`SinkChain`] and the [`Logger`] wrapping it.
///
/// Descriptors form a set: duplicates collapse, and the order they are given in does not
/// matter. The chain is built bottom-up over the descriptors in sorted order, so the smallest
/// descriptor becomes the tail and the largest the root. Since a chain writes root first, lines
/// reach the sinks in descending descriptor order. Sinks added with [`append`](Self::append) are
/// linked after all descriptor sinks, in call order, so the last appended sink writes first.
///
/// # Examples
///
/// ```
/// let builder = logtee::builder()
///     .sink("log2.txt")
///     .sink("console")
///     .sink("log.txt");
///
/// assert_eq!(
///     builder.descriptors().collect::<Vec<_>>(),
///     ["console", "log.txt", "log2.txt"]
/// );
/// ```
#[must_use = "call `build` to construct a logger or `apply` to install it process-wide"]
#[derive(Debug)]
pub struct LoggerBuilder {
    descriptors: BTreeSet<String>,
    appends: Vec<Box<dyn Sink>>,
    tz: Option<TimeZone>,
    trap: Box<dyn Trap>,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggerBuilder {
    /// Create a new empty [`LoggerBuilder`].
    pub fn new() -> Self {
        Self {
            descriptors: BTreeSet::new(),
            appends: vec![],
            tz: None,
            trap: Box::new(DefaultTrap::default()),
        }
    }

    /// Create a builder with the descriptors listed in the [`SINKS_ENV`] environment variable.
    ///
    /// An unset or blank variable yields an empty builder.
    pub fn from_env() -> Self {
        let list = env::var(SINKS_ENV).unwrap_or_default();
        Self::new().sink_list(&list)
    }

    /// Add one sink descriptor.
    pub fn sink(mut self, descriptor: impl Into<String>) -> Self {
        self.descriptors.insert(descriptor.into());
        self
    }

    /// Add several sink descriptors.
    pub fn sinks<I, S>(mut self, descriptors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.descriptors
            .extend(descriptors.into_iter().map(Into::into));
        self
    }

    /// Add the descriptors of a comma-separated list. Blank entries are skipped and whitespace
    /// around entries is trimmed.
    pub fn sink_list(self, list: &str) -> Self {
        self.sinks(
            list.split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty()),
        )
    }

    /// Add a custom sink.
    pub fn append(mut self, sink: impl Into<Box<dyn Sink>>) -> Self {
        self.appends.push(sink.into());
        self
    }

    /// Set the time zone messages are stamped in.
    ///
    /// Default to the system time zone.
    pub fn time_zone(mut self, tz: TimeZone) -> Self {
        self.tz = Some(tz);
        self
    }

    /// Set the trap for errors that cannot be returned to a caller.
    ///
    /// Default to [`DefaultTrap`].
    pub fn trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = trap.into();
        self
    }

    /// The configured descriptors in chain construction order, tail first.
    pub fn descriptors(&self) -> impl Iterator<Item = &str> {
        self.descriptors.iter().map(String::as_str)
    }

    /// Build the [`Logger`], opening every sink.
    ///
    /// # Errors
    ///
    /// Return [`ErrorKind::ConfigInvalid`](crate::ErrorKind::ConfigInvalid) if a descriptor is
    /// invalid or no sink is configured; no sink is opened in that case. Return the open error
    /// of the first sink that fails to open; sinks already opened are closed again.
    pub fn build(self) -> Result<Logger, Error> {
        let LoggerBuilder {
            descriptors,
            appends,
            tz,
            trap,
        } = self;

        let sinks = descriptors
            .iter()
            .map(|descriptor| SinkDescriptor::parse(descriptor).map(SinkDescriptor::into_sink))
            .collect::<Result<Vec<_>, _>>()?;

        let mut chain = None;
        for sink in sinks.into_iter().chain(appends) {
            chain = Some(SinkChain::new(sink, chain)?);
        }

        let chain = chain.ok_or_else(|| Error::config_invalid("no sinks configured"))?;
        Ok(Logger::with_options(chain, tz, trap))
    }

    /// Build the [`Logger`] and install it as the process-wide logger, replacing any previous
    /// one.
    ///
    /// # Errors
    ///
    /// Return the build error, or the close error of the replaced logger.
    pub fn try_apply(self) -> Result<(), Error> {
        global::init(self.build()?)
    }

    /// Build the [`Logger`] and install it as the process-wide logger.
    ///
    /// # Panics
    ///
    /// Panic if the logger cannot be built.
    pub fn apply(self) {
        self.try_apply()
            .expect("LoggerBuilder::apply must be given a valid sink configuration");
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::ErrorKind;
    use crate::sink::Testing;

    #[test]
    fn test_parse_descriptors() {
        assert_eq!(SinkDescriptor::parse("console").unwrap(), SinkDescriptor::Console);
        assert_eq!(
            "app.log".parse::<SinkDescriptor>().unwrap(),
            SinkDescriptor::File(PathBuf::from("app.log"))
        );
        assert_eq!(
            SinkDescriptor::parse("file:///var/log/app.log").unwrap(),
            SinkDescriptor::File(PathBuf::from("/var/log/app.log"))
        );
        // only the exact token names the console
        assert_eq!(
            SinkDescriptor::parse("Console").unwrap(),
            SinkDescriptor::File(PathBuf::from("Console"))
        );
    }

    #[test]
    fn test_parse_rejects_invalid_descriptors() {
        for token in ["", "file://", "tcp://127.0.0.1:514", "syslog://local"] {
            let err = SinkDescriptor::parse(token).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ConfigInvalid, "{token}");
            assert_eq!(err.context("descriptor"), Some(token));
        }
    }

    #[test]
    fn test_descriptor_order_ignores_listing_order() {
        let a = builder().sinks(["log2.txt", "console", "log.txt"]);
        let b = builder().sinks(["console", "log.txt", "log2.txt"]);
        let c = builder().sink_list(" log.txt, ,log2.txt,console,log.txt ");

        let expected = ["console", "log.txt", "log2.txt"];
        assert_eq!(a.descriptors().collect::<Vec<_>>(), expected);
        assert_eq!(b.descriptors().collect::<Vec<_>>(), expected);
        assert_eq!(c.descriptors().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn test_invalid_descriptor_opens_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.log");
        let capture = Testing::default();

        let err = builder()
            .sink(path.to_str().unwrap())
            .sink("udp://collector")
            .append(capture.clone())
            .build()
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert!(!path.exists());
        assert!(!capture.is_open());
    }

    #[test]
    fn test_empty_configuration_is_rejected() {
        let err = builder().build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);

        let err = builder().sink_list(" , ").build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[test]
    fn test_open_failure_stops_assembly() {
        let dir = TempDir::new().unwrap();
        let capture = Testing::default();

        // a directory cannot be opened as a log file
        let err = builder()
            .sink(dir.path().to_str().unwrap())
            .append(capture.clone())
            .build()
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(!capture.is_open());
        assert!(!capture.is_closed());
    }

    #[test]
    fn test_appended_sinks_receive_the_same_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.log");
        let capture = Testing::default();

        let logger = builder()
            .sink(path.to_str().unwrap())
            .append(capture.clone())
            .time_zone(TimeZone::UTC)
            .build()
            .unwrap();
        assert!(logger.time_zone().is_some());

        logger.stream("INFO").write("both").submit().unwrap();
        drop(logger);

        assert_eq!(std::fs::read_to_string(&path).unwrap(), capture.contents());
        assert!(capture.is_closed());
    }
}
