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


use std::fmt;
use std::fmt::Write;
use std::thread;

use crate::Context;
use crate::Error;
use crate::Logger;
use crate::Message;
use crate::global;
use crate::trap::DefaultTrap;
use crate::trap::Trap;

/// Start a [`LogStream`] tagged `tag` that submits to the process-wide logger.
///
/// # Examples
///
/// ```
/// logtee::builder().sink("console").apply();
///
/// logtee::stream("AUDIT").write("user ").write(42).write(" signed in");
///
/// logtee::teardown().unwrap();
/// ```
pub fn stream(tag: impl Into<String>) -> LogStream<'static> {
    LogStream::new(tag)
}

/// Start a `TRACE` stream on the process-wide logger.
pub fn trace() -> LogStream<'static> {
    LogStream::new("TRACE")
}

/// Start a `DEBUG` stream on the process-wide logger.
pub fn debug() -> LogStream<'static> {
    LogStream::new("DEBUG")
}

/// Start an `INFO` stream on the process-wide logger.
pub fn info() -> LogStream<'static> {
    LogStream::new("INFO")
}

/// Start a `WARN` stream on the process-wide logger.
pub fn warn() -> LogStream<'static> {
    LogStream::new("WARN")
}

/// Start an `ERROR` stream on the process-wide logger.
pub fn error() -> LogStream<'static> {
    LogStream::new("ERROR")
}

/// A single-use text accumulator that yields exactly one enriched [`Message`].
///
/// Text is streamed in with [`write`](LogStream::write) or through [`std::fmt::Write`]. The
/// stream is finalized either explicitly with [`submit`](LogStream::submit), which returns the
/// outcome, or implicitly when it goes out of scope. Finalizing captures the current time,
/// process id and thread id, decorates the accumulated text with them and the tag, and logs the
/// result.
///
/// A stream created by [`stream`] or the tag shortcuts submits to the process-wide logger; one
/// created by [`Logger::stream`] submits to that logger. Dropping a process-wide stream while
/// no logger is initialized panics: the line is never dropped silently. Other failures on drop
/// go to the logger's [`Trap`].
///
/// # Examples
///
/// ```
/// use std::fmt::Write;
///
/// use logtee::sink::Testing;
///
/// let capture = Testing::default();
/// let logger = logtee::builder().append(capture.clone()).build().unwrap();
///
/// let mut stream = logger.stream("INFO");
/// write!(stream, "{} + {} = {}", 1, 2, 1 + 2).unwrap();
/// stream.submit().unwrap();
///
/// assert!(capture.contents().ends_with("1 + 2 = 3\n"));
/// ```
#[derive(Debug)]
pub struct LogStream<'a> {
    logger: Option<&'a Logger>,
    tag: String,
    // `None` once finalized
    text: Option<String>,
}

impl LogStream<'static> {
    /// Create a stream tagged `tag` that submits to the process-wide logger.
    pub fn new(tag: impl Into<String>) -> LogStream<'static> {
        LogStream {
            logger: None,
            tag: tag.into(),
            text: Some(String::new()),
        }
    }
}

impl<'a> LogStream<'a> {
    pub(crate) fn with_logger(logger: &'a Logger, tag: impl Into<String>) -> LogStream<'a> {
        LogStream {
            logger: Some(logger),
            tag: tag.into(),
            text: Some(String::new()),
        }
    }

    /// The tag fixed at construction.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The text accumulated so far.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    /// Append `value` and return the stream for chaining.
    pub fn write(mut self, value: impl fmt::Display) -> Self {
        self.push(value);
        self
    }

    /// Append `value` in place.
    pub fn push(&mut self, value: impl fmt::Display) -> &mut Self {
        if let Some(text) = self.text.as_mut() {
            // SAFETY: write to a string always succeeds
            write!(text, "{value}").unwrap();
        }
        self
    }

    /// Finalize the stream and log its message.
    ///
    /// # Errors
    ///
    /// Return [`ErrorKind::NotInitialized`](crate::ErrorKind::NotInitialized) if the stream
    /// targets the process-wide logger and none is initialized, or the logger's error if any
    /// sink failed.
    pub fn submit(mut self) -> Result<(), Error> {
        let Some(text) = self.text.take() else {
            return Ok(());
        };
        self.with_target(|logger| emit(logger, &self.tag, text))?
    }

    fn with_target<R>(&self, f: impl FnOnce(&Logger) -> R) -> Result<R, Error> {
        match self.logger {
            Some(logger) => Ok(f(logger)),
            None => {
                let logger = global::get()?;
                Ok(f(&logger))
            }
        }
    }
}

fn emit(logger: &Logger, tag: &str, text: String) -> Result<(), Error> {
    let context = Context::capture(logger.time_zone());
    logger.log(&Message::enriched(text, tag, &context))
}

impl fmt::Write for LogStream<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        match self.text.as_mut() {
            Some(text) => {
                text.push_str(s);
                Ok(())
            }
            None => Err(fmt::Error),
        }
    }
}

impl Drop for LogStream<'_> {
    fn drop(&mut self) {
        let Some(text) = self.text.take() else {
            return;
        };

        let submitted = self.with_target(|logger| {
            if let Err(err) = emit(logger, &self.tag, text) {
                logger.trap().trap(&err);
            }
        });

        match submitted {
            Ok(()) => {}
            Err(err) if thread::panicking() => DefaultTrap::default().trap(&err),
            Err(err) => panic!("log stream {tag:?} has no logger to submit to: {err}", tag = self.tag),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use crate::SinkChain;
    use crate::sink::Sink;
    use crate::sink::Testing;

    fn capture_logger() -> (Testing, Logger) {
        let capture = Testing::default();
        let logger = Logger::new(SinkChain::new(capture.clone(), None).unwrap());
        (capture, logger)
    }

    #[test]
    fn test_drop_submits_once() {
        let (capture, logger) = capture_logger();
        {
            let mut stream = logger.stream("TRACE");
            stream.push("hello").push(' ').push("world");
            assert_eq!(stream.text(), "hello world");
            assert_eq!(stream.tag(), "TRACE");
            assert!(capture.lines().is_empty());
        }

        let lines = capture.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with(" hello world\n"));
        assert!(lines[0].contains("Type: TRACE "));
        assert!(lines[0].contains(&format!("PID: {} ", std::process::id())));
    }

    #[test]
    fn test_submit_then_drop_does_not_resubmit() {
        let (capture, logger) = capture_logger();
        logger.stream("ERROR").write("boom").submit().unwrap();
        assert_eq!(capture.lines().len(), 1);
    }

    #[test]
    fn test_temporary_stream_submits_immediately() {
        let (capture, logger) = capture_logger();
        logger.stream("WARN").write("disk at ").write(93).write('%');
        assert_eq!(capture.lines().len(), 1);
        assert!(capture.contents().ends_with(" disk at 93%\n"));
    }

    #[test]
    fn test_empty_stream_still_logs_a_line() {
        let (capture, logger) = capture_logger();
        drop(logger.stream("INFO"));
        let lines = capture.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with(" \n"));
    }

    #[derive(Debug)]
    struct Broken;

    impl Sink for Broken {
        fn write(&mut self, _: &str) -> Result<(), Error> {
            Err(Error::new(ErrorKind::Io, "device gone"))
        }
    }

    #[test]
    fn test_submit_reports_sink_failure() {
        let capture = Testing::default();
        let chain = SinkChain::new(capture.clone(), None).unwrap();
        let logger = Logger::new(SinkChain::new(Broken, Some(chain)).unwrap());

        let err = logger.stream("INFO").write("kept").submit().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(capture.lines().len(), 1);
    }

    #[test]
    fn test_fmt_write_after_finalize_is_rejected() {
        let (_capture, logger) = capture_logger();
        let mut stream = logger.stream("INFO");
        stream.text = None;
        assert!(write!(stream, "late").is_err());
    }
}
