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


use std::sync::Mutex;
use std::sync::MutexGuard;

use jiff::tz::TimeZone;

use crate::Error;
use crate::LogStream;
use crate::Message;
use crate::SinkChain;
use crate::trap::DefaultTrap;
use crate::trap::Trap;

/// The logger engine: renders messages and pushes the result into a [`SinkChain`].
///
/// Every [`log`](Logger::log) call is synchronous. The chain is locked for the duration of one
/// fan-out, so lines from concurrent callers never interleave within a sink.
///
/// Dropping the logger closes every sink; close errors go to the logger's [`Trap`]. Call
/// [`close`](Logger::close) to receive them instead.
///
/// # Examples
///
/// ```
/// use logtee::Logger;
/// use logtee::Message;
/// use logtee::SinkChain;
/// use logtee::sink::Testing;
///
/// let capture = Testing::default();
/// let logger = Logger::new(SinkChain::new(capture.clone(), None).unwrap());
/// logger.log(&Message::new("hello").with_newline()).unwrap();
/// assert_eq!(capture.contents(), "hello\n");
/// ```
#[derive(Debug)]
pub struct Logger {
    chain: Mutex<SinkChain>,
    tz: Option<TimeZone>,
    trap: Box<dyn Trap>,
}

impl Logger {
    /// Create a logger owning `chain`, stamping times in the system time zone and reporting
    /// unreturnable errors through [`DefaultTrap`].
    pub fn new(chain: SinkChain) -> Logger {
        Logger::with_options(chain, None, Box::new(DefaultTrap::default()))
    }

    pub(crate) fn with_options(
        chain: SinkChain,
        tz: Option<TimeZone>,
        trap: Box<dyn Trap>,
    ) -> Logger {
        Logger {
            chain: Mutex::new(chain),
            tz,
            trap,
        }
    }

    /// The time zone messages are stamped in, or `None` for the system time zone.
    pub fn time_zone(&self) -> Option<&TimeZone> {
        self.tz.as_ref()
    }

    /// The trap receiving errors that cannot be returned to a caller.
    pub fn trap(&self) -> &dyn Trap {
        self.trap.as_ref()
    }

    /// Render `message` once and write the result to every sink.
    ///
    /// # Errors
    ///
    /// Return an error if any sink failed; the remaining sinks still received the line.
    pub fn log(&self, message: &Message) -> Result<(), Error> {
        let text = message.render();
        self.chain().log(&text)
    }

    /// Start a [`LogStream`] that submits to this logger.
    pub fn stream(&self, tag: impl Into<String>) -> LogStream<'_> {
        LogStream::with_logger(self, tag)
    }

    /// Flush every sink.
    pub fn flush(&self) -> Result<(), Error> {
        self.chain().flush()
    }

    /// Close every sink and report the aggregated close errors.
    pub fn close(mut self) -> Result<(), Error> {
        self.chain_mut().close()
    }

    fn chain(&self) -> MutexGuard<'_, SinkChain> {
        self.chain.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn chain_mut(&mut self) -> &mut SinkChain {
        self.chain.get_mut().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Err(err) = self.chain_mut().close() {
            self.trap.trap(&err);
        }
    }
}
