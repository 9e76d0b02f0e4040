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


use std::mem;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::RecvTimeoutError;
use crossbeam_channel::Receiver;
use crossbeam_channel::SendTimeoutError;
use crossbeam_channel::Sender;
use crossbeam_channel::bounded;
use crossbeam_channel::unbounded;

use self::worker::Worker;
use crate::Error;
use crate::ErrorKind;
use crate::sink::Sink;
use crate::trap::DefaultTrap;
use crate::trap::Trap;

mod worker;

const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(100);

#[derive(Debug)]
enum Command {
    Write(String),
    Flush,
    Shutdown,
}

/// A builder for configuring [`NonBlocking`].
#[derive(Debug)]
pub struct NonBlockingBuilder {
    thread_name: String,
    buffered_lines_limit: Option<usize>,
    shutdown_timeout: Option<Duration>,
    trap: Box<dyn Trap>,
    sink: Box<dyn Sink>,
}

impl NonBlockingBuilder {
    /// Create a new builder wrapping `sink`, whose writes will happen on a thread named
    /// `thread_name`.
    pub fn new(thread_name: impl Into<String>, sink: impl Into<Box<dyn Sink>>) -> Self {
        Self {
            thread_name: thread_name.into(),
            buffered_lines_limit: None,
            shutdown_timeout: None,
            trap: Box::new(DefaultTrap::default()),
            sink: sink.into(),
        }
    }

    /// Sets the buffer size of pending lines. Unbounded if `None`.
    pub fn buffered_lines_limit(mut self, buffered_lines_limit: Option<usize>) -> Self {
        self.buffered_lines_limit = buffered_lines_limit;
        self
    }

    /// Sets how long closing waits for the worker to drain. Default to 100ms.
    pub fn shutdown_timeout(mut self, shutdown_timeout: Option<Duration>) -> Self {
        self.shutdown_timeout = shutdown_timeout;
        self
    }

    /// Sets the trap receiving write errors raised on the worker thread.
    ///
    /// Default to [`DefaultTrap`].
    pub fn trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = trap.into();
        self
    }

    /// Completes the builder. The worker starts when the returned sink is opened.
    pub fn build(self) -> NonBlocking {
        NonBlocking {
            thread_name: self.thread_name,
            buffered_lines_limit: self.buffered_lines_limit,
            shutdown_timeout: self.shutdown_timeout.unwrap_or(DEFAULT_SHUTDOWN_TIMEOUT),
            state: State::Idle {
                sink: self.sink,
                trap: self.trap,
            },
        }
    }
}

#[derive(Debug)]
enum State {
    Idle {
        sink: Box<dyn Sink>,
        trap: Box<dyn Trap>,
    },
    Running {
        sender: Sender<Command>,
        done: Receiver<Result<(), Error>>,
        handle: JoinHandle<()>,
    },
    Closed,
}

/// A sink that hands lines to a dedicated worker thread which writes them to the wrapped sink.
///
/// Opening opens the wrapped sink on the calling thread, so open failures are reported to the
/// caller, then starts the worker. Writes only enqueue; failures on the worker go to the
/// configured [`Trap`]. Closing drains the queue, closes the wrapped sink and reports its close
/// result, waiting at most the configured shutdown timeout.
///
/// # Examples
///
/// ```
/// use logtee::sink::Console;
/// use logtee::sink::NonBlockingBuilder;
///
/// let console = NonBlockingBuilder::new("logtee-console", Console::default()).build();
/// ```
#[derive(Debug)]
pub struct NonBlocking {
    thread_name: String,
    buffered_lines_limit: Option<usize>,
    shutdown_timeout: Duration,
    state: State,
}

impl NonBlocking {
    fn start(&self, sink: Box<dyn Sink>, trap: Box<dyn Trap>) -> Result<State, Error> {
        let (sender, receiver) = match self.buffered_lines_limit {
            Some(cap) => bounded(cap),
            None => unbounded(),
        };
        let (done_sender, done) = bounded(1);

        let worker = Worker::new(sink, trap, receiver, done_sender);
        let handle = worker
            .make_thread(self.thread_name.clone())
            .map_err(|err| {
                Error::new(ErrorKind::Io, "failed to spawn the non-blocking sink worker")
                    .with_context("thread", &self.thread_name)
                    .with_source(err)
            })?;

        Ok(State::Running {
            sender,
            done,
            handle,
        })
    }
}

impl Sink for NonBlocking {
    fn open(&mut self) -> Result<(), Error> {
        match mem::replace(&mut self.state, State::Closed) {
            State::Idle { mut sink, trap } => {
                if let Err(err) = sink.open() {
                    self.state = State::Idle { sink, trap };
                    return Err(err);
                }
                // the worker owns the sink from here on, a failed spawn leaves this sink closed
                self.state = self.start(sink, trap)?;
                Ok(())
            }
            running @ State::Running { .. } => {
                self.state = running;
                Ok(())
            }
            State::Closed => Err(Error::not_initialized("non-blocking sink is closed")),
        }
    }

    fn write(&mut self, text: &str) -> Result<(), Error> {
        let State::Running { sender, .. } = &self.state else {
            return Err(Error::not_initialized("non-blocking sink is not open"));
        };

        sender
            .send(Command::Write(text.to_string()))
            .map_err(|_| Error::new(ErrorKind::Io, "non-blocking sink worker has stopped"))
    }

    fn flush(&mut self) -> Result<(), Error> {
        let State::Running { sender, .. } = &self.state else {
            return Ok(());
        };

        sender
            .send(Command::Flush)
            .map_err(|_| Error::new(ErrorKind::Io, "non-blocking sink worker has stopped"))
    }

    fn close(&mut self) -> Result<(), Error> {
        let State::Running {
            sender,
            done,
            handle,
        } = mem::replace(&mut self.state, State::Closed)
        else {
            return Ok(());
        };

        let shutdown_timeout = self.shutdown_timeout;
        match sender.send_timeout(Command::Shutdown, shutdown_timeout) {
            // a disconnected queue means the worker already exited; its result is still in `done`
            Ok(()) | Err(SendTimeoutError::Disconnected(_)) => {}
            Err(SendTimeoutError::Timeout(_)) => {
                return Err(
                    Error::new(ErrorKind::Io, "failed to send shutdown signal to sink worker")
                        .with_context("thread", &self.thread_name),
                );
            }
        }

        match done.recv_timeout(shutdown_timeout) {
            Ok(result) => {
                let _ = handle.join();
                result
            }
            Err(RecvTimeoutError::Timeout) => Err(Error::new(
                ErrorKind::Io,
                "timed out waiting for sink worker to drain",
            )
            .with_context("thread", &self.thread_name)
            .with_context("timeout", format!("{shutdown_timeout:?}"))),
            Err(RecvTimeoutError::Disconnected) => {
                let _ = handle.join();
                Err(Error::new(ErrorKind::Io, "sink worker exited abnormally")
                    .with_context("thread", &self.thread_name))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::Testing;

    #[test]
    fn test_close_drains_pending_lines() {
        let capture = Testing::default();
        let mut sink = NonBlockingBuilder::new("logtee-test", capture.clone())
            .shutdown_timeout(Some(Duration::from_secs(5)))
            .build();

        sink.open().unwrap();
        assert!(capture.is_open());
        for i in 0..100 {
            sink.write(&format!("line {i}\n")).unwrap();
        }
        sink.close().unwrap();

        let lines = capture.lines();
        assert_eq!(lines.len(), 100);
        assert_eq!(lines[0], "line 0\n");
        assert_eq!(lines[99], "line 99\n");
        assert!(capture.is_closed());
    }

    #[test]
    fn test_write_requires_open() {
        let mut sink = NonBlockingBuilder::new("logtee-test", Testing::default()).build();
        let err = sink.write("early\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotInitialized);

        sink.open().unwrap();
        sink.close().unwrap();
        let err = sink.write("late\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotInitialized);
        assert_eq!(sink.open().unwrap_err().kind(), ErrorKind::NotInitialized);
    }
}
