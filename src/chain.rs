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

use crate::Error;
use crate::ErrorKind;
use crate::sink::Sink;
use crate::trap::DefaultTrap;
use crate::trap::Trap;

/// A fan-out chain of sinks.
///
/// A chain is built one node at a time with [`SinkChain::new`]: each node opens its sink
/// immediately and takes exclusive ownership of the rest of the chain as `next`. The first node
/// built is therefore the tail, and the last node built is the root.
///
/// [`log`](SinkChain::log) writes the identical text to the root's sink first, then forwards it
/// down to the tail. A failing sink never stops the text from reaching the remaining sinks; all
/// failures of one call are aggregated into a single error.
///
/// Closing, explicitly or on drop, goes root first: the reverse of the opening order.
///
/// # Examples
///
/// ```
/// use logtee::SinkChain;
/// use logtee::sink::Testing;
///
/// let (tail, root) = (Testing::default(), Testing::default());
/// let chain = SinkChain::new(tail.clone(), None).unwrap();
/// let mut chain = SinkChain::new(root.clone(), Some(chain)).unwrap();
///
/// chain.log("hello\n").unwrap();
/// assert_eq!(tail.contents(), "hello\n");
/// assert_eq!(root.contents(), "hello\n");
/// ```
#[derive(Debug)]
pub struct SinkChain {
    // tail first; the root is the last element
    sinks: Vec<Box<dyn Sink>>,
}

impl SinkChain {
    /// Open `sink` and link it in front of `next`, returning the new root.
    ///
    /// # Errors
    ///
    /// Return the sink's open error. `next` is dropped, which closes its sinks.
    pub fn new(
        sink: impl Into<Box<dyn Sink>>,
        next: Option<SinkChain>,
    ) -> Result<SinkChain, Error> {
        let mut sink = sink.into();
        sink.open()?;

        let mut sinks = match next {
            Some(mut next) => mem::take(&mut next.sinks),
            None => Vec::with_capacity(1),
        };
        sinks.push(sink);
        Ok(SinkChain { sinks })
    }

    /// The number of live sinks in the chain.
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Whether the chain has no live sinks, which only happens after [`close`](SinkChain::close).
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Write `text` to every sink, root first.
    ///
    /// # Errors
    ///
    /// Return an [`ErrorKind::Io`] error carrying each failing sink's error as a source, after
    /// every sink has been attempted.
    pub fn log(&mut self, text: &str) -> Result<(), Error> {
        if self.sinks.is_empty() {
            return Err(Error::not_initialized("sink chain is closed"));
        }
        fan_out("write to", self.sinks.iter_mut().rev(), |sink: &mut Box<dyn Sink>| {
            sink.write(text)
        })
    }

    /// Flush every sink, root first.
    pub fn flush(&mut self) -> Result<(), Error> {
        fan_out("flush", self.sinks.iter_mut().rev(), |sink: &mut Box<dyn Sink>| {
            sink.flush()
        })
    }

    /// Close every sink, root first, and release them.
    ///
    /// Closing an already closed chain is a no-op.
    pub fn close(&mut self) -> Result<(), Error> {
        let sinks = mem::take(&mut self.sinks);
        fan_out("close", sinks.into_iter().rev(), |mut sink: Box<dyn Sink>| {
            sink.close()
        })
    }
}

impl Drop for SinkChain {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            DefaultTrap::default().trap(&err);
        }
    }
}

fn fan_out<S, I, F>(op: &str, sinks: I, mut f: F) -> Result<(), Error>
where
    I: Iterator<Item = S>,
    F: FnMut(S) -> Result<(), Error>,
{
    let mut total = 0;
    let mut failures = vec![];
    for sink in sinks {
        total += 1;
        if let Err(err) = f(sink) {
            failures.push(err);
        }
    }

    if failures.is_empty() {
        return Ok(());
    }

    let failed = failures.len();
    let mut err = Error::new(ErrorKind::Io, format!("failed to {op} {failed} of {total} sinks"))
        .with_context("failed", failed)
        .with_context("total", total);
    for failure in failures {
        err = err.with_source(failure);
    }
    Err(err)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;

    use super::*;

    type Journal = Arc<Mutex<Vec<String>>>;

    #[derive(Debug)]
    struct Recorder {
        name: &'static str,
        journal: Journal,
        fail_writes: bool,
    }

    impl Recorder {
        fn new(name: &'static str, journal: &Journal) -> Self {
            Self {
                name,
                journal: journal.clone(),
                fail_writes: false,
            }
        }

        fn failing(name: &'static str, journal: &Journal) -> Self {
            Self {
                fail_writes: true,
                ..Self::new(name, journal)
            }
        }

        fn record(&self, event: String) {
            self.journal.lock().unwrap().push(event);
        }
    }

    impl Sink for Recorder {
        fn open(&mut self) -> Result<(), Error> {
            self.record(format!("open {}", self.name));
            Ok(())
        }

        fn write(&mut self, text: &str) -> Result<(), Error> {
            if self.fail_writes {
                return Err(Error::new(ErrorKind::Io, format!("{} is broken", self.name)));
            }
            self.record(format!("write {} {text}", self.name));
            Ok(())
        }

        fn close(&mut self) -> Result<(), Error> {
            self.record(format!("close {}", self.name));
            Ok(())
        }
    }

    #[derive(Debug)]
    struct Unopenable;

    impl Sink for Unopenable {
        fn open(&mut self) -> Result<(), Error> {
            Err(Error::new(ErrorKind::Io, "permission denied"))
        }

        fn write(&mut self, _: &str) -> Result<(), Error> {
            unreachable!("never opened")
        }
    }

    fn build(journal: &Journal, names: &[&'static str]) -> SinkChain {
        let mut chain = None;
        for name in names {
            chain = Some(SinkChain::new(Recorder::new(name, journal), chain).unwrap());
        }
        chain.unwrap()
    }

    fn events(journal: &Journal) -> Vec<String> {
        journal.lock().unwrap().clone()
    }

    #[test]
    fn test_lifecycle_order() {
        let journal = Journal::default();
        let mut chain = build(&journal, &["a", "b", "c"]);
        assert_eq!(chain.len(), 3);

        chain.log("x").unwrap();
        drop(chain);

        assert_eq!(
            events(&journal),
            vec![
                "open a", "open b", "open c", "write c x", "write b x", "write a x", "close c",
                "close b", "close a",
            ]
        );
    }

    #[test]
    fn test_failing_sink_does_not_stop_fan_out() {
        let journal = Journal::default();
        let chain = SinkChain::new(Recorder::new("tail", &journal), None).unwrap();
        let chain = SinkChain::new(Recorder::failing("broken", &journal), Some(chain)).unwrap();
        let mut chain = SinkChain::new(Recorder::new("root", &journal), Some(chain)).unwrap();

        let err = chain.log("x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(err.context("failed"), Some("1"));
        assert_eq!(err.context("total"), Some("3"));
        assert_eq!(err.sources().len(), 1);

        let writes = events(&journal)
            .into_iter()
            .filter(|e| e.starts_with("write"))
            .collect::<Vec<_>>();
        assert_eq!(writes, vec!["write root x", "write tail x"]);
    }

    #[test]
    fn test_close_is_idempotent() {
        let journal = Journal::default();
        let mut chain = build(&journal, &["a"]);

        chain.close().unwrap();
        assert!(chain.is_empty());
        chain.close().unwrap();

        let err = chain.log("late").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotInitialized);
        drop(chain);

        assert_eq!(events(&journal), vec!["open a", "close a"]);
    }

    #[test]
    fn test_open_failure_closes_rest_of_chain() {
        let journal = Journal::default();
        let chain = build(&journal, &["a"]);

        let err = SinkChain::new(Unopenable, Some(chain)).unwrap_err();
        assert_eq!(err.message(), "permission denied");
        assert_eq!(events(&journal), vec!["open a", "close a"]);
    }
}
