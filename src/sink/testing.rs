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


use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::Error;
use crate::sink::Sink;

#[derive(Debug, Default)]
struct State {
    open: bool,
    closed: bool,
    lines: Vec<String>,
}

/// A sink that captures written text in memory so that a test harness can assert on it.
///
/// Clones share the same capture buffer: keep one clone and hand the other to a logger.
///
/// # Examples
///
/// ```
/// use logtee::sink::Testing;
///
/// let capture = Testing::default();
/// let logger = logtee::builder().append(capture.clone()).build().unwrap();
/// logger.stream("TRACE").write("hello").submit().unwrap();
/// assert_eq!(capture.lines().len(), 1);
/// ```
#[derive(Debug, Default, Clone)]
pub struct Testing {
    state: Arc<Mutex<State>>,
}

impl Testing {
    /// Every string written so far, in write order.
    pub fn lines(&self) -> Vec<String> {
        self.state().lines.clone()
    }

    /// The concatenation of every string written so far.
    pub fn contents(&self) -> String {
        self.state().lines.concat()
    }

    /// Whether the sink has been opened and not yet closed.
    pub fn is_open(&self) -> bool {
        self.state().open
    }

    /// Whether the sink has been closed.
    pub fn is_closed(&self) -> bool {
        self.state().closed
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Sink for Testing {
    fn open(&mut self) -> Result<(), Error> {
        let mut state = self.state();
        state.open = true;
        state.closed = false;
        Ok(())
    }

    fn write(&mut self, text: &str) -> Result<(), Error> {
        let mut state = self.state();
        if !state.open {
            return Err(Error::not_initialized("testing sink is not open"));
        }
        state.lines.push(text.to_string());
        Ok(())
    }

    fn close(&mut self) -> Result<(), Error> {
        let mut state = self.state();
        state.open = false;
        state.closed = true;
        Ok(())
    }
}
