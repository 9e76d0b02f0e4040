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


use std::io;
use std::io::Write;

use crate::Error;
use crate::sink::Sink;

/// A sink that writes log lines verbatim to stdout.
///
/// # Examples
///
/// ```
/// use logtee::sink::Console;
///
/// let console = Console::default();
/// ```
#[derive(Debug, Default, Clone, Copy)]
#[non_exhaustive]
pub struct Console {}

impl Sink for Console {
    fn write(&mut self, text: &str) -> Result<(), Error> {
        io::stdout()
            .lock()
            .write_all(text.as_bytes())
            .map_err(Error::from_io_error)
            .map_err(|err| err.with_context("sink", "console"))
    }

    fn flush(&mut self) -> Result<(), Error> {
        io::stdout()
            .flush()
            .map_err(Error::from_io_error)
            .map_err(|err| err.with_context("sink", "console"))
    }

    fn close(&mut self) -> Result<(), Error> {
        self.flush()
    }
}
