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


//! Destinations for rendered log lines.

use std::fmt;

use crate::Error;

mod file;
#[cfg(feature = "non-blocking")]
mod non_blocking;
mod stdio;
mod testing;

pub use self::file::File;
#[cfg(feature = "non-blocking")]
pub use self::non_blocking::NonBlocking;
#[cfg(feature = "non-blocking")]
pub use self::non_blocking::NonBlockingBuilder;
pub use self::stdio::Console;
pub use self::testing::Testing;

/// A writable destination for rendered log text.
///
/// A sink is opened once by the [`SinkChain`](crate::SinkChain) node that owns it, receives
/// every line through [`write`](Sink::write) while open, and is closed when the node is torn
/// down. Writing to a sink that is not open is an error, never a silent no-op.
pub trait Sink: fmt::Debug + Send + 'static {
    /// Prepare the underlying resource for writing.
    ///
    /// Default to a no-op.
    fn open(&mut self) -> Result<(), Error> {
        Ok(())
    }

    /// Append `text` verbatim. No framing is added.
    fn write(&mut self, text: &str) -> Result<(), Error>;

    /// Flush any buffered text.
    ///
    /// Default to a no-op.
    fn flush(&mut self) -> Result<(), Error> {
        Ok(())
    }

    /// Release the underlying resource.
    ///
    /// Default to a no-op.
    fn close(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

impl<T: Sink> From<T> for Box<dyn Sink> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}
