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


use std::fs;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use crate::Error;
use crate::ErrorKind;
use crate::sink::Sink;

/// A sink that appends log lines to a file.
///
/// The file is opened in append mode on [`open`](Sink::open), and created along with its parent
/// directories if absent. Every write goes straight to the file handle.
///
/// # Examples
///
/// ```
/// use logtee::sink::File;
///
/// let file = File::new("logs/my_service.log");
/// assert_eq!(file.path().to_str(), Some("logs/my_service.log"));
/// ```
#[derive(Debug)]
pub struct File {
    path: PathBuf,
    writer: Option<fs::File>,
}

impl File {
    /// Create a new file sink for `path`. Nothing is touched until the sink is opened.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: None,
        }
    }

    /// The path this sink appends to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file handle is currently held.
    pub fn is_open(&self) -> bool {
        self.writer.is_some()
    }

    fn io_error(&self, message: &str, err: std::io::Error) -> Error {
        Error::new(ErrorKind::Io, message)
            .with_context("path", self.path.display())
            .with_source(err)
    }
}

impl Sink for File {
    fn open(&mut self) -> Result<(), Error> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)
                    .map_err(|err| self.io_error("failed to create log directory", err))?;
            }
        }

        let writer = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|err| self.io_error("failed to open log file", err))?;
        self.writer = Some(writer);
        Ok(())
    }

    fn write(&mut self, text: &str) -> Result<(), Error> {
        let Some(writer) = self.writer.as_mut() else {
            return Err(Error::not_initialized("file sink is not open")
                .with_context("path", self.path.display()));
        };

        if let Err(err) = writer.write_all(text.as_bytes()) {
            return Err(self.io_error("failed to write log file", err));
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Error> {
        let Some(writer) = self.writer.as_mut() else {
            return Ok(());
        };

        if let Err(err) = writer.flush() {
            return Err(self.io_error("failed to flush log file", err));
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), Error> {
        let Some(mut writer) = self.writer.take() else {
            return Ok(());
        };

        writer
            .flush()
            .map_err(|err| self.io_error("failed to close log file", err))
    }
}
