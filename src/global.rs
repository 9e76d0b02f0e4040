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


//! The process-wide logger accessor.
//!
//! Holds at most one [`Logger`]. The hosting application installs it with [`init`] (or
//! [`LoggerBuilder::apply`](crate::LoggerBuilder::apply)) and removes it with [`teardown`];
//! [`get`] in between hands out shared references. Reading the accessor while it is empty is an
//! error, never a silent no-op.

use std::sync::Arc;
use std::sync::RwLock;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;

use crate::Error;
use crate::Logger;

static LOGGER: RwLock<Option<Arc<Logger>>> = RwLock::new(None);

fn read() -> RwLockReadGuard<'static, Option<Arc<Logger>>> {
    LOGGER.read().unwrap_or_else(|e| e.into_inner())
}

fn write() -> RwLockWriteGuard<'static, Option<Arc<Logger>>> {
    LOGGER.write().unwrap_or_else(|e| e.into_inner())
}

/// Install `logger` as the process-wide logger.
///
/// A previously installed logger is closed first if nothing else holds it; otherwise it closes
/// when its last holder drops it.
///
/// # Errors
///
/// Return the close error of the replaced logger. The new logger is installed regardless.
pub fn init(logger: Logger) -> Result<(), Error> {
    let previous = write().replace(Arc::new(logger));
    release(previous)
}

/// Return the process-wide logger.
///
/// # Errors
///
/// Return [`ErrorKind::NotInitialized`](crate::ErrorKind::NotInitialized) before [`init`] or
/// after [`teardown`].
pub fn get() -> Result<Arc<Logger>, Error> {
    read()
        .clone()
        .ok_or_else(|| Error::not_initialized("logger is not initialized"))
}

/// Whether a process-wide logger is installed.
pub fn is_initialized() -> bool {
    read().is_some()
}

/// Remove the process-wide logger, closing it if nothing else holds it.
///
/// Tearing down an empty accessor is a no-op.
///
/// # Errors
///
/// Return the close error of the removed logger.
pub fn teardown() -> Result<(), Error> {
    let previous = write().take();
    release(previous)
}

fn release(logger: Option<Arc<Logger>>) -> Result<(), Error> {
    match logger.map(Arc::try_unwrap) {
        Some(Ok(logger)) => logger.close(),
        // still shared: the last holder closes it on drop
        Some(Err(_)) | None => Ok(()),
    }
}
