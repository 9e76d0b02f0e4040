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


//! Lifecycle of the process-wide logger, from before `init` to after `teardown`.

use std::panic;

use logtee::ErrorKind;
use logtee::sink::Testing;

#[test]
fn test_global_lifecycle() {
    // before init
    assert!(!logtee::global::is_initialized());
    let err = logtee::global::get().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotInitialized);
    let err = logtee::trace().write("too early").submit().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotInitialized);

    // init with the console plus a capture standing in for stdout
    let capture = Testing::default();
    logtee::builder()
        .sink("console")
        .append(capture.clone())
        .try_apply()
        .unwrap();
    assert!(logtee::global::is_initialized());

    logtee::stream("TRACE").write("hello");

    let lines = capture.lines();
    assert_eq!(lines.len(), 1);
    let line = &lines[0];
    assert!(line.ends_with(" hello\n"));
    assert!(line.contains("Type: TRACE "));
    assert!(line.contains(&format!("PID: {} ", std::process::id())));
    assert!(line.contains(" TID: "));

    // replacing the logger closes the previous one
    let replacement = Testing::default();
    logtee::init(logtee::builder().append(replacement.clone()).build().unwrap()).unwrap();
    assert!(capture.is_closed());
    logtee::warn().write("second");
    assert_eq!(capture.lines().len(), 1);
    assert_eq!(replacement.lines().len(), 1);

    // a logger still held elsewhere outlives teardown
    let held = logtee::global::get().unwrap();
    logtee::teardown().unwrap();
    assert!(!replacement.is_closed());
    held.stream("INFO").write("held").submit().unwrap();
    drop(held);
    assert!(replacement.is_closed());
    assert_eq!(replacement.lines().len(), 2);

    // after teardown
    let err = logtee::global::get().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotInitialized);
    let err = logtee::error().write("too late").submit().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotInitialized);

    // a stream dropped with nothing to submit to fails loudly
    let dropped = panic::catch_unwind(|| {
        logtee::info().write("dropped");
    });
    assert!(dropped.is_err());

    // tearing down twice is harmless
    logtee::teardown().unwrap();
}
