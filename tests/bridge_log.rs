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


//! Records of the log crate macros reach the process-wide logger.

use logtee::sink::Testing;

#[test]
fn test_log_crate_records_are_forwarded() {
    logtee::bridge::setup_log_crate();

    // nothing installed yet: reported on stderr, not forwarded
    assert!(!log::log_enabled!(log::Level::Error));
    log::error!("lost");

    let capture = Testing::default();
    logtee::builder().append(capture.clone()).apply();
    assert!(log::log_enabled!(log::Level::Trace));

    log::info!("Hello {}!", "info");
    log::warn!("Hello warn!");
    log::logger().flush();

    let lines = capture.lines();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("Type: INFO "));
    assert!(lines[0].ends_with(" Hello info!\n"));
    assert!(lines[1].contains("Type: WARN "));

    logtee::teardown().unwrap();
    assert!(capture.is_closed());
}
