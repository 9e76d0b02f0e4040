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


//! Fan one stream of lines out to the console and two files.

use std::fmt::Write;

fn main() -> Result<(), logtee::Error> {
    logtee::builder()
        .sinks(["logs/fan_out.log", "console", "logs/fan_out.2.log"])
        .try_apply()?;

    logtee::trace().write("Hello trace!");
    logtee::info().write("Hello ").write("info!");

    let mut stream = logtee::error();
    write!(stream, "Hello {}!", "error").expect("write to a log stream");
    stream.submit()?;

    logtee::teardown()
}
