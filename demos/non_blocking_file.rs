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


//! Write to a file from a background worker while the caller keeps going.

use std::time::Duration;

use logtee::sink::File;
use logtee::sink::NonBlockingBuilder;

fn main() -> Result<(), logtee::Error> {
    let file = NonBlockingBuilder::new("logtee-file", File::new("logs/non_blocking.log"))
        .buffered_lines_limit(Some(1024))
        .shutdown_timeout(Some(Duration::from_secs(1)))
        .build();

    let logger = logtee::builder().sink("console").append(file).build()?;
    for i in 0..10 {
        logger.stream("INFO").write("line ").write(i).submit()?;
    }

    logger.close()
}
