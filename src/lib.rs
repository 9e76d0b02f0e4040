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


//! Logtee is a multi-sink logging engine: every log line is enriched with a timestamp, a tag,
//! the process id and the thread id, then fanned out to any number of sinks such as the console
//! and files.
//!
//! # Overview
//!
//! * A [`Sink`] is a destination that can be opened, written and closed.
//! * A [`SinkChain`] owns the sinks and replicates each line to all of them.
//! * A [`Message`] is raw text plus an ordered list of [`Decoration`]s.
//! * A [`Logger`] renders messages and pushes them into its chain.
//! * A [`LoggerBuilder`] assembles the chain and logger from sink descriptors.
//! * The [`global`] accessor makes one logger reachable from anywhere.
//! * A [`LogStream`] accumulates text and submits exactly one enriched message.
//!
//! # Examples
//!
//! Pass a logger explicitly:
//!
//! ```
//! let logger = logtee::create(["console"]).unwrap();
//!
//! logger.stream("INFO").write("listening on port ").write(8080);
//! ```
//!
//! Or install it process-wide:
//!
//! ```
//! logtee::builder().sink("console").apply();
//!
//! logtee::trace().write("hello");
//! logtee::error().write("disk usage at ").write(97).write('%');
//!
//! logtee::teardown().unwrap();
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

#[cfg(feature = "bridge-log")]
pub mod bridge;
pub mod global;
pub mod sink;
pub mod trap;

mod chain;
mod error;
mod factory;
mod logger;
mod message;
mod stream;

pub use self::chain::SinkChain;
pub use self::error::Error;
pub use self::error::ErrorKind;
pub use self::factory::LoggerBuilder;
pub use self::factory::SINKS_ENV;
pub use self::factory::SinkDescriptor;
pub use self::factory::builder;
pub use self::factory::create;
pub use self::global::init;
pub use self::global::teardown;
pub use self::logger::Logger;
pub use self::message::Context;
pub use self::message::Decoration;
pub use self::message::Message;
pub use self::message::TIMESTAMP_FORMAT;
pub use self::sink::Sink;
pub use self::stream::LogStream;
pub use self::stream::debug;
pub use self::stream::error;
pub use self::stream::info;
pub use self::stream::stream;
pub use self::stream::trace;
pub use self::stream::warn;
pub use self::trap::Trap;
