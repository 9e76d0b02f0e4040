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


//! Messages and the metadata decorations applied to them.

use std::fmt;
use std::thread;

use jiff::Zoned;
use jiff::tz::TimeZone;

/// The format of rendered timestamps, a ctime-style local time such as
/// `Tue Nov 14 22:13:20 2023`.
pub const TIMESTAMP_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// Ambient metadata captured at the instant a message is decorated.
#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    time: Zoned,
    pid: u32,
    tid: String,
}

impl Context {
    /// Capture the current time, process id and thread id.
    ///
    /// The time is taken in `tz` if given, otherwise in the system time zone.
    pub fn capture(tz: Option<&TimeZone>) -> Context {
        let time = match tz {
            Some(tz) => Zoned::now().with_time_zone(tz.clone()),
            None => Zoned::now(),
        };

        Context {
            time,
            pid: std::process::id(),
            tid: current_thread_id(),
        }
    }

    /// Create a context from explicit values.
    pub fn new(time: Zoned, pid: u32, tid: impl Into<String>) -> Context {
        Context {
            time,
            pid,
            tid: tid.into(),
        }
    }

    /// The captured time.
    pub fn time(&self) -> &Zoned {
        &self.time
    }

    /// The captured process id.
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// The captured thread id.
    pub fn tid(&self) -> &str {
        &self.tid
    }
}

// `ThreadId` only exposes its number through `Debug`, e.g. `ThreadId(7)`.
fn current_thread_id() -> String {
    let id = format!("{:?}", thread::current().id());
    id.trim_start_matches("ThreadId(")
        .trim_end_matches(')')
        .to_string()
}

/// One enrichment step over the text rendered so far.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoration {
    /// Prefix `TID: <id> `.
    ThreadId(String),
    /// Prefix `PID: <pid> `.
    ProcessId(u32),
    /// Prefix `Type: <tag> `.
    Tag(String),
    /// Prefix the time formatted with [`TIMESTAMP_FORMAT`] and one space.
    Timestamp(Zoned),
    /// Suffix `\n`.
    Newline,
}

impl Decoration {
    fn apply(&self, text: String) -> String {
        match self {
            Decoration::ThreadId(tid) => format!("TID: {tid} {text}"),
            Decoration::ProcessId(pid) => format!("PID: {pid} {text}"),
            Decoration::Tag(tag) => format!("Type: {tag} {text}"),
            Decoration::Timestamp(time) => {
                format!("{} {text}", time.strftime(TIMESTAMP_FORMAT))
            }
            Decoration::Newline => {
                let mut text = text;
                text.push('\n');
                text
            }
        }
    }
}

/// An immutable log message: raw text plus an ordered list of decorations.
///
/// Decorations are listed innermost first. Rendering starts from the raw text and applies each
/// decoration in turn, so the last decoration contributes the outermost prefix or suffix. Every
/// decoration carries the data it renders, so rendering is pure and repeatable.
///
/// # Examples
///
/// ```
/// use logtee::Message;
///
/// let message = Message::new("boom").with_tag("ERROR").with_newline();
/// assert_eq!(message.render(), "Type: ERROR boom\n");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    text: String,
    decorations: Vec<Decoration>,
}

impl Message {
    /// Create an undecorated message.
    pub fn new(text: impl Into<String>) -> Message {
        Message {
            text: text.into(),
            decorations: vec![],
        }
    }

    /// Create a message decorated the standard way, from the inside out: thread id, process id,
    /// tag, timestamp, trailing newline.
    ///
    /// The result renders as `<timestamp> Type: <tag> PID: <pid> TID: <tid> <text>\n`.
    pub fn enriched(text: impl Into<String>, tag: impl Into<String>, context: &Context) -> Message {
        Message::new(text)
            .with_thread_id(context.tid())
            .with_process_id(context.pid())
            .with_tag(tag)
            .with_timestamp(context.time().clone())
            .with_newline()
    }

    /// Wrap this message in one more decoration.
    pub fn decorate(mut self, decoration: Decoration) -> Message {
        self.decorations.push(decoration);
        self
    }

    /// Wrap this message in a thread id prefix.
    pub fn with_thread_id(self, tid: impl Into<String>) -> Message {
        self.decorate(Decoration::ThreadId(tid.into()))
    }

    /// Wrap this message in a process id prefix.
    pub fn with_process_id(self, pid: u32) -> Message {
        self.decorate(Decoration::ProcessId(pid))
    }

    /// Wrap this message in a tag prefix.
    pub fn with_tag(self, tag: impl Into<String>) -> Message {
        self.decorate(Decoration::Tag(tag.into()))
    }

    /// Wrap this message in a timestamp prefix.
    pub fn with_timestamp(self, time: Zoned) -> Message {
        self.decorate(Decoration::Timestamp(time))
    }

    /// Wrap this message in a trailing newline.
    pub fn with_newline(self) -> Message {
        self.decorate(Decoration::Newline)
    }

    /// The raw text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The decorations, innermost first.
    pub fn decorations(&self) -> &[Decoration] {
        &self.decorations
    }

    /// Render the final string.
    pub fn render(&self) -> String {
        self.decorations
            .iter()
            .fold(self.text.clone(), |text, decoration| decoration.apply(text))
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
