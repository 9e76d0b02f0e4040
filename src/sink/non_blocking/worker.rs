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
use std::thread::JoinHandle;

use crossbeam_channel::Receiver;
use crossbeam_channel::RecvError;
use crossbeam_channel::Sender;
use crossbeam_channel::TryRecvError;

use super::Command;
use crate::Error;
use crate::sink::Sink;
use crate::trap::Trap;

pub(super) struct Worker {
    sink: Box<dyn Sink>,
    trap: Box<dyn Trap>,
    receiver: Receiver<Command>,
    done: Sender<Result<(), Error>>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum WorkerState {
    Empty,
    Disconnected,
    Continue,
    Shutdown,
}

impl Worker {
    pub(super) fn new(
        sink: Box<dyn Sink>,
        trap: Box<dyn Trap>,
        receiver: Receiver<Command>,
        done: Sender<Result<(), Error>>,
    ) -> Worker {
        Self {
            sink,
            trap,
            receiver,
            done,
        }
    }

    fn handle(&mut self, command: Command) -> WorkerState {
        let result = match command {
            Command::Write(text) => self.sink.write(&text),
            Command::Flush => self.sink.flush(),
            Command::Shutdown => return WorkerState::Shutdown,
        };

        if let Err(err) = result {
            self.trap.trap(&err);
        }
        WorkerState::Continue
    }

    fn recv(&mut self) -> WorkerState {
        match self.receiver.recv() {
            Ok(command) => self.handle(command),
            Err(RecvError) => WorkerState::Disconnected,
        }
    }

    fn try_recv(&mut self) -> WorkerState {
        match self.receiver.try_recv() {
            Ok(command) => self.handle(command),
            Err(TryRecvError::Empty) => WorkerState::Empty,
            Err(TryRecvError::Disconnected) => WorkerState::Disconnected,
        }
    }

    fn work(&mut self) -> WorkerState {
        let mut worker_state = self.recv();

        while worker_state == WorkerState::Continue {
            worker_state = self.try_recv();
        }

        if let Err(err) = self.sink.flush() {
            self.trap.trap(&err);
        }
        worker_state
    }

    pub(super) fn make_thread(mut self, name: String) -> io::Result<JoinHandle<()>> {
        std::thread::Builder::new().name(name).spawn(move || {
            loop {
                match self.work() {
                    WorkerState::Continue | WorkerState::Empty => {}
                    WorkerState::Shutdown | WorkerState::Disconnected => break,
                }
            }

            let result = self.sink.close();
            if let Err(result) = self.done.send(result) {
                // nobody waits for the result
                if let Err(err) = result.into_inner() {
                    self.trap.trap(&err);
                }
            }
        })
    }
}
