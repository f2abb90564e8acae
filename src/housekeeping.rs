use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::debug;

use crate::sink::OutputLevel;

/// Recurring output-volume poll. Runs on its own thread and never touches the queue.
pub(crate) struct Housekeeping {
    stop_sender: Sender<()>,
    thread: JoinHandle<()>,
}

impl Housekeeping {
    pub fn start(interval: Duration, level: OutputLevel) -> Self {
        let (stop_sender, stop_receiver) = mpsc::channel::<()>();
        let thread = thread::spawn(move || loop {
            match stop_receiver.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    debug!(volume = level.get(), "current output volume");
                }
                // explicit stop or handle dropped
                _ => break,
            }
        });
        Self {
            stop_sender,
            thread,
        }
    }

    pub fn stop(self) {
        let _ = self.stop_sender.send(());
        let _ = self.thread.join();
    }
}
