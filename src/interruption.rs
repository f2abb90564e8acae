use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

use crate::command::SchedulerCommand;
use crate::handle::post;

/// Platform service announcing that something else took the audio device (phone call,
/// another app). The scheduler subscribes when it starts and unsubscribes on teardown.
pub trait InterruptionSource: Send {
    fn subscribe(&mut self, listener: InterruptionListener);

    fn unsubscribe(&mut self);
}

/// Callback target handed to an [`InterruptionSource`]. Events land on the scheduler's
/// event loop.
#[derive(Clone)]
pub struct InterruptionListener {
    command_sender: Sender<SchedulerCommand>,
}

impl InterruptionListener {
    pub(crate) fn new(command_sender: Sender<SchedulerCommand>) -> Self {
        Self { command_sender }
    }

    pub fn began(&self) {
        post(&self.command_sender, SchedulerCommand::InterruptionBegan);
    }

    pub fn ended(&self, should_resume: bool) {
        post(
            &self.command_sender,
            SchedulerCommand::InterruptionEnded { should_resume },
        );
    }
}

/// In-process interruption source, raised by hand. Clones share the subscription.
#[derive(Clone, Default)]
pub struct ManualInterruptions {
    listener: Arc<Mutex<Option<InterruptionListener>>>,
}

impl ManualInterruptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_subscribed(&self) -> bool {
        self.listener
            .lock()
            .map(|listener| listener.is_some())
            .unwrap_or(false)
    }

    pub fn begin(&self) {
        if let Ok(listener) = self.listener.lock() {
            if let Some(listener) = listener.as_ref() {
                listener.began();
            }
        }
    }

    pub fn end(&self, should_resume: bool) {
        if let Ok(listener) = self.listener.lock() {
            if let Some(listener) = listener.as_ref() {
                listener.ended(should_resume);
            }
        }
    }
}

impl InterruptionSource for ManualInterruptions {
    fn subscribe(&mut self, listener: InterruptionListener) {
        if let Ok(mut slot) = self.listener.lock() {
            *slot = Some(listener);
        }
    }

    fn unsubscribe(&mut self) {
        if let Ok(mut slot) = self.listener.lock() {
            slot.take();
        }
    }
}
