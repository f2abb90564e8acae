use std::sync::mpsc::{self, Sender};

use tracing::debug;

use crate::command::{ClipFinished, ClipPriority, QueueItem, SchedulerCommand};
use crate::system::SchedulerStatus;

/// Cloneable handle to a running [`PlaybackScheduler`](crate::PlaybackScheduler). Every call
/// only posts a command to the event loop and returns. Once the scheduler is torn down the
/// calls are no-ops.
#[derive(Clone)]
pub struct SchedulerHandle {
    pub(crate) command_sender: Sender<SchedulerCommand>,
}

impl SchedulerHandle {
    /// Queue a clip behind everything of equal or higher priority.
    pub fn enqueue(&self, identifier: impl Into<String>, priority: ClipPriority) {
        self.send(SchedulerCommand::Enqueue(QueueItem::new(identifier, priority)));
    }

    /// Put a clip at the very front of the queue and cut off whatever is playing.
    pub fn interrupt(&self, identifier: impl Into<String>, priority: ClipPriority) {
        self.send(SchedulerCommand::Interrupt(QueueItem::new(identifier, priority)));
    }

    /// Drop all queued clips. A clip that is already playing keeps playing.
    pub fn clear(&self) {
        self.send(SchedulerCommand::Clear);
    }

    /// Stop the sink without touching the queue or the playback state.
    pub fn stop_current(&self) {
        self.send(SchedulerCommand::StopCurrent);
    }

    pub fn stop_current_and_advance(&self) {
        self.send(SchedulerCommand::StopCurrentAndAdvance);
    }

    pub fn set_volume(&self, volume: f32) {
        self.send(SchedulerCommand::SetVolume(volume));
    }

    pub fn adjust_volume(&self, delta: f32) {
        self.send(SchedulerCommand::AdjustVolume(delta));
    }

    pub fn on_interruption_began(&self) {
        self.send(SchedulerCommand::InterruptionBegan);
    }

    pub fn on_interruption_ended(&self, should_resume: bool) {
        self.send(SchedulerCommand::InterruptionEnded { should_resume });
    }

    /// Report that the clip at the head of the queue has finished.
    pub fn on_clip_finished(&self, success: bool) {
        self.send(SchedulerCommand::ClipFinished(ClipFinished {
            session: None,
            success,
        }));
    }

    /// Snapshot of queue and state, taken after every command sent before this call.
    /// Returns `None` if the event loop is gone.
    pub fn status(&self) -> Option<SchedulerStatus> {
        let (reply_sender, reply_receiver) = mpsc::channel();
        self.command_sender
            .send(SchedulerCommand::Status(reply_sender))
            .ok()?;
        reply_receiver.recv().ok()
    }

    fn send(&self, command: SchedulerCommand) {
        post(&self.command_sender, command);
    }
}

/// Hand `command` to the event loop. After teardown the command is dropped and logged.
pub(crate) fn post(command_sender: &Sender<SchedulerCommand>, command: SchedulerCommand) {
    if command_sender.send(command).is_err() {
        debug!("scheduler already torn down, command dropped");
    }
}

/// Event emitter for one sink session. Reports are delivered to the scheduler's event loop
/// and ignored there if the session is no longer current.
#[derive(Clone)]
pub struct ClipEvents {
    session: u64,
    command_sender: Sender<SchedulerCommand>,
}

impl ClipEvents {
    pub(crate) fn new(session: u64, command_sender: Sender<SchedulerCommand>) -> Self {
        Self {
            session,
            command_sender,
        }
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    pub fn finished(&self, success: bool) {
        post(
            &self.command_sender,
            SchedulerCommand::ClipFinished(ClipFinished {
                session: Some(self.session),
                success,
            }),
        );
    }

    pub fn interruption_began(&self) {
        post(&self.command_sender, SchedulerCommand::InterruptionBegan);
    }

    pub fn interruption_ended(&self, should_resume: bool) {
        post(
            &self.command_sender,
            SchedulerCommand::InterruptionEnded { should_resume },
        );
    }
}
