use std::sync::mpsc::Sender;

use crate::system::SchedulerStatus;

/// Commands processed one at a time by the scheduler's event loop.
pub(crate) enum SchedulerCommand {
    Enqueue(QueueItem),
    Interrupt(QueueItem),
    Clear,
    StopCurrent,
    StopCurrentAndAdvance,
    ClipFinished(ClipFinished),
    InterruptionBegan,
    InterruptionEnded { should_resume: bool },
    SetVolume(f32),
    AdjustVolume(f32),
    Status(Sender<SchedulerStatus>),
    Shutdown,
}

/// Completion report for a clip. `session` is `None` when the report comes from outside
/// (`SchedulerHandle::on_clip_finished`) and applies to whatever is at the head of the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ClipFinished {
    pub session: Option<u64>,
    pub success: bool,
}

// note about ordering: derived Ord follows declaration order, so High > Normal
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClipPriority {
    Normal,
    High,
}

/// A playback request. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueItem {
    identifier: String,
    priority: ClipPriority,
}

impl QueueItem {
    pub fn new(identifier: impl Into<String>, priority: ClipPriority) -> Self {
        Self {
            identifier: identifier.into(),
            priority,
        }
    }

    pub fn normal(identifier: impl Into<String>) -> Self {
        Self::new(identifier, ClipPriority::Normal)
    }

    pub fn high(identifier: impl Into<String>) -> Self {
        Self::new(identifier, ClipPriority::High)
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn priority(&self) -> ClipPriority {
        self.priority
    }
}
