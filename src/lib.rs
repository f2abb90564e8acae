//! Sequential audio clip scheduler: priority-ordered queue, pre-emption, and interruption
//! handling on top of a single playback sink.

mod command;
mod config;
mod error;
mod handle;
mod housekeeping;
mod interruption;
mod sink;
mod system;
mod timer;

pub use command::{ClipPriority, QueueItem};
pub use config::{SchedulerConfig, SinkConfig};
pub use error::{Result, SchedulerError};
pub use handle::{ClipEvents, SchedulerHandle};
pub use interruption::{InterruptionListener, InterruptionSource, ManualInterruptions};
pub use sink::{ClipSink, OutputLevel};
pub use system::sound::{RodioClip, RodioSink};
pub use system::{PlaybackScheduler, PlaybackState, SchedulerStatus};
