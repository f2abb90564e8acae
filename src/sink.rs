use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use crate::handle::ClipEvents;

/// Audio output the scheduler drives. Only the scheduler's event loop calls into it, one
/// session at a time: `activate`, `load`, `play`, then `stop` or a `finished` report through
/// the [`ClipEvents`] passed to `play`. `deactivate` is called when the queue runs dry.
pub trait ClipSink {
    type Clip;

    /// Resolve `identifier` to playable content. Fails with
    /// [`SchedulerError::ClipNotFound`](crate::SchedulerError::ClipNotFound).
    fn load(&mut self, identifier: &str) -> Result<Self::Clip>;

    /// Clip length, if the sink can tell.
    fn duration(&self, clip: &Self::Clip) -> Option<Duration>;

    fn activate(&mut self) -> Result<()>;

    fn deactivate(&mut self) -> Result<()>;

    fn play(&mut self, clip: Self::Clip, events: ClipEvents) -> Result<()>;

    fn stop(&mut self);

    fn set_volume(&mut self, volume: f32);

    fn volume(&self) -> f32;

    /// Whether `play` reliably reports completion through [`ClipEvents::finished`]. When false
    /// the scheduler derives completion from the clip duration.
    fn reports_completion(&self) -> bool {
        false
    }
}

/// Last output volume applied by the event loop, readable from any thread.
#[derive(Clone, Debug)]
pub struct OutputLevel(Arc<AtomicU32>);

impl OutputLevel {
    pub fn new(volume: f32) -> Self {
        Self(Arc::new(AtomicU32::new(volume.to_bits())))
    }

    pub fn get(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    pub(crate) fn set(&self, volume: f32) {
        self.0.store(volume.to_bits(), Ordering::Relaxed);
    }
}
