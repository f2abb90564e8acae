use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sample, Sink, Source};
use tracing::debug;

use crate::config::SinkConfig;
use crate::error::{Result, SchedulerError};
use crate::handle::ClipEvents;
use crate::sink::ClipSink;

/// [`ClipSink`] on top of rodio. Identifiers are file names under `clip_dir`; a fresh rodio
/// `Sink` is created on every activation and completion is reported when the decoder runs
/// dry.
pub struct RodioSink {
    config: SinkConfig,
    // OutputStream must stay alive (and on the thread that created it) for any output
    _stream: Option<OutputStream>,
    stream_handle: Option<OutputStreamHandle>,
    sink: Option<Sink>,
    volume: f32,
}

/// Decoded clip, ready to be appended to a rodio sink.
pub struct RodioClip {
    path: PathBuf,
    source: Decoder<BufReader<File>>,
}

impl RodioClip {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RodioSink {
    /// Open the default output device. Call it on the thread that will drive the sink,
    /// i.e. inside the closure handed to [`PlaybackScheduler::run`](crate::PlaybackScheduler::run).
    pub fn open(config: SinkConfig) -> Result<Self> {
        let (stream, stream_handle) =
            OutputStream::try_default().map_err(|e| SchedulerError::Device(e.to_string()))?;
        let volume = config.volume;
        Ok(Self {
            config,
            _stream: Some(stream),
            stream_handle: Some(stream_handle),
            sink: None,
            volume,
        })
    }

    /// Sink without an output device. Clips load, but activation always fails.
    pub fn idle(config: SinkConfig) -> Self {
        let volume = config.volume;
        Self {
            config,
            _stream: None,
            stream_handle: None,
            sink: None,
            volume,
        }
    }

    /// File an identifier refers to: `<clip_dir>/<identifier>`, with the default extension
    /// appended if the identifier has none.
    pub fn resolve(&self, identifier: &str) -> PathBuf {
        let mut path = self.config.clip_dir.join(identifier);
        if path.extension().is_none() {
            path.set_extension(&self.config.default_extension);
        }
        path
    }
}

impl ClipSink for RodioSink {
    type Clip = RodioClip;

    fn load(&mut self, identifier: &str) -> Result<RodioClip> {
        let path = self.resolve(identifier);
        let file = File::open(&path).map_err(|e| {
            SchedulerError::ClipNotFound(format!("{}: {}", path.display(), e))
        })?;
        let source = Decoder::new(BufReader::new(file)).map_err(|e| {
            SchedulerError::ClipNotFound(format!("{}: {}", path.display(), e))
        })?;
        Ok(RodioClip { path, source })
    }

    fn duration(&self, clip: &RodioClip) -> Option<Duration> {
        clip.source.total_duration()
    }

    fn activate(&mut self) -> Result<()> {
        let stream_handle = self
            .stream_handle
            .as_ref()
            .ok_or_else(|| SchedulerError::SinkActivation("no output device".to_string()))?;
        let sink = Sink::try_new(stream_handle)
            .map_err(|e| SchedulerError::SinkActivation(e.to_string()))?;
        sink.set_volume(self.volume);
        if let Some(previous) = self.sink.replace(sink) {
            previous.stop();
        }
        Ok(())
    }

    fn deactivate(&mut self) -> Result<()> {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        Ok(())
    }

    fn play(&mut self, clip: RodioClip, events: ClipEvents) -> Result<()> {
        let sink = self
            .sink
            .as_ref()
            .ok_or_else(|| SchedulerError::SinkActivation("sink not activated".to_string()))?;
        debug!(path = %clip.path.display(), session = events.session(), "appending clip");
        sink.append(NotifyOnEnd::new(clip.source, events));
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(sink) = &self.sink {
            sink.set_volume(volume);
        }
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn reports_completion(&self) -> bool {
        true
    }
}

/// Passes samples through and reports the session finished once the inner source ends.
/// A stopped sink never drains it, so nothing is reported for cut-off clips.
struct NotifyOnEnd<I> {
    inner: I,
    events: Option<ClipEvents>,
}

impl<I> NotifyOnEnd<I> {
    fn new(inner: I, events: ClipEvents) -> Self {
        Self {
            inner,
            events: Some(events),
        }
    }
}

impl<I> Iterator for NotifyOnEnd<I>
where
    I: Iterator,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let sample = self.inner.next();
        if sample.is_none() {
            if let Some(events) = self.events.take() {
                events.finished(true);
            }
        }
        sample
    }
}

impl<I> Source for NotifyOnEnd<I>
where
    I: Source,
    I::Item: Sample,
{
    fn current_frame_len(&self) -> Option<usize> {
        self.inner.current_frame_len()
    }

    fn channels(&self) -> u16 {
        self.inner.channels()
    }

    fn sample_rate(&self) -> u32 {
        self.inner.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        self.inner.total_duration()
    }
}
