use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use tracing::{debug, info, trace, warn};

use crate::command::{ClipFinished, QueueItem, SchedulerCommand};
use crate::config::SchedulerConfig;
use crate::error::{Result, SchedulerError};
use crate::handle::{ClipEvents, SchedulerHandle};
use crate::housekeeping::Housekeeping;
use crate::interruption::{InterruptionListener, InterruptionSource};
use crate::sink::{ClipSink, OutputLevel};
use crate::system::queue::ClipQueue;
use crate::timer;

mod queue;
pub mod sound;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing(QueueItem),
}

/// Point-in-time view of the scheduler, see [`SchedulerHandle::status`].
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerStatus {
    pub state: PlaybackState,
    pub queue: Vec<QueueItem>,
    pub volume: f32,
}

impl SchedulerStatus {
    pub fn is_playing(&self) -> bool {
        matches!(self.state, PlaybackState::Playing(_))
    }

    pub fn playing(&self) -> Option<&str> {
        match &self.state {
            PlaybackState::Playing(item) => Some(item.identifier()),
            PlaybackState::Idle => None,
        }
    }
}

/// Sequential clip scheduler. Owns an event loop thread that holds the queue, the playback
/// state and the sink; everything else talks to it through [`SchedulerHandle`].
pub struct PlaybackScheduler {
    handle: SchedulerHandle,
    event_loop: Option<JoinHandle<()>>,
    housekeeping: Option<Housekeeping>,
    interruptions: Option<Box<dyn InterruptionSource>>,
    level: OutputLevel,
}

impl PlaybackScheduler {
    /// Spawn the event loop and build the sink on it with `make_sink`. Returns once the sink
    /// is ready, or with the error `make_sink` failed with. `interruptions`, if given, is
    /// subscribed here and unsubscribed on teardown.
    pub fn run<S, F>(
        config: SchedulerConfig,
        make_sink: F,
        interruptions: Option<Box<dyn InterruptionSource>>,
    ) -> Result<Self>
    where
        S: ClipSink + 'static,
        F: FnOnce() -> Result<S> + Send + 'static,
    {
        let (command_sender, command_receiver) = mpsc::channel::<SchedulerCommand>();
        let (init_sender, init_receiver) = mpsc::channel::<Option<SchedulerError>>();
        let level = OutputLevel::new(config.sink.volume);
        let housekeeping_interval = config.housekeeping_interval();

        let loop_sender = command_sender.clone();
        let loop_level = level.clone();
        let event_loop = thread::Builder::new()
            .name("clip-scheduler".to_string())
            .spawn(move || {
                // the sink may hold device handles that must stay on this thread
                match make_sink() {
                    Ok(sink) => {
                        let _ = init_sender.send(None);
                        EventLoop::new(sink, config, command_receiver, loop_sender, loop_level)
                            .run();
                    }
                    Err(e) => {
                        let _ = init_sender.send(Some(e));
                    }
                }
            })?;

        match init_receiver.recv() {
            Ok(None) => {}
            Ok(Some(err)) => {
                let _ = event_loop.join();
                return Err(err);
            }
            Err(_) => {
                let _ = event_loop.join();
                return Err(SchedulerError::Device(
                    "event loop exited during startup".to_string(),
                ));
            }
        }

        let mut interruptions = interruptions;
        if let Some(source) = interruptions.as_mut() {
            source.subscribe(InterruptionListener::new(command_sender.clone()));
        }
        let housekeeping =
            housekeeping_interval.map(|interval| Housekeeping::start(interval, level.clone()));
        info!("playback scheduler started");

        Ok(Self {
            handle: SchedulerHandle { command_sender },
            event_loop: Some(event_loop),
            housekeeping,
            interruptions,
            level,
        })
    }

    pub fn handle(&self) -> SchedulerHandle {
        self.handle.clone()
    }

    /// Output volume last applied by the event loop.
    pub fn output_level(&self) -> OutputLevel {
        self.level.clone()
    }

    /// Stop the volume poll, drop the interruption subscription, stop the sink and join the
    /// event loop. Handles outlive this but turn into no-ops.
    pub fn teardown(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(mut source) = self.interruptions.take() {
            source.unsubscribe();
        }
        if let Some(housekeeping) = self.housekeeping.take() {
            housekeeping.stop();
        }
        if let Some(event_loop) = self.event_loop.take() {
            let _ = self.handle.command_sender.send(SchedulerCommand::Shutdown);
            let _ = event_loop.join();
            info!("playback scheduler torn down");
        }
    }
}

impl Drop for PlaybackScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// State owned by the event loop thread. Only `process_command` mutates it.
struct EventLoop<S: ClipSink> {
    command_receiver: Receiver<SchedulerCommand>,
    // for fallback timers and sink sessions
    command_sender: Sender<SchedulerCommand>,
    queue: ClipQueue,
    state: PlaybackState,
    /// Whether the clip started last is still the queue head, including after an
    /// interruption reset the state to `Idle`. Cleared by `clear`, so a late completion
    /// cannot pop a clip enqueued afterwards.
    current_at_head: bool,
    /// Live sink session, if any
    session: Option<u64>,
    next_session: u64,
    sink: S,
    config: SchedulerConfig,
    level: OutputLevel,
}

impl<S: ClipSink> EventLoop<S> {
    fn new(
        mut sink: S,
        config: SchedulerConfig,
        command_receiver: Receiver<SchedulerCommand>,
        command_sender: Sender<SchedulerCommand>,
        level: OutputLevel,
    ) -> Self {
        sink.set_volume(config.sink.volume);
        level.set(sink.volume());
        Self {
            command_receiver,
            command_sender,
            queue: ClipQueue::default(),
            state: PlaybackState::Idle,
            current_at_head: false,
            session: None,
            next_session: 0,
            sink,
            config,
            level,
        }
    }

    fn run(mut self) {
        while let Ok(command) = self.command_receiver.recv() {
            if self.process_command(command) {
                break;
            }
        }
        debug!("event loop finished");
    }

    /// Apply one command. Returns true if the loop should shut down.
    fn process_command(&mut self, command: SchedulerCommand) -> bool {
        match command {
            SchedulerCommand::Enqueue(item) => self.enqueue(item),
            SchedulerCommand::Interrupt(item) => self.interrupt(item),
            SchedulerCommand::Clear => {
                debug!(dropped = self.queue.len(), "queue cleared");
                self.queue.clear();
                self.current_at_head = false;
            }
            SchedulerCommand::StopCurrent => self.stop_current(),
            SchedulerCommand::StopCurrentAndAdvance => self.stop_current_and_advance(),
            SchedulerCommand::ClipFinished(report) => self.clip_finished(report),
            SchedulerCommand::InterruptionBegan => self.interruption_began(),
            SchedulerCommand::InterruptionEnded { should_resume } => {
                self.interruption_ended(should_resume)
            }
            SchedulerCommand::SetVolume(volume) => self.set_volume(volume),
            SchedulerCommand::AdjustVolume(delta) => self.set_volume(self.sink.volume() + delta),
            SchedulerCommand::Status(reply) => {
                let _ = reply.send(self.status());
            }
            SchedulerCommand::Shutdown => {
                self.stop_current();
                if let Err(e) = self.sink.deactivate() {
                    warn!(error = %e, "failed to deactivate sink on shutdown");
                }
                return true;
            }
        }
        false
    }

    fn enqueue(&mut self, item: QueueItem) {
        debug!(identifier = item.identifier(), priority = ?item.priority(), "enqueue");
        let pinned = match self.state {
            PlaybackState::Playing(_) if self.current_at_head => 1,
            _ => 0,
        };
        self.queue.push(item, pinned);
        if self.state == PlaybackState::Idle {
            self.advance();
        }
    }

    fn interrupt(&mut self, item: QueueItem) {
        debug!(identifier = item.identifier(), priority = ?item.priority(), "interrupt");
        self.queue.push_front(item);
        self.stop_current_and_advance();
    }

    /// Stop the sink. Queue and state are left as they are.
    fn stop_current(&mut self) {
        if let Some(session) = self.session.take() {
            self.sink.stop();
            debug!(session, "sink stopped");
        }
    }

    fn stop_current_and_advance(&mut self) {
        self.stop_current();
        self.state = PlaybackState::Idle;
        self.advance();
    }

    fn clip_finished(&mut self, report: ClipFinished) {
        if let Some(session) = report.session {
            if self.session != Some(session) {
                trace!(session, "completion for a session that is no longer live");
                return;
            }
        }
        if self.queue.is_empty() && self.state == PlaybackState::Idle {
            trace!("completion with nothing queued or playing");
            return;
        }
        if !report.success {
            warn!(state = ?self.state, "clip did not finish cleanly");
        }
        if self.current_at_head {
            if let Some(done) = self.queue.pop_head() {
                debug!(identifier = done.identifier(), "clip finished");
            }
        }
        self.current_at_head = false;
        self.advance();
    }

    fn interruption_began(&mut self) {
        info!("audio interrupted");
        self.stop_current();
        if self.config.reset_state_on_interruption {
            self.state = PlaybackState::Idle;
        }
    }

    fn interruption_ended(&mut self, should_resume: bool) {
        info!(should_resume, "audio interruption ended");
        if !should_resume {
            return;
        }
        if self.queue.is_empty() && self.state == PlaybackState::Idle {
            return;
        }
        self.advance();
    }

    /// Start the queue head, skipping clips the sink cannot play. Goes idle and releases
    /// the sink once the queue is empty.
    fn advance(&mut self) {
        loop {
            self.stop_current();
            let head = match self.queue.head().cloned() {
                Some(head) => head,
                None => {
                    self.state = PlaybackState::Idle;
                    self.current_at_head = false;
                    if let Err(e) = self.sink.deactivate() {
                        warn!(error = %e, "failed to deactivate sink");
                    }
                    debug!("queue drained, idle");
                    return;
                }
            };
            match self.start(&head) {
                Ok(session) => {
                    debug!(identifier = head.identifier(), session, "playing");
                    self.state = PlaybackState::Playing(head);
                    self.current_at_head = true;
                    return;
                }
                Err(e) => {
                    warn!(identifier = head.identifier(), error = %e, "skipping clip");
                    self.queue.pop_head();
                }
            }
        }
    }

    fn start(&mut self, item: &QueueItem) -> Result<u64> {
        let clip = self.sink.load(item.identifier())?;
        let duration = self.sink.duration(&clip);
        let native = self.sink.reports_completion();
        if !native && duration.is_none() {
            return Err(SchedulerError::SinkActivation(format!(
                "{}: duration unknown and sink does not report completion",
                item.identifier()
            )));
        }
        self.sink.activate()?;

        let session = self.next_session;
        self.next_session += 1;
        self.sink
            .play(clip, ClipEvents::new(session, self.command_sender.clone()))?;
        self.session = Some(session);

        if !native || self.config.always_use_fallback_timer {
            if let Some(duration) = duration {
                timer::deliver_after(
                    duration.saturating_add(self.config.completion_margin()),
                    self.command_sender.clone(),
                    SchedulerCommand::ClipFinished(ClipFinished {
                        session: Some(session),
                        success: true,
                    }),
                );
            }
        }
        Ok(session)
    }

    fn set_volume(&mut self, volume: f32) {
        self.sink.set_volume(volume.max(0.0));
        self.level.set(self.sink.volume());
        debug!(volume = self.sink.volume(), "volume set");
    }

    fn status(&self) -> SchedulerStatus {
        SchedulerStatus {
            state: self.state.clone(),
            queue: self.queue.to_vec(),
            volume: self.sink.volume(),
        }
    }
}
