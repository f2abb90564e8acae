use std::thread;
use std::time::Duration;

use clip_queue::{ClipPriority, ManualInterruptions, PlaybackScheduler, RodioSink, SchedulerConfig};
use tracing_subscriber::EnvFilter;

fn main() -> clip_queue::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("clip_queue=debug")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => SchedulerConfig::load(path)?,
        None => SchedulerConfig::default(),
    };
    let sink_config = config.sink.clone();
    let interruptions = ManualInterruptions::new();

    // output device has to be opened on the scheduler thread
    let scheduler = PlaybackScheduler::run(
        config,
        move || RodioSink::open(sink_config),
        Some(Box::new(interruptions.clone())),
    )?;
    let handle = scheduler.handle();

    handle.clear();
    for clip in ["1", "2", "3", "4", "6"] {
        handle.enqueue(clip, ClipPriority::Normal);
    }
    thread::sleep(Duration::from_millis(1500));

    // something more important comes up
    handle.interrupt("5", ClipPriority::High);
    thread::sleep(Duration::from_millis(1500));

    // a phone call takes the device and gives it back
    interruptions.begin();
    thread::sleep(Duration::from_millis(500));
    interruptions.end(true);

    handle.adjust_volume(-0.5);
    thread::sleep(Duration::from_secs(5));
    if let Some(status) = handle.status() {
        tracing::info!(playing = ?status.playing(), queued = status.queue.len(), "before teardown");
    }
    scheduler.teardown();
    Ok(())
}
