use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use tracing::trace;

use crate::command::SchedulerCommand;

/// Post `command` to the event loop after `delay`. There is no way to cancel it; the loop
/// must tolerate the command arriving after the state it was meant for has moved on.
pub(crate) fn deliver_after(
    delay: Duration,
    command_sender: Sender<SchedulerCommand>,
    command: SchedulerCommand,
) {
    thread::spawn(move || {
        thread::sleep(delay);
        if command_sender.send(command).is_err() {
            trace!("delayed command dropped, scheduler is gone");
        }
    });
}
