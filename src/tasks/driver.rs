use std::future;
use std::time::Duration;

use anyhow::Result;
use tokio::select;
use tokio::sync::mpsc::{Receiver, Sender, UnboundedReceiver};
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::events::{AnimationDone, Command, SlideChanged};
use crate::scheduler::{TimerId, Timers};
use crate::slideshow::{Navigation, Slideshow};
use crate::stage::Stage;

/// Tokio-backed [`Timers`]; holds at most one interval, which is all a
/// single slideshow schedules.
#[derive(Debug, Default)]
pub struct IntervalTimers {
    next_id: u64,
    active: Option<(TimerId, Interval)>,
}

impl IntervalTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves on the next firing; never resolves while disarmed.
    pub async fn tick(&mut self) -> TimerId {
        match &mut self.active {
            Some((id, interval)) => {
                interval.tick().await;
                *id
            }
            None => future::pending().await,
        }
    }
}

impl Timers for IntervalTimers {
    fn schedule_repeating(&mut self, every: Duration) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        // First firing one full period from now, like setInterval.
        let mut interval = interval_at(Instant::now() + every, every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.active = Some((id, interval));
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if self.active.as_ref().is_some_and(|(active, _)| *active == id) {
            self.active = None;
        }
    }
}

/// Runs one slideshow until `cancel` fires, then tears it down and returns
/// the stage.
///
/// Rules:
/// - Timer firings, user commands and animation completions are handled one
///   at a time in arrival order; none of them interleave.
/// - `SlideChanged` is sent for every navigation that moved the counter.
/// - A closed command channel leaves the show running on its timer.
pub async fn run<S: Stage>(
    mut slideshow: Slideshow<S, IntervalTimers>,
    autoplay: bool,
    mut commands: Receiver<Command>,
    mut completions: UnboundedReceiver<AnimationDone>,
    changes: Sender<SlideChanged>,
    cancel: CancellationToken,
) -> Result<S> {
    if autoplay {
        slideshow.start();
    }
    info!(count = slideshow.count(), autoplay, "driver running");

    loop {
        let nav = select! {
            _ = cancel.cancelled() => break,

            id = slideshow.timers_mut().tick() => slideshow.on_timer(id),

            Some(cmd) = commands.recv() => {
                debug!(?cmd, "command");
                match cmd {
                    Command::Interact(interaction) => Some(slideshow.interact(interaction)),
                    Command::Start => {
                        slideshow.start();
                        None
                    }
                    Command::Stop => {
                        slideshow.stop();
                        None
                    }
                }
            }

            Some(AnimationDone(id)) = completions.recv() => {
                slideshow.complete(id);
                None
            }
        };

        if let Some(Navigation::Moved { from, to }) = nav {
            if changes.send(SlideChanged { from, to }).await.is_err() {
                warn!("slide change listener closed");
            }
        }
    }

    let (stage, _) = slideshow.destroy();
    Ok(stage)
}
