use std::time::Duration;

use slideshow::events::Interaction;
use slideshow::headless::MemoryStage;
use slideshow::scheduler::{ManualTimers, TimerId};
use slideshow::stage::TrackId;
use slideshow::transition::builtin;
use slideshow::{Navigation, Registry, Slideshow, SlideshowOptions, StyleRef};

type Show = Slideshow<MemoryStage, ManualTimers>;

fn build(options: &SlideshowOptions, slides: usize) -> Show {
    let mut stage = MemoryStage::new();
    stage.add_track(options.slides.clone(), slides);
    Slideshow::initialize(stage, ManualTimers::new(), options, &Registry::default())
        .expect("valid slideshow")
}

fn settle_all(show: &mut Show) {
    for id in show.stage_mut().finish_all() {
        show.complete(id);
    }
}

#[test]
fn start_schedules_one_timer_at_the_configured_interval() {
    let mut options = SlideshowOptions::default();
    options.duration = Duration::from_millis(2500);
    let mut show = build(&options, 3);

    assert!(show.start());
    assert!(!show.start(), "second start is ignored");
    assert_eq!(show.timers().active_count(), 1);
    let (id, every) = show.timers().active().next().expect("timer");
    assert_eq!(every, Duration::from_millis(2500));
    assert_eq!(show.timer(), Some(id));
}

#[test]
fn interaction_stops_auto_advance() {
    let options = SlideshowOptions::default();
    let mut show = build(&options, 3);
    show.start();
    let timer = show.timer().expect("timer");

    assert_eq!(show.interact(Interaction::Next), Navigation::Moved { from: 0, to: 1 });
    assert!(!show.is_running());
    assert!(!show.timers().is_active(timer));
    assert_eq!(show.timers().cancelled(), &[timer]);

    // A firing that raced the cancel is ignored.
    assert_eq!(show.on_timer(timer), None);
    assert_eq!(show.counter(), 1);
}

#[test]
fn interaction_is_suppressed_while_animating() {
    let options = SlideshowOptions::default();
    let mut show = build(&options, 4);
    show.step(slideshow::Direction::Forward);
    assert!(show.is_animating());

    assert_eq!(show.interact(Interaction::Next), Navigation::Suppressed);
    assert_eq!(show.interact(Interaction::SwipeRight), Navigation::Suppressed);
    assert_eq!(show.interact(Interaction::Jump(3)), Navigation::Suppressed);
    assert_eq!(show.counter(), 1);

    settle_all(&mut show);
    assert_eq!(show.interact(Interaction::Prev), Navigation::Moved { from: 1, to: 0 });
}

#[test]
fn swipes_map_to_directions() {
    let options = SlideshowOptions::default().with_style(StyleRef::named(builtin::NONE));
    let mut show = build(&options, 3);
    assert_eq!(show.interact(Interaction::SwipeLeft), Navigation::Moved { from: 0, to: 1 });
    assert_eq!(show.interact(Interaction::SwipeRight), Navigation::Moved { from: 1, to: 0 });
    assert_eq!(show.interact(Interaction::SwipeRight), Navigation::Moved { from: 0, to: 2 });
}

#[test]
fn jump_targets_a_counter_and_runs_forward() {
    let options = SlideshowOptions::default().with_style(StyleRef::named(builtin::PUSH));
    let mut show = build(&options, 4);
    assert_eq!(show.interact(Interaction::Jump(2)), Navigation::Moved { from: 0, to: 2 });
    settle_all(&mut show);
    // Forward push recycles the outgoing slide to the end.
    assert_eq!(
        show.stage().order(TrackId(0)),
        vec![Some(1), Some(2), Some(3), Some(0)]
    );
    assert_eq!(show.interact(Interaction::Jump(2)), Navigation::Stayed { counter: 2 });
}

#[test]
fn resume_flag_restarts_auto_advance_after_interaction() {
    let mut options = SlideshowOptions::default().with_style(StyleRef::named(builtin::NONE));
    options.resume_after_interaction = true;
    let mut show = build(&options, 3);
    show.start();
    let first = show.timer().expect("timer");

    show.interact(Interaction::Next);
    let second = show.timer().expect("restarted");
    assert_ne!(first, second);
    assert_eq!(show.timers().active_count(), 1);
    assert_eq!(show.on_timer(first), None);
    assert_eq!(show.on_timer(second), Some(Navigation::Moved { from: 1, to: 2 }));
}

#[test]
fn guarded_timer_skips_while_animating() {
    let options = SlideshowOptions::default();
    let mut show = build(&options, 3);
    show.start();
    let timer = show.timer().expect("timer");

    assert_eq!(show.on_timer(timer), Some(Navigation::Moved { from: 0, to: 1 }));
    assert_eq!(show.on_timer(timer), Some(Navigation::Suppressed));
    assert!(show.is_running(), "a skipped tick keeps the timer");

    settle_all(&mut show);
    assert_eq!(show.on_timer(timer), Some(Navigation::Moved { from: 1, to: 2 }));
}

#[test]
fn unguarded_timer_steps_through_animations() {
    let mut options = SlideshowOptions::default();
    options.guard_auto_advance = false;
    let mut show = build(&options, 3);
    show.start();
    let timer = show.timer().expect("timer");

    show.on_timer(timer);
    assert!(show.is_animating());
    assert_eq!(show.on_timer(timer), Some(Navigation::Moved { from: 1, to: 2 }));
}

#[test]
fn stop_is_idempotent_and_start_after_stop_works() {
    let options = SlideshowOptions::default();
    let mut show = build(&options, 3);
    assert!(!show.stop());
    show.start();
    assert!(show.stop());
    assert!(!show.stop());
    assert!(show.start());
    assert_eq!(show.timers().active_count(), 1);
}

#[test]
fn stale_timer_on_empty_show_is_ignored() {
    let options = SlideshowOptions::default();
    let mut show = build(&options, 0);
    assert_eq!(show.on_timer(TimerId(99)), None);
    show.start();
    let timer = show.timer().expect("timer");
    assert_eq!(show.on_timer(timer), Some(Navigation::Empty));
}

#[test]
fn destroy_cancels_timer_and_drops_pending_completions() {
    let options = SlideshowOptions::default();
    let mut show = build(&options, 3);
    show.start();
    let timer = show.timer().expect("timer");
    show.step(slideshow::Direction::Forward);
    assert!(show.is_animating());

    let (stage, timers) = show.destroy();
    assert!(!timers.is_active(timer));
    assert_eq!(timers.cancelled(), &[timer]);
    assert_eq!(stage.running(), 1, "host still owns the motion");
}
