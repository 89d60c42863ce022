//! Resolves the outgoing and incoming slides of one track and hands them to
//! the track's strategy.

use std::time::Duration;

use tracing::debug;

use crate::selector::{ClassName, DataAttribute, TrackQuery};
use crate::stage::{Effect, SlideRef, Stage, TrackBinding};
use crate::transition::{Direction, Handoff, InFlight, ResolvedStyle, Transition};

/// A bound track and the style it animates with.
#[derive(Debug, Clone)]
pub struct TrackSlot {
    pub query: TrackQuery,
    pub binding: TrackBinding,
    pub style: ResolvedStyle,
}

impl TrackSlot {
    pub fn is_empty(&self) -> bool {
        self.binding.len == 0
    }
}

/// Settings shared by every run on one slideshow.
#[derive(Debug, Clone, Copy)]
pub struct RunSettings<'a> {
    pub class: &'a ClassName,
    pub counter_attr: &'a DataAttribute,
    pub speed: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The strategy ran; `animations` motions are now in flight.
    Started { animations: usize },
    /// Target is already the current slide.
    SameSlide,
    /// The track has no slide with the target ordinal.
    MissingSlide,
    /// Nothing was flagged current, so the target was flagged directly.
    Adopted,
}

pub fn run(
    stage: &mut dyn Stage,
    in_flight: &mut InFlight,
    settings: RunSettings<'_>,
    slot: &TrackSlot,
    target: usize,
    direction: Direction,
) -> RunOutcome {
    let track = slot.binding.id;
    if target >= slot.binding.len {
        debug!(
            %track,
            target,
            len = slot.binding.len,
            selector = %slot.query.item_at(settings.counter_attr, target),
            "no slide for target"
        );
        return RunOutcome::MissingSlide;
    }
    let incoming = SlideRef::new(track, target);

    let Some(current) = stage.current(track, settings.class) else {
        debug!(%track, target, "no current slide; adopting target");
        stage.apply(Effect::Mark {
            slide: incoming,
            class: settings.class.clone(),
            on: true,
        });
        return RunOutcome::Adopted;
    };
    if current == target {
        return RunOutcome::SameSlide;
    }
    let outgoing = SlideRef::new(track, current);

    debug!(
        %track,
        style = slot.style.label(),
        %direction,
        outgoing = %slot.query.current_item(settings.class),
        incoming = %slot.query.item_at(settings.counter_attr, target),
        from = current,
        to = target,
        "running transition"
    );

    let before = in_flight.len();
    let f = slot.style.pick(direction);
    let mut transition = Transition::new(stage, in_flight, settings.class, settings.speed);
    f(
        &mut transition,
        Handoff {
            incoming,
            outgoing,
            track,
        },
    );
    RunOutcome::Started {
        animations: in_flight.len().saturating_sub(before),
    }
}
