//! The stock transitions: `none`, `fade`, `fadeInOut`, `push` and `pull`.

use crate::stage::{Easing, Effect, Placement, Property, Target};

use super::{Handoff, Registry, Strategy, Transition};

pub const NONE: &str = "none";
pub const FADE: &str = "fade";
pub const FADE_IN_OUT: &str = "fadeInOut";
pub const PUSH: &str = "push";
pub const PULL: &str = "pull";

pub(super) fn register_all(registry: &mut Registry) {
    registry.register(NONE, Strategy::uniform(none));
    registry.register(FADE, Strategy::uniform(fade));
    registry.register(FADE_IN_OUT, Strategy::uniform(fade_in_out));
    registry.register(PUSH, Strategy::directional(push_forward, push_backward));
    registry.register(PULL, Strategy::directional(pull_forward, pull_backward));
}

/// Swaps the current flag with no motion; styling is left to the host.
pub fn none(t: &mut Transition<'_>, h: Handoff) {
    t.clear_current(h.outgoing);
    t.mark_current(h.incoming);
}

/// The incoming slide fades in above the outgoing one.
pub fn fade(t: &mut Transition<'_>, h: Handoff) {
    let outgoing = Target::Slide(h.outgoing);
    let incoming = Target::Slide(h.incoming);
    t.set(outgoing, Property::Layer, 1.0);
    t.set(incoming, Property::Layer, 2.0);
    t.set(incoming, Property::Opacity, 0.0);
    let then = vec![
        t.marked(h.outgoing, false),
        Effect::Set {
            target: outgoing,
            property: Property::Opacity,
            value: 0.0,
        },
        t.marked(h.incoming, true),
    ];
    t.animate(incoming, Property::Opacity, 1.0, Easing::Swing, then);
}

/// Both slides fade at once; each settles its own flag when its fade ends.
pub fn fade_in_out(t: &mut Transition<'_>, h: Handoff) {
    let outgoing = Target::Slide(h.outgoing);
    let incoming = Target::Slide(h.incoming);
    t.set(outgoing, Property::Layer, 1.0);
    let then = vec![t.marked(h.outgoing, false)];
    t.animate(outgoing, Property::Opacity, 0.0, Easing::Swing, then);

    t.set(incoming, Property::Layer, 2.0);
    t.set(incoming, Property::Opacity, 0.0);
    let then = vec![t.marked(h.incoming, true)];
    t.animate(incoming, Property::Opacity, 1.0, Easing::Swing, then);
}

// Push expects absolutely positioned slides.

pub fn push_forward(t: &mut Transition<'_>, h: Handoff) {
    let outgoing = Target::Slide(h.outgoing);
    let incoming = Target::Slide(h.incoming);
    let then = vec![
        t.marked(h.outgoing, false),
        Effect::Set {
            target: outgoing,
            property: Property::LeftPercent,
            value: 100.0,
        },
        Effect::Relocate {
            slide: h.outgoing,
            placement: Placement::Last,
        },
    ];
    t.animate(outgoing, Property::LeftPercent, -100.0, Easing::EaseInOutExpo, then);

    t.set(incoming, Property::LeftPercent, 100.0);
    let then = vec![t.marked(h.incoming, true)];
    t.animate(incoming, Property::LeftPercent, 0.0, Easing::EaseInOutExpo, then);
}

pub fn push_backward(t: &mut Transition<'_>, h: Handoff) {
    let outgoing = Target::Slide(h.outgoing);
    let incoming = Target::Slide(h.incoming);
    let then = vec![t.marked(h.outgoing, false)];
    t.animate(outgoing, Property::LeftPercent, 100.0, Easing::EaseInOutExpo, then);

    t.set(incoming, Property::LeftPercent, -100.0);
    let then = vec![t.marked(h.incoming, true)];
    t.animate(incoming, Property::LeftPercent, 0.0, Easing::EaseInOutExpo, then);
}

// Pull scrolls the whole track; slides must sit side by side.

pub fn pull_forward(t: &mut Transition<'_>, h: Handoff) {
    let track = Target::Track(h.track);
    let width = t.stage().extent(h.outgoing);
    let then = vec![
        t.marked(h.outgoing, false),
        Effect::Relocate {
            slide: h.outgoing,
            placement: Placement::Last,
        },
        Effect::Set {
            target: track,
            property: Property::MarginLeftPx,
            value: 0.0,
        },
        t.marked(h.incoming, true),
    ];
    t.animate(track, Property::MarginLeftPx, -width, Easing::EaseInOutExpo, then);
}

pub fn pull_backward(t: &mut Transition<'_>, h: Handoff) {
    let track = Target::Track(h.track);
    let width = t.stage().extent(h.incoming);
    t.set(track, Property::MarginLeftPx, -width);
    t.apply(Effect::Relocate {
        slide: h.incoming,
        placement: Placement::First,
    });
    let then = vec![t.marked(h.outgoing, false), t.marked(h.incoming, true)];
    t.animate(track, Property::MarginLeftPx, 0.0, Easing::EaseInOutExpo, then);
}
