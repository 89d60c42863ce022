//! Host boundary: element mutation, timed motions and track lookup.
//!
//! A `Stage` is whatever renders the slides (a DOM binding, a GPU scene, the
//! in-memory [`crate::headless::MemoryStage`]). The engine never touches
//! elements directly; it issues [`Effect`]s and [`Motion`]s and is told when
//! motions finish through [`crate::Slideshow::complete`].

use std::f32::consts::PI;
use std::fmt;
use std::time::Duration;

use crate::selector::{ClassName, DataAttribute, TrackQuery};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(pub usize);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "track#{}", self.0)
    }
}

/// A slide (or navigator indicator) addressed by its ordinal tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlideRef {
    pub track: TrackId,
    pub ordinal: usize,
}

impl SlideRef {
    pub const fn new(track: TrackId, ordinal: usize) -> Self {
        Self { track, ordinal }
    }
}

/// Result of binding a [`TrackQuery`]: the handle and its element count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackBinding {
    pub id: TrackId,
    pub len: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Slide(SlideRef),
    Track(TrackId),
}

/// Visual properties a transition may set or animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    /// 0.0 is hidden, 1.0 fully shown.
    Opacity,
    /// Stacking order.
    Layer,
    /// Horizontal position as a percentage of the track width.
    LeftPercent,
    /// Track scroll offset in pixels.
    MarginLeftPx,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    First,
    Last,
}

/// An immediate mutation applied through [`Stage::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Mark {
        slide: SlideRef,
        class: ClassName,
        on: bool,
    },
    Set {
        target: Target,
        property: Property,
        value: f32,
    },
    Relocate {
        slide: SlideRef,
        placement: Placement,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    #[default]
    Swing,
    EaseInOutExpo,
}

impl Easing {
    /// Maps linear progress `t` in `[0, 1]` onto eased progress.
    pub fn sample(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::Swing => 0.5 - (t * PI).cos() / 2.0,
            Easing::EaseInOutExpo => {
                if t == 0.0 || t == 1.0 {
                    t
                } else if t < 0.5 {
                    2f32.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2f32.powf(-20.0 * t + 10.0)) / 2.0
                }
            }
        }
    }
}

/// A time-bounded property transition scheduled on the host.
#[derive(Debug, Clone, PartialEq)]
pub struct Motion {
    pub target: Target,
    pub property: Property,
    pub to: f32,
    pub duration: Duration,
    pub easing: Easing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationId(pub u64);

impl fmt::Display for AnimationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "anim#{}", self.0)
    }
}

pub trait Stage {
    /// Resolves a track; `None` when the container is absent.
    fn bind(&mut self, query: &TrackQuery) -> Option<TrackBinding>;

    /// Tags every element of `track` in document order with `0..len` under
    /// `attr`, clears `class` everywhere and sets it on the first element.
    fn assign_ordinals(&mut self, track: TrackId, attr: &DataAttribute, class: &ClassName);

    /// Ordinal of the first element in document order carrying `class`.
    fn current(&self, track: TrackId, class: &ClassName) -> Option<usize>;

    /// Rendered width of a slide in pixels.
    fn extent(&self, slide: SlideRef) -> f32;

    fn apply(&mut self, effect: Effect);

    /// Starts `motion`; the host reports the returned id once it has run.
    fn animate(&mut self, motion: Motion) -> AnimationId;

    /// Writes an integer data attribute on the slideshow container.
    fn set_data(&mut self, attr: &DataAttribute, value: i64);

    /// Called right before the completion effects of `id` run. Hosts that do
    /// not drive motions frame by frame use it to land the final value.
    fn settle(&mut self, _id: AnimationId) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easings_hit_endpoints() {
        for easing in [Easing::Linear, Easing::Swing, Easing::EaseInOutExpo] {
            assert!(easing.sample(0.0).abs() < 1e-4, "{easing:?} at 0");
            assert!((easing.sample(1.0) - 1.0).abs() < 1e-4, "{easing:?} at 1");
            assert!((easing.sample(0.5) - 0.5).abs() < 1e-3, "{easing:?} at 0.5");
        }
    }

    #[test]
    fn expo_is_slow_at_the_edges() {
        assert!(Easing::EaseInOutExpo.sample(0.1) < Easing::Linear.sample(0.1));
        assert!(Easing::EaseInOutExpo.sample(0.9) > Easing::Linear.sample(0.9));
    }
}
