//! One slideshow bound to a container: navigation, auto-advance and the
//! animation-in-progress guard.

use std::fmt;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::Result;
use crate::events::Interaction;
use crate::runner::{self, RunOutcome, RunSettings, TrackSlot};
use crate::scheduler::{AutoAdvance, TimerId, Timers};
use crate::selector::{ClassName, DataAttribute, Selector, TrackQuery};
use crate::stage::{AnimationId, Effect, SlideRef, Stage, TrackBinding};
use crate::state::SlideIndex;
use crate::transition::{Direction, InFlight, Registry, StyleRef, builtin};

/// Everything [`Slideshow::initialize`] needs, in typed form.
#[derive(Debug, Clone)]
pub struct SlideshowOptions {
    pub slides: TrackQuery,
    pub secondary_slides: TrackQuery,
    pub navigator: TrackQuery,
    pub duration: Duration,
    pub speed: Duration,
    pub style: StyleRef,
    pub secondary_style: StyleRef,
    pub current_class: ClassName,
    pub counter_attr: DataAttribute,
    pub count_attr: DataAttribute,
    pub resume_after_interaction: bool,
    pub guard_auto_advance: bool,
}

impl Default for SlideshowOptions {
    fn default() -> Self {
        let slide = Selector::new(".slide");
        Self {
            slides: TrackQuery::new(Selector::new(".slides"), slide.clone()),
            secondary_slides: TrackQuery::new(Selector::new(".secondary-slides"), slide),
            navigator: TrackQuery::new(Selector::new(".slide-counter"), Selector::new("a")),
            duration: Duration::from_millis(6000),
            speed: Duration::from_millis(400),
            style: StyleRef::named(builtin::FADE),
            secondary_style: StyleRef::named(builtin::FADE),
            current_class: ClassName::new("active"),
            counter_attr: DataAttribute::new("counter"),
            count_attr: DataAttribute::new("count"),
            resume_after_interaction: false,
            guard_auto_advance: true,
        }
    }
}

impl SlideshowOptions {
    pub fn with_style(mut self, style: StyleRef) -> Self {
        self.style = style;
        self
    }

    pub fn with_secondary_style(mut self, style: StyleRef) -> Self {
        self.secondary_style = style;
        self
    }
}

/// Result of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// The slideshow has no slides.
    Empty,
    /// Dropped because an animation was still running.
    Suppressed,
    Moved { from: usize, to: usize },
    /// The target was already current.
    Stayed { counter: usize },
}

pub struct Slideshow<S, T> {
    stage: S,
    timers: T,
    index: SlideIndex,
    primary: Option<TrackSlot>,
    secondary: Option<TrackSlot>,
    navigator: Option<TrackBinding>,
    in_flight: InFlight,
    auto: AutoAdvance,
    class: ClassName,
    counter_attr: DataAttribute,
    speed: Duration,
    resume_after_interaction: bool,
    guard_auto_advance: bool,
}

impl<S, T> fmt::Debug for Slideshow<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slideshow")
            .field("index", &self.index)
            .field("in_flight", &self.in_flight.len())
            .field("timer", &self.auto.handle())
            .finish_non_exhaustive()
    }
}

impl<S: Stage, T: Timers> Slideshow<S, T> {
    /// Binds the tracks, tags every slide with its ordinal and resolves both
    /// styles. An unresolvable style fails here rather than mid-show.
    pub fn initialize(
        mut stage: S,
        timers: T,
        options: &SlideshowOptions,
        registry: &Registry,
    ) -> Result<Self> {
        let primary_style = registry.resolve_both(&options.style)?;
        let secondary_style = registry.resolve_both(&options.secondary_style)?;

        let primary = stage.bind(&options.slides).map(|binding| TrackSlot {
            query: options.slides.clone(),
            binding,
            style: primary_style,
        });
        let secondary = stage.bind(&options.secondary_slides).map(|binding| TrackSlot {
            query: options.secondary_slides.clone(),
            binding,
            style: secondary_style,
        });
        let navigator = stage.bind(&options.navigator);

        let count = primary.as_ref().map_or(0, |slot| slot.binding.len);
        stage.set_data(&options.count_attr, count as i64);
        stage.set_data(&options.counter_attr, 0);

        let tracks = [
            primary.as_ref().map(|slot| slot.binding),
            secondary.as_ref().map(|slot| slot.binding),
            navigator,
        ];
        for binding in tracks.into_iter().flatten() {
            stage.assign_ordinals(binding.id, &options.counter_attr, &options.current_class);
        }

        info!(
            count,
            style = %options.style,
            secondary = secondary.as_ref().map_or(0, |slot| slot.binding.len),
            indicators = navigator.map_or(0, |nav| nav.len),
            "slideshow initialized"
        );

        Ok(Self {
            stage,
            timers,
            index: SlideIndex::new(count),
            primary,
            secondary,
            navigator,
            in_flight: InFlight::default(),
            auto: AutoAdvance::new(options.duration),
            class: options.current_class.clone(),
            counter_attr: options.counter_attr.clone(),
            speed: options.speed,
            resume_after_interaction: options.resume_after_interaction,
            guard_auto_advance: options.guard_auto_advance,
        })
    }

    pub fn counter(&self) -> usize {
        self.index.counter()
    }

    pub fn count(&self) -> usize {
        self.index.count()
    }

    pub fn is_animating(&self) -> bool {
        !self.in_flight.is_empty()
    }

    pub fn is_running(&self) -> bool {
        self.auto.is_running()
    }

    pub fn timer(&self) -> Option<TimerId> {
        self.auto.handle()
    }

    pub fn stage(&self) -> &S {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut S {
        &mut self.stage
    }

    pub fn timers(&self) -> &T {
        &self.timers
    }

    pub fn timers_mut(&mut self) -> &mut T {
        &mut self.timers
    }

    /// Moves to `target`, wrapping it into range first.
    ///
    /// Not guarded against running animations. Callers outside
    /// [`Self::interact`] and [`Self::on_timer`] must check
    /// [`Self::is_animating`] first: a second move started before the first
    /// one lands resolves its outgoing slide from the still-flagged old
    /// slide, and the counter can end up out of step with the screen.
    pub fn go_to(&mut self, target: i64, direction: Direction) -> Navigation {
        let Some(to) = self.index.normalize(target) else {
            debug!(target, "navigation ignored; no slides");
            return Navigation::Empty;
        };
        let from = self.index.counter();
        let settings = RunSettings {
            class: &self.class,
            counter_attr: &self.counter_attr,
            speed: self.speed,
        };

        if let Some(slot) = &self.primary {
            let outcome = runner::run(
                &mut self.stage,
                &mut self.in_flight,
                settings,
                slot,
                to,
                direction,
            );
            if outcome == RunOutcome::SameSlide {
                debug!(counter = to, "primary already on target");
            }
        }
        if let Some(slot) = self.secondary.as_ref().filter(|slot| !slot.is_empty()) {
            runner::run(
                &mut self.stage,
                &mut self.in_flight,
                settings,
                slot,
                to,
                direction,
            );
        }
        if let Some(nav) = self.navigator.filter(|nav| nav.len > 0) {
            for ordinal in 0..nav.len {
                self.stage.apply(Effect::Mark {
                    slide: SlideRef::new(nav.id, ordinal),
                    class: self.class.clone(),
                    on: false,
                });
            }
            if to < nav.len {
                self.stage.apply(Effect::Mark {
                    slide: SlideRef::new(nav.id, to),
                    class: self.class.clone(),
                    on: true,
                });
            }
        }

        self.index.set(to);
        self.stage.set_data(&self.counter_attr, to as i64);
        debug!(from, to, %direction, "navigated");

        if from == to {
            Navigation::Stayed { counter: to }
        } else {
            Navigation::Moved { from, to }
        }
    }

    /// One slide in `direction`; same caveat as [`Self::go_to`].
    pub fn step(&mut self, direction: Direction) -> Navigation {
        let target = self.index.step_target(direction.delta());
        self.go_to(target, direction)
    }

    pub fn start(&mut self) -> bool {
        self.auto.start(&mut self.timers)
    }

    pub fn stop(&mut self) -> bool {
        self.auto.stop(&mut self.timers)
    }

    /// Handles a firing of the auto-advance timer. `None` for a stale id.
    pub fn on_timer(&mut self, id: TimerId) -> Option<Navigation> {
        if !self.auto.owns(id) {
            debug!(timer = id.0, "stale timer firing ignored");
            return None;
        }
        if self.guard_auto_advance && self.is_animating() {
            debug!(in_flight = self.in_flight.len(), "auto-advance skipped; animation in progress");
            return Some(Navigation::Suppressed);
        }
        Some(self.step(Direction::Forward))
    }

    /// A user action: always stops auto-advance, then navigates unless an
    /// animation is still running.
    pub fn interact(&mut self, interaction: Interaction) -> Navigation {
        self.stop();
        let nav = if self.is_animating() {
            debug!(?interaction, "interaction suppressed; animation in progress");
            Navigation::Suppressed
        } else {
            match interaction {
                Interaction::Next | Interaction::SwipeLeft => self.step(Direction::Forward),
                Interaction::Prev | Interaction::SwipeRight => self.step(Direction::Backward),
                Interaction::Jump(target) => self.go_to(target, Direction::Forward),
            }
        };
        if self.resume_after_interaction {
            self.start();
        }
        nav
    }

    /// Host callback for a finished motion; runs its completion effects.
    pub fn complete(&mut self, id: AnimationId) -> bool {
        self.stage.settle(id);
        let Some(effects) = self.in_flight.take(id) else {
            debug!(%id, "completion for unknown animation");
            return false;
        };
        for effect in effects {
            self.stage.apply(effect);
        }
        true
    }

    /// Stops the timer, drops pending completions and hands back the host
    /// resources.
    pub fn destroy(mut self) -> (S, T) {
        self.auto.stop(&mut self.timers);
        let dropped = self.in_flight.len();
        self.in_flight.clear();
        info!(counter = self.index.counter(), dropped, "slideshow destroyed");
        (self.stage, self.timers)
    }
}
