//! Transition strategies, the registry that names them, and the context a
//! strategy runs against.

pub mod builtin;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::selector::ClassName;
use crate::stage::{AnimationId, Easing, Effect, Motion, Property, SlideRef, Stage, Target, TrackId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub const fn from_forward(is_forward: bool) -> Self {
        if is_forward {
            Self::Forward
        } else {
            Self::Backward
        }
    }

    pub const fn is_forward(self) -> bool {
        matches!(self, Self::Forward)
    }

    /// Signed counter step for this direction.
    pub const fn delta(self) -> i64 {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three arguments every transition receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handoff {
    pub incoming: SlideRef,
    pub outgoing: SlideRef,
    pub track: TrackId,
}

pub type TransitionFn = Arc<dyn Fn(&mut Transition<'_>, Handoff) + Send + Sync>;

/// Wraps a closure or fn item as a shareable [`TransitionFn`].
pub fn transition_fn<F>(f: F) -> TransitionFn
where
    F: Fn(&mut Transition<'_>, Handoff) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A transition behavior: one function for both directions, or a pair.
#[derive(Clone)]
pub enum Strategy {
    Uniform(TransitionFn),
    Directional {
        forward: TransitionFn,
        backward: TransitionFn,
    },
}

impl Strategy {
    pub fn uniform<F>(f: F) -> Self
    where
        F: Fn(&mut Transition<'_>, Handoff) + Send + Sync + 'static,
    {
        Self::Uniform(transition_fn(f))
    }

    pub fn directional<F, B>(forward: F, backward: B) -> Self
    where
        F: Fn(&mut Transition<'_>, Handoff) + Send + Sync + 'static,
        B: Fn(&mut Transition<'_>, Handoff) + Send + Sync + 'static,
    {
        Self::Directional {
            forward: transition_fn(forward),
            backward: transition_fn(backward),
        }
    }

    /// Builds a directional pair from loosely supplied members, failing when
    /// either direction is absent.
    pub fn from_parts(
        name: &str,
        forward: Option<TransitionFn>,
        backward: Option<TransitionFn>,
    ) -> Result<Self> {
        let forward = forward.ok_or_else(|| Error::MissingDirection {
            style: name.to_owned(),
            direction: Direction::Forward,
        })?;
        let backward = backward.ok_or_else(|| Error::MissingDirection {
            style: name.to_owned(),
            direction: Direction::Backward,
        })?;
        Ok(Self::Directional { forward, backward })
    }

    pub fn select(&self, direction: Direction) -> TransitionFn {
        match (self, direction) {
            (Self::Uniform(f), _) => Arc::clone(f),
            (Self::Directional { forward, .. }, Direction::Forward) => Arc::clone(forward),
            (Self::Directional { backward, .. }, Direction::Backward) => Arc::clone(backward),
        }
    }
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uniform(_) => f.write_str("Strategy::Uniform(..)"),
            Self::Directional { .. } => f.write_str("Strategy::Directional { .. }"),
        }
    }
}

/// How a track's transition is chosen: by registry name or supplied inline.
#[derive(Debug, Clone)]
pub enum StyleRef {
    Named(String),
    Custom(Strategy),
}

impl StyleRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    fn label(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::Custom(_) => "custom",
        }
    }
}

impl fmt::Display for StyleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Named strategies. `Registry::default()` holds the built-ins.
#[derive(Debug, Clone)]
pub struct Registry {
    entries: HashMap<String, Strategy>,
}

impl Default for Registry {
    fn default() -> Self {
        let mut registry = Self::empty();
        builtin::register_all(&mut registry);
        registry
    }
}

impl Registry {
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Adds or replaces the strategy under `name`.
    pub fn register(&mut self, name: impl Into<String>, strategy: Strategy) -> Option<Strategy> {
        self.entries.insert(name.into(), strategy)
    }

    pub fn get(&self, name: &str) -> Option<&Strategy> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn resolve(&self, style: &StyleRef, direction: Direction) -> Result<TransitionFn> {
        let strategy = match style {
            StyleRef::Named(name) => self
                .get(name)
                .ok_or_else(|| Error::UnknownStyle(name.clone()))?,
            StyleRef::Custom(strategy) => strategy,
        };
        Ok(strategy.select(direction))
    }

    /// Resolves both directions up front so a bad style fails at setup.
    pub fn resolve_both(&self, style: &StyleRef) -> Result<ResolvedStyle> {
        Ok(ResolvedStyle {
            label: style.label().to_owned(),
            forward: self.resolve(style, Direction::Forward)?,
            backward: self.resolve(style, Direction::Backward)?,
        })
    }
}

#[derive(Clone)]
pub struct ResolvedStyle {
    label: String,
    forward: TransitionFn,
    backward: TransitionFn,
}

impl ResolvedStyle {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn pick(&self, direction: Direction) -> &TransitionFn {
        match direction {
            Direction::Forward => &self.forward,
            Direction::Backward => &self.backward,
        }
    }
}

impl fmt::Debug for ResolvedStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedStyle")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Motions still running, with the effects to apply when each one lands.
#[derive(Debug, Default)]
pub struct InFlight {
    pending: BTreeMap<AnimationId, Vec<Effect>>,
}

impl InFlight {
    pub fn register(&mut self, id: AnimationId, then: Vec<Effect>) {
        self.pending.insert(id, then);
    }

    pub fn take(&mut self, id: AnimationId) -> Option<Vec<Effect>> {
        self.pending.remove(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

/// What a strategy gets to work with while it runs.
///
/// Every change to the current flag goes through here; the runner itself
/// never sets or clears it.
pub struct Transition<'a> {
    stage: &'a mut dyn Stage,
    in_flight: &'a mut InFlight,
    class: &'a ClassName,
    speed: Duration,
}

impl<'a> Transition<'a> {
    pub fn new(
        stage: &'a mut dyn Stage,
        in_flight: &'a mut InFlight,
        class: &'a ClassName,
        speed: Duration,
    ) -> Self {
        Self {
            stage,
            in_flight,
            class,
            speed,
        }
    }

    pub fn speed(&self) -> Duration {
        self.speed
    }

    pub fn class(&self) -> &ClassName {
        self.class
    }

    pub fn stage(&self) -> &dyn Stage {
        &*self.stage
    }

    pub fn apply(&mut self, effect: Effect) {
        self.stage.apply(effect);
    }

    pub fn set(&mut self, target: Target, property: Property, value: f32) {
        self.stage.apply(Effect::Set {
            target,
            property,
            value,
        });
    }

    pub fn mark_current(&mut self, slide: SlideRef) {
        let effect = self.marked(slide, true);
        self.stage.apply(effect);
    }

    pub fn clear_current(&mut self, slide: SlideRef) {
        let effect = self.marked(slide, false);
        self.stage.apply(effect);
    }

    /// The current-flag effect for `slide`, for use in completion lists.
    pub fn marked(&self, slide: SlideRef, on: bool) -> Effect {
        Effect::Mark {
            slide,
            class: self.class.clone(),
            on,
        }
    }

    /// Animates `property` of `target` to `to` over the configured speed and
    /// queues `then` to run when the host reports completion.
    pub fn animate(
        &mut self,
        target: Target,
        property: Property,
        to: f32,
        easing: Easing,
        then: Vec<Effect>,
    ) -> AnimationId {
        let id = self.stage.animate(Motion {
            target,
            property,
            to,
            duration: self.speed,
            easing,
        });
        self.in_flight.register(id, then);
        id
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn tagged(counter: &'static AtomicUsize, tag: usize) -> TransitionFn {
        transition_fn(move |_, _| {
            counter.store(tag, Ordering::SeqCst);
        })
    }

    #[test]
    fn named_pair_selects_by_direction() {
        let forward = tagged(&LAST, 1);
        let backward = tagged(&LAST, 2);
        let mut registry = Registry::empty();
        registry.register(
            "push",
            Strategy::Directional {
                forward: Arc::clone(&forward),
                backward: Arc::clone(&backward),
            },
        );

        let got = registry
            .resolve(&StyleRef::named("push"), Direction::Backward)
            .unwrap();
        assert!(Arc::ptr_eq(&got, &backward));
        let got = registry
            .resolve(&StyleRef::named("push"), Direction::Forward)
            .unwrap();
        assert!(Arc::ptr_eq(&got, &forward));
    }

    static LAST: AtomicUsize = AtomicUsize::new(0);

    #[test]
    fn uniform_ignores_direction() {
        let f = tagged(&LAST, 7);
        let style = StyleRef::Custom(Strategy::Uniform(Arc::clone(&f)));
        let registry = Registry::empty();
        let a = registry.resolve(&style, Direction::Forward).unwrap();
        let b = registry.resolve(&style, Direction::Backward).unwrap();
        assert!(Arc::ptr_eq(&a, &f));
        assert!(Arc::ptr_eq(&b, &f));
    }

    #[test]
    fn unknown_name_is_a_configuration_error() {
        let Err(err) = Registry::default().resolve(&StyleRef::named("spin"), Direction::Forward)
        else {
            panic!("expected UnknownStyle");
        };
        assert!(matches!(err, Error::UnknownStyle(ref name) if name == "spin"));
    }

    #[test]
    fn pair_missing_a_member_is_rejected() {
        let err = Strategy::from_parts("half", Some(tagged(&LAST, 1)), None).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingDirection { direction: Direction::Backward, .. }
        ));
    }

    #[test]
    fn builtins_are_registered() {
        let registry = Registry::default();
        for name in ["none", "fade", "fadeInOut", "push", "pull"] {
            assert!(registry.contains(name), "missing {name}");
        }
    }

    #[test]
    fn direction_from_flag() {
        assert_eq!(Direction::from_forward(true), Direction::Forward);
        assert_eq!(Direction::Backward.delta(), -1);
        assert_eq!(Direction::Forward.to_string(), "forward");
    }
}
