//! In-memory [`Stage`] that keeps a tiny element model and steps motions by
//! hand. Backs the dry run, the CLI demo and the tests.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::Write as _;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tracing::trace;

use crate::events::AnimationDone;
use crate::selector::{ClassName, DataAttribute, TrackQuery};
use crate::stage::{
    AnimationId, Effect, Motion, Placement, Property, SlideRef, Stage, Target, TrackBinding,
    TrackId,
};

/// Something the stage was asked to do, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum StageEvent {
    Applied(Effect),
    Started(AnimationId, Motion),
    Settled(AnimationId),
}

impl StageEvent {
    /// The track this event touched; `None` for settle notices.
    pub fn track(&self) -> Option<TrackId> {
        let target = match self {
            StageEvent::Applied(Effect::Mark { slide, .. })
            | StageEvent::Applied(Effect::Relocate { slide, .. }) => Target::Slide(*slide),
            StageEvent::Applied(Effect::Set { target, .. }) => *target,
            StageEvent::Started(_, motion) => motion.target,
            StageEvent::Settled(_) => return None,
        };
        Some(match target {
            Target::Slide(slide) => slide.track,
            Target::Track(track) => track,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct Element {
    ordinal: Option<usize>,
    classes: BTreeSet<String>,
    props: HashMap<Property, f32>,
}

impl Element {
    pub fn ordinal(&self) -> Option<usize> {
        self.ordinal
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn property(&self, property: Property) -> f32 {
        self.props
            .get(&property)
            .copied()
            .unwrap_or_else(|| default_value(property))
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryTrack {
    elements: Vec<Element>,
    props: HashMap<Property, f32>,
}

impl MemoryTrack {
    /// Elements in document order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn property(&self, property: Property) -> f32 {
        self.props
            .get(&property)
            .copied()
            .unwrap_or_else(|| default_value(property))
    }

    fn position(&self, ordinal: usize) -> Option<usize> {
        self.elements
            .iter()
            .position(|el| el.ordinal == Some(ordinal))
    }
}

fn default_value(property: Property) -> f32 {
    match property {
        Property::Opacity => 1.0,
        Property::Layer | Property::LeftPercent | Property::MarginLeftPx => 0.0,
    }
}

#[derive(Debug, Clone)]
struct Running {
    motion: Motion,
    from: f32,
    elapsed: Duration,
}

#[derive(Debug, Default)]
pub struct MemoryStage {
    tracks: Vec<MemoryTrack>,
    queries: HashMap<TrackQuery, TrackId>,
    data: BTreeMap<String, i64>,
    running: BTreeMap<AnimationId, Running>,
    next_animation: u64,
    slide_width: f32,
    events: Vec<StageEvent>,
    notifier: Option<UnboundedSender<AnimationDone>>,
}

impl MemoryStage {
    pub fn new() -> Self {
        Self {
            slide_width: 800.0,
            ..Self::default()
        }
    }

    /// Reports each motion on `tx` after its duration, using tokio timers.
    /// Requires a running tokio runtime when motions start.
    pub fn with_notifier(mut self, tx: UnboundedSender<AnimationDone>) -> Self {
        self.notifier = Some(tx);
        self
    }

    pub fn with_slide_width(mut self, px: f32) -> Self {
        self.slide_width = px;
        self
    }

    /// Adds a track of `len` untagged elements reachable through `query`.
    pub fn add_track(&mut self, query: TrackQuery, len: usize) -> TrackId {
        let id = TrackId(self.tracks.len());
        self.tracks.push(MemoryTrack {
            elements: vec![Element::default(); len],
            props: HashMap::new(),
        });
        self.queries.insert(query, id);
        id
    }

    pub fn track(&self, id: TrackId) -> &MemoryTrack {
        &self.tracks[id.0]
    }

    /// Ordinals of `id` in document order.
    pub fn order(&self, id: TrackId) -> Vec<Option<usize>> {
        self.track(id).elements.iter().map(Element::ordinal).collect()
    }

    pub fn element(&self, slide: SlideRef) -> Option<&Element> {
        let track = self.tracks.get(slide.track.0)?;
        track.position(slide.ordinal).map(|pos| &track.elements[pos])
    }

    pub fn has_class(&self, slide: SlideRef, class: &ClassName) -> bool {
        self.element(slide)
            .is_some_and(|el| el.has_class(class.as_str()))
    }

    /// Ordinals of every element in `id` carrying `class`.
    pub fn flagged(&self, id: TrackId, class: &ClassName) -> Vec<usize> {
        self.track(id)
            .elements
            .iter()
            .filter(|el| el.has_class(class.as_str()))
            .filter_map(Element::ordinal)
            .collect()
    }

    pub fn property(&self, target: Target, property: Property) -> f32 {
        match target {
            Target::Slide(slide) => self
                .element(slide)
                .map_or_else(|| default_value(property), |el| el.property(property)),
            Target::Track(id) => self.track(id).property(property),
        }
    }

    pub fn data(&self, attr: &DataAttribute) -> Option<i64> {
        self.data.get(attr.as_str()).copied()
    }

    pub fn events(&self) -> &[StageEvent] {
        &self.events
    }

    pub fn running(&self) -> usize {
        self.running.len()
    }

    pub fn running_ids(&self) -> Vec<AnimationId> {
        self.running.keys().copied().collect()
    }

    /// Steps every running motion by `dt`; returns those that finished.
    pub fn advance(&mut self, dt: Duration) -> Vec<AnimationId> {
        let mut done = Vec::new();
        let mut frames = Vec::new();
        for (id, run) in self.running.iter_mut() {
            run.elapsed += dt;
            let t = if run.motion.duration.is_zero() {
                1.0
            } else {
                (run.elapsed.as_secs_f32() / run.motion.duration.as_secs_f32()).min(1.0)
            };
            let value = run.from + (run.motion.to - run.from) * run.motion.easing.sample(t);
            frames.push((run.motion.target, run.motion.property, value));
            if t >= 1.0 {
                done.push(*id);
            }
        }
        for (target, property, value) in frames {
            self.write(target, property, value);
        }
        for id in &done {
            if let Some(run) = self.running.remove(id) {
                self.write(run.motion.target, run.motion.property, run.motion.to);
            }
        }
        done
    }

    /// Lands every running motion at once.
    pub fn finish_all(&mut self) -> Vec<AnimationId> {
        let ids = self.running_ids();
        for id in &ids {
            if let Some(run) = self.running.remove(id) {
                self.write(run.motion.target, run.motion.property, run.motion.to);
            }
        }
        ids
    }

    /// One line per track, e.g. `track#0: 1 2 [0]` with the current slide
    /// bracketed and document order preserved.
    pub fn describe(&self, class: &ClassName) -> String {
        let mut out = String::new();
        for (idx, track) in self.tracks.iter().enumerate() {
            let _ = write!(out, "{}:", TrackId(idx));
            for el in &track.elements {
                let label = el
                    .ordinal
                    .map_or_else(|| "?".to_owned(), |ord| ord.to_string());
                if el.has_class(class.as_str()) {
                    let _ = write!(out, " [{label}]");
                } else {
                    let _ = write!(out, " {label}");
                }
            }
            out.push('\n');
        }
        out
    }

    fn write(&mut self, target: Target, property: Property, value: f32) {
        match target {
            Target::Slide(slide) => {
                if let Some(track) = self.tracks.get_mut(slide.track.0) {
                    if let Some(pos) = track.position(slide.ordinal) {
                        track.elements[pos].props.insert(property, value);
                    }
                }
            }
            Target::Track(id) => {
                if let Some(track) = self.tracks.get_mut(id.0) {
                    track.props.insert(property, value);
                }
            }
        }
    }
}

impl Stage for MemoryStage {
    fn bind(&mut self, query: &TrackQuery) -> Option<TrackBinding> {
        let id = *self.queries.get(query)?;
        Some(TrackBinding {
            id,
            len: self.tracks[id.0].elements.len(),
        })
    }

    fn assign_ordinals(&mut self, track: TrackId, attr: &DataAttribute, class: &ClassName) {
        let Some(t) = self.tracks.get_mut(track.0) else {
            return;
        };
        for (ordinal, el) in t.elements.iter_mut().enumerate() {
            el.ordinal = Some(ordinal);
            el.classes.remove(class.as_str());
            el.props
                .insert(Property::Opacity, if ordinal == 0 { 1.0 } else { 0.0 });
        }
        if let Some(first) = t.elements.first_mut() {
            first.classes.insert(class.as_str().to_owned());
        }
        trace!(%track, %attr, len = t.elements.len(), "ordinals assigned");
    }

    fn current(&self, track: TrackId, class: &ClassName) -> Option<usize> {
        self.tracks
            .get(track.0)?
            .elements
            .iter()
            .find(|el| el.has_class(class.as_str()))
            .and_then(Element::ordinal)
    }

    fn extent(&self, _slide: SlideRef) -> f32 {
        self.slide_width
    }

    fn apply(&mut self, effect: Effect) {
        match &effect {
            Effect::Mark { slide, class, on } => {
                if let Some(track) = self.tracks.get_mut(slide.track.0) {
                    if let Some(pos) = track.position(slide.ordinal) {
                        let classes = &mut track.elements[pos].classes;
                        if *on {
                            classes.insert(class.as_str().to_owned());
                        } else {
                            classes.remove(class.as_str());
                        }
                    }
                }
            }
            Effect::Set {
                target,
                property,
                value,
            } => self.write(*target, *property, *value),
            Effect::Relocate { slide, placement } => {
                if let Some(track) = self.tracks.get_mut(slide.track.0) {
                    if let Some(pos) = track.position(slide.ordinal) {
                        let el = track.elements.remove(pos);
                        match placement {
                            Placement::First => track.elements.insert(0, el),
                            Placement::Last => track.elements.push(el),
                        }
                    }
                }
            }
        }
        self.events.push(StageEvent::Applied(effect));
    }

    fn animate(&mut self, motion: Motion) -> AnimationId {
        self.next_animation += 1;
        let id = AnimationId(self.next_animation);
        let from = self.property(motion.target, motion.property);
        if let Some(tx) = &self.notifier {
            let tx = tx.clone();
            let after = motion.duration;
            tokio::spawn(async move {
                tokio::time::sleep(after).await;
                let _ = tx.send(AnimationDone(id));
            });
        }
        self.events.push(StageEvent::Started(id, motion.clone()));
        self.running.insert(
            id,
            Running {
                motion,
                from,
                elapsed: Duration::ZERO,
            },
        );
        id
    }

    fn set_data(&mut self, attr: &DataAttribute, value: i64) {
        self.data.insert(attr.as_str().to_owned(), value);
    }

    fn settle(&mut self, id: AnimationId) {
        if let Some(run) = self.running.remove(&id) {
            self.write(run.motion.target, run.motion.property, run.motion.to);
            self.events.push(StageEvent::Settled(id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::Selector;
    use crate::stage::Easing;

    fn query() -> TrackQuery {
        TrackQuery::new(Selector::new(".slides"), Selector::new(".slide"))
    }

    fn tagged(len: usize) -> (MemoryStage, TrackId, ClassName) {
        let mut stage = MemoryStage::new();
        let id = stage.add_track(query(), len);
        let class = ClassName::new("active");
        stage.assign_ordinals(id, &DataAttribute::new("counter"), &class);
        (stage, id, class)
    }

    #[test]
    fn ordinals_follow_document_order_and_flag_first() {
        let (stage, id, class) = tagged(3);
        assert_eq!(stage.order(id), vec![Some(0), Some(1), Some(2)]);
        assert_eq!(stage.current(id, &class), Some(0));
        assert_eq!(stage.flagged(id, &class), vec![0]);
    }

    #[test]
    fn relocate_moves_within_track() {
        let (mut stage, id, _) = tagged(3);
        stage.apply(Effect::Relocate {
            slide: SlideRef::new(id, 0),
            placement: Placement::Last,
        });
        assert_eq!(stage.order(id), vec![Some(1), Some(2), Some(0)]);
        stage.apply(Effect::Relocate {
            slide: SlideRef::new(id, 2),
            placement: Placement::First,
        });
        assert_eq!(stage.order(id), vec![Some(2), Some(1), Some(0)]);
    }

    #[test]
    fn advance_interpolates_then_completes() {
        let (mut stage, id, _) = tagged(2);
        let target = Target::Slide(SlideRef::new(id, 1));
        let anim = stage.animate(Motion {
            target,
            property: Property::Opacity,
            to: 1.0,
            duration: Duration::from_millis(100),
            easing: Easing::Linear,
        });
        assert!(stage.advance(Duration::from_millis(50)).is_empty());
        assert!((stage.property(target, Property::Opacity) - 0.5).abs() < 1e-3);
        assert_eq!(stage.advance(Duration::from_millis(50)), vec![anim]);
        assert!((stage.property(target, Property::Opacity) - 1.0).abs() < f32::EPSILON);
        assert_eq!(stage.running(), 0);
    }

    #[test]
    fn unbound_query_is_absent() {
        let mut stage = MemoryStage::new();
        assert!(stage.bind(&query()).is_none());
    }
}
