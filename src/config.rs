use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::selector::{ClassName, DataAttribute, Selector, TrackQuery};
use crate::slideshow::SlideshowOptions;
use crate::transition::{StyleRef, builtin};

/// Kebab-case spellings accepted for registry names.
const STYLE_ALIASES: &[(&str, &str)] = &[("fade-in-out", builtin::FADE_IN_OUT)];

fn style_ref(name: &str) -> StyleRef {
    let name = STYLE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map_or(name, |&(_, canonical)| canonical);
    StyleRef::named(name)
}

/// File-level configuration. Keys are kebab-case; the camelCase option names
/// are accepted as aliases.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct SlideshowConfig {
    /// Primary track container.
    pub slides: String,
    /// Secondary track container, kept in lockstep with the primary one.
    #[serde(alias = "secondarySlides")]
    pub secondary_slides: String,
    /// Slide elements inside either track.
    pub slide: String,
    /// Navigator container.
    #[serde(alias = "slideNav")]
    pub slide_nav: String,
    /// Indicator elements inside the navigator.
    #[serde(alias = "slideNavElement")]
    pub slide_nav_element: String,
    /// Manual "next" trigger; consumed by the host's event binding.
    #[serde(alias = "nextButton")]
    pub next_button: String,
    /// Manual "previous" trigger; consumed by the host's event binding.
    #[serde(alias = "prevButton")]
    pub prev_button: String,
    /// Auto-advance interval.
    #[serde(alias = "duration")]
    pub duration_ms: u64,
    /// Transition duration.
    #[serde(alias = "speed")]
    pub speed_ms: u64,
    /// Strategy name for the primary track.
    pub style: String,
    /// Strategy name for the secondary track.
    #[serde(alias = "secondaryStyle")]
    pub secondary_style: String,
    /// Class marking the current slide and indicator.
    #[serde(alias = "currentClass")]
    pub current_class: String,
    /// Data attribute (without `data-`) holding each slide's ordinal and the
    /// container's counter.
    pub counter: String,
    /// Data attribute (without `data-`) holding the container's slide count.
    pub count: String,
    /// Start auto-advance as soon as the driver runs.
    pub autoplay: bool,
    /// Restart auto-advance after a user action instead of leaving it stopped.
    pub resume_after_interaction: bool,
    /// Skip timer-driven steps while a transition is still animating.
    pub guard_auto_advance: bool,
}

impl Default for SlideshowConfig {
    fn default() -> Self {
        Self {
            slides: ".slides".into(),
            secondary_slides: ".secondary-slides".into(),
            slide: ".slide".into(),
            slide_nav: ".slide-counter".into(),
            slide_nav_element: "a".into(),
            next_button: ".next-slide".into(),
            prev_button: ".prev-slide".into(),
            duration_ms: 6000,
            speed_ms: 400,
            style: "fade".into(),
            secondary_style: "fade".into(),
            current_class: "active".into(),
            counter: "counter".into(),
            count: "count".into(),
            autoplay: true,
            resume_after_interaction: false,
            guard_auto_advance: true,
        }
    }
}

impl SlideshowConfig {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&s)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Validate invariants that serde defaults cannot express.
    pub fn validated(self) -> Result<Self> {
        if self.duration_ms == 0 {
            return Err(Error::InvalidOption(
                "duration-ms must be greater than zero".into(),
            ));
        }
        if self.speed_ms == 0 {
            return Err(Error::InvalidOption(
                "speed-ms must be greater than zero".into(),
            ));
        }
        let required = [
            ("slides", &self.slides),
            ("secondary-slides", &self.secondary_slides),
            ("slide", &self.slide),
            ("slide-nav", &self.slide_nav),
            ("slide-nav-element", &self.slide_nav_element),
            ("style", &self.style),
            ("secondary-style", &self.secondary_style),
            ("current-class", &self.current_class),
            ("counter", &self.counter),
            ("count", &self.count),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(Error::InvalidOption(format!("{key} must not be empty")));
            }
        }
        if self.counter == self.count {
            return Err(Error::InvalidOption(format!(
                "counter and count must name different attributes (both '{}')",
                self.counter
            )));
        }
        Ok(self)
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn speed(&self) -> Duration {
        Duration::from_millis(self.speed_ms)
    }

    pub fn next_button(&self) -> Selector {
        Selector::new(self.next_button.as_str())
    }

    pub fn prev_button(&self) -> Selector {
        Selector::new(self.prev_button.as_str())
    }

    pub fn to_options(&self) -> SlideshowOptions {
        let slide = Selector::new(self.slide.as_str());
        SlideshowOptions {
            slides: TrackQuery::new(Selector::new(self.slides.as_str()), slide.clone()),
            secondary_slides: TrackQuery::new(
                Selector::new(self.secondary_slides.as_str()),
                slide,
            ),
            navigator: TrackQuery::new(
                Selector::new(self.slide_nav.as_str()),
                Selector::new(self.slide_nav_element.as_str()),
            ),
            duration: self.duration(),
            speed: self.speed(),
            style: style_ref(&self.style),
            secondary_style: style_ref(&self.secondary_style),
            current_class: ClassName::new(self.current_class.as_str()),
            counter_attr: DataAttribute::new(&self.counter),
            count_attr: DataAttribute::new(&self.count),
            resume_after_interaction: self.resume_after_interaction,
            guard_auto_advance: self.guard_auto_advance,
        }
    }
}
