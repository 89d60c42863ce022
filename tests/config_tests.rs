use std::io::Write;
use std::time::Duration;

use slideshow::headless::MemoryStage;
use slideshow::scheduler::ManualTimers;
use slideshow::{Error, Registry, Slideshow};
use slideshow::config::SlideshowConfig;
use slideshow::selector::Selector;

#[test]
fn empty_document_uses_defaults() {
    let cfg: SlideshowConfig = serde_yaml::from_str("{}").unwrap();
    assert_eq!(cfg.slides, ".slides");
    assert_eq!(cfg.duration(), Duration::from_millis(6000));
    assert_eq!(cfg.speed(), Duration::from_millis(400));
    assert_eq!(cfg.style, "fade");
    assert_eq!(cfg.secondary_style, "fade");
    assert_eq!(cfg.current_class, "active");
    assert!(cfg.autoplay);
    assert!(!cfg.resume_after_interaction);
    assert!(cfg.guard_auto_advance);
}

#[test]
fn parse_kebab_case_config() {
    let yaml = r##"
slides: "#hero"
secondary-slides: "#captions"
slide-nav: ".dots"
slide-nav-element: "span"
duration-ms: 3000
speed-ms: 250
style: push
secondary-style: none
current-class: current
resume-after-interaction: true
"##;
    let cfg = SlideshowConfig::from_yaml_str(yaml).unwrap().validated().unwrap();
    assert_eq!(cfg.slides, "#hero");
    assert_eq!(cfg.secondary_slides, "#captions");
    assert_eq!(cfg.duration(), Duration::from_millis(3000));
    assert_eq!(cfg.speed(), Duration::from_millis(250));
    assert_eq!(cfg.style, "push");
    assert!(cfg.resume_after_interaction);
}

#[test]
fn parse_camel_case_aliases() {
    let yaml = r#"
secondarySlides: ".sub"
slideNav: ".nav"
slideNavElement: "li"
nextButton: ".fwd"
prevButton: ".back"
secondaryStyle: fadeInOut
currentClass: "on"
duration: 1500
speed: 100
"#;
    let cfg = SlideshowConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(cfg.secondary_slides, ".sub");
    assert_eq!(cfg.slide_nav, ".nav");
    assert_eq!(cfg.slide_nav_element, "li");
    assert_eq!(cfg.next_button(), Selector::new(".fwd"));
    assert_eq!(cfg.prev_button(), Selector::new(".back"));
    assert_eq!(cfg.secondary_style, "fadeInOut");
    assert_eq!(cfg.current_class, "on");
    assert_eq!(cfg.duration_ms, 1500);
    assert_eq!(cfg.speed_ms, 100);
}

#[test]
fn unknown_keys_are_rejected() {
    let err = SlideshowConfig::from_yaml_str("transition-speed: 3\n").unwrap_err();
    assert!(matches!(err, Error::Yaml(_)), "got {err:?}");
}

#[test]
fn zero_interval_is_invalid() {
    let err = SlideshowConfig::from_yaml_str("duration-ms: 0\n")
        .unwrap()
        .validated()
        .unwrap_err();
    assert!(matches!(err, Error::InvalidOption(msg) if msg.contains("duration-ms")));
}

#[test]
fn zero_speed_is_invalid() {
    let err = SlideshowConfig::from_yaml_str("speed-ms: 0\n")
        .unwrap()
        .validated()
        .unwrap_err();
    assert!(matches!(err, Error::InvalidOption(msg) if msg.contains("speed-ms")));
}

#[test]
fn blank_selector_is_invalid() {
    let err = SlideshowConfig::from_yaml_str("slide: \"  \"\n")
        .unwrap()
        .validated()
        .unwrap_err();
    assert!(matches!(err, Error::InvalidOption(msg) if msg.contains("slide")));
}

#[test]
fn counter_and_count_must_differ() {
    let err = SlideshowConfig::from_yaml_str("counter: idx\ncount: idx\n")
        .unwrap()
        .validated()
        .unwrap_err();
    assert!(matches!(err, Error::InvalidOption(_)));
}

#[test]
fn loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "style: pull\nautoplay: false").unwrap();
    let cfg = SlideshowConfig::from_yaml_file(file.path()).unwrap();
    assert_eq!(cfg.style, "pull");
    assert!(!cfg.autoplay);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = SlideshowConfig::from_yaml_file(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn options_carry_selectors_and_timings() {
    let yaml = r#"
slides: ".gallery"
slide: ".frame"
counter: pos
count: total
speed-ms: 900
guard-auto-advance: false
"#;
    let options = SlideshowConfig::from_yaml_str(yaml).unwrap().to_options();
    assert_eq!(options.slides.to_string(), ".gallery .frame");
    assert_eq!(options.secondary_slides.to_string(), ".secondary-slides .frame");
    assert_eq!(options.navigator.to_string(), ".slide-counter a");
    assert_eq!(options.counter_attr.as_str(), "data-pos");
    assert_eq!(options.count_attr.as_str(), "data-total");
    assert_eq!(options.speed, Duration::from_millis(900));
    assert!(!options.guard_auto_advance);
    assert_eq!(options.style.to_string(), "fade");
}

#[test]
fn kebab_style_alias_resolves_to_registry_name() {
    let yaml = "style: fade-in-out\nsecondary-style: fade-in-out\n";
    let options = SlideshowConfig::from_yaml_str(yaml).unwrap().to_options();
    assert_eq!(options.style.to_string(), "fadeInOut");
    assert_eq!(options.secondary_style.to_string(), "fadeInOut");

    let mut stage = MemoryStage::new();
    stage.add_track(options.slides.clone(), 2);
    let show = Slideshow::initialize(stage, ManualTimers::new(), &options, &Registry::default());
    assert!(show.is_ok());
}
