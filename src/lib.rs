pub mod config;
pub mod error;
pub mod events;
pub mod headless;
pub mod runner;
pub mod scheduler;
pub mod selector;
pub mod slideshow;
pub mod stage;
pub mod state;
pub mod transition;
pub mod tasks {
    pub mod driver;
}

pub use error::{Error, Result};
pub use slideshow::{Navigation, Slideshow, SlideshowOptions};
pub use transition::{Direction, Registry, Strategy, StyleRef};
