use crate::stage::AnimationId;

/// A user action delivered by the host's click/swipe binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    Next,
    Prev,
    /// A counter link; carries the link's ordinal.
    Jump(i64),
    SwipeLeft,
    SwipeRight,
}

/// Control messages for the driver task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Interact(Interaction),
    Start,
    Stop,
}

/// Emitted by the driver after the counter changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideChanged {
    pub from: usize,
    pub to: usize,
}

/// Reported by the host when a motion has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationDone(pub AnimationId);
