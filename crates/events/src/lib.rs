//! `parlo-events`: in-process publish/subscribe for learner events.

pub mod bus;

pub use bus::{EventBus, LearnerEvent};
