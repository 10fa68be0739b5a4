//! Shared plumbing for the canvas animations: visibility hooks, timing,
//! easing, lit highlights and the frame loop driver.

pub mod clock;
pub mod driver;
pub mod easing;
mod events;
pub mod lit;
mod playback;
pub mod reveal;
pub mod surface;
pub mod visibility;

pub use driver::{FrameLoop, LoopOptions, Scene, Trigger, mount, random_seed};
pub use lit::{Envelope, LitMap};
pub use reveal::Reveal;
pub use surface::{Backing, Size};
pub use visibility::prefers_reduced_motion;
