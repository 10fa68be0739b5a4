//! 3D gyroscope: tilted rings of light around a pulsing core, drawn with a
//! blurred glow pass.

mod component;
mod render;
mod state;
mod transform;
mod types;

pub use component::GyroscopeCanvas;
pub use types::GyroscopeConfig;
