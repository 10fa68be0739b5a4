mod component;
mod render;
mod state;
mod types;

pub use component::KernelCanvas;
pub use types::KernelStyle;
