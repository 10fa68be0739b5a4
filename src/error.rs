use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures while wiring an animation to the page.
///
/// None of these are fatal: a canvas that fails to mount simply stays blank.
#[derive(Debug, Error)]
pub enum CanvasError {
	#[error("no global window")]
	NoWindow,
	#[error("no document on window")]
	NoDocument,
	#[error("canvas is not attached to a parent element")]
	Detached,
	#[error("2d rendering context unavailable")]
	NoContext,
	#[error("browser call failed: {0}")]
	Js(String),
}

impl From<JsValue> for CanvasError {
	fn from(value: JsValue) -> Self {
		CanvasError::Js(format!("{value:?}"))
	}
}
