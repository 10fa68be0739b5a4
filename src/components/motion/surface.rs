//! Canvas sizing: CSS size, backing-store size and the context transform.

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub const MAX_PIXEL_RATIO: f64 = 2.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
	pub width: f64,
	pub height: f64,
}

impl Size {
	pub const fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	/// Smaller of the two sides.
	pub fn min_side(&self) -> f64 {
		self.width.min(self.height)
	}
}

/// Clamp a reported device pixel ratio into `(0, MAX_PIXEL_RATIO]`.
pub fn pixel_ratio(reported: f64) -> f64 {
	if reported.is_finite() && reported > 0.0 {
		reported.min(MAX_PIXEL_RATIO)
	} else {
		1.0
	}
}

/// Logical and physical dimensions of one canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Backing {
	pub css: Size,
	pub ratio: f64,
}

impl Backing {
	pub fn new(css: Size, reported_ratio: f64) -> Self {
		Self {
			css,
			ratio: pixel_ratio(reported_ratio),
		}
	}

	pub fn pixel_width(&self) -> u32 {
		(self.css.width * self.ratio).round().max(0.0) as u32
	}

	pub fn pixel_height(&self) -> u32 {
		(self.css.height * self.ratio).round().max(0.0) as u32
	}

	/// Size the canvas element and reset its transform so drawing happens in CSS pixels.
	pub fn apply(
		&self,
		canvas: &HtmlCanvasElement,
		ctx: &CanvasRenderingContext2d,
	) -> Result<(), JsValue> {
		let style = canvas.style();
		style.set_property("width", &format!("{}px", self.css.width))?;
		style.set_property("height", &format!("{}px", self.css.height))?;
		self.apply_offscreen(canvas, ctx)
	}

	/// Resize an offscreen buffer to the same backing store without touching CSS.
	pub fn apply_offscreen(
		&self,
		canvas: &HtmlCanvasElement,
		ctx: &CanvasRenderingContext2d,
	) -> Result<(), JsValue> {
		canvas.set_width(self.pixel_width());
		canvas.set_height(self.pixel_height());
		ctx.set_transform(self.ratio, 0.0, 0.0, self.ratio, 0.0, 0.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_pixel_ratio_is_capped() {
		assert_eq!(pixel_ratio(1.0), 1.0);
		assert_eq!(pixel_ratio(1.5), 1.5);
		assert_eq!(pixel_ratio(3.0), 2.0);
		assert_eq!(pixel_ratio(0.0), 1.0);
		assert_eq!(pixel_ratio(f64::NAN), 1.0);
	}

	#[test]
	fn test_backing_scales_css_size() {
		let backing = Backing::new(Size::new(700.0, 280.0), 3.0);
		assert_eq!(backing.ratio, 2.0);
		assert_eq!(backing.pixel_width(), 1400);
		assert_eq!(backing.pixel_height(), 560);
	}

	#[test]
	fn test_backing_preserves_aspect() {
		for ratio in [1.0, 1.25, 1.5, 2.0, 2.75] {
			let css = Size::new(960.0, 691.2);
			let backing = Backing::new(css, ratio);
			let physical = backing.pixel_width() as f64 / backing.pixel_height() as f64;
			assert!((physical - css.width / css.height).abs() < 0.01);
		}
	}
}
