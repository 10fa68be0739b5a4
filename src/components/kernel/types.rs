use std::f64::consts::PI;

use crate::components::motion::Envelope;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KernelRing {
	/// Radius as a fraction of the diagram scale.
	pub radius: f64,
	pub dash: Option<[f64; 2]>,
	pub line_width: f64,
	pub dir: f64,
	pub opacity: f64,
	/// Breathing phase offset in milliseconds.
	pub breath_offset: f64,
}

const fn ring(
	radius: f64,
	dash: Option<[f64; 2]>,
	line_width: f64,
	dir: f64,
	opacity: f64,
	breath_offset: f64,
) -> KernelRing {
	KernelRing {
		radius,
		dash,
		line_width,
		dir,
		opacity,
		breath_offset,
	}
}

/// Core plus four rings, innermost first.
pub const RINGS: [KernelRing; 5] = [
	ring(0.16, None, 0.0, 1.0, 0.0, 0.0),
	ring(0.38, None, 1.8, 1.0, 0.35, 0.0),
	ring(0.58, Some([6.0, 5.0]), 1.2, -1.0, 0.25, 1500.0),
	ring(0.78, Some([4.0, 8.0]), 0.8, 1.0, 0.20, 3000.0),
	ring(0.97, Some([2.0, 6.0]), 0.5, -1.0, 0.15, 4500.0),
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitDot {
	pub ring: usize,
	pub angle: f64,
	/// Radians per millisecond.
	pub speed: f64,
	pub size: f64,
}

const fn dot(ring: usize, angle: f64, speed: f64, size: f64) -> OrbitDot {
	OrbitDot {
		ring,
		angle,
		speed,
		size,
	}
}

pub const DOTS: [OrbitDot; 7] = [
	dot(1, 0.0, 0.0006, 2.2),
	dot(1, PI, 0.0006, 1.6),
	dot(2, 0.5, -0.00045, 2.0),
	dot(2, 3.8, -0.00045, 1.4),
	dot(3, 0.3, 0.00035, 1.8),
	dot(3, 2.5, 0.00035, 1.2),
	dot(3, 4.7, 0.00035, 1.0),
];

/// Stable identifier of a label: its index in [`kernel_labels`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LabelId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelKind {
	Invariant,
	Rule,
	Interface,
	/// Drawn as a pill on the outer ring.
	Environment,
}

impl LabelKind {
	/// Ring progress after which labels of this kind fade in, and the fade rate.
	pub fn reveal_window(self) -> (f64, f64) {
		match self {
			LabelKind::Invariant | LabelKind::Rule => (0.65, 2.8),
			LabelKind::Interface => (0.6, 2.5),
			LabelKind::Environment => (0.55, 2.2),
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct KernelLabel {
	pub id: LabelId,
	pub text: &'static str,
	pub kind: LabelKind,
	/// Ring the label sits on.
	pub ring: usize,
	pub angle: f64,
	/// Ring whose dots light this label up.
	pub probe_ring: usize,
}

pub fn kernel_labels() -> Vec<KernelLabel> {
	let mut labels = Vec::new();
	let mut push = |text, kind, ring, angle, probe_ring| {
		labels.push(KernelLabel {
			id: LabelId(labels.len()),
			text,
			kind,
			ring,
			angle,
			probe_ring,
		})
	};

	for (text, angle) in [
		("Self-Containment", -PI * 0.5),
		("Persistence", 0.0),
		("Interoperability", PI * 0.5),
		("Observability", PI),
	] {
		push(text, LabelKind::Invariant, 1, angle, 1);
	}
	for (text, angle) in [
		("Identity vs Commitments", -PI * 0.25),
		("Reconciliation", PI * 0.25),
		("Explicit Ambiguity", PI * 0.75),
		("Attributable Resolution", -PI * 0.75),
	] {
		push(text, LabelKind::Rule, 2, angle, 2);
	}
	for (i, text) in ["SDK", "API", "CLI", "Visualizers", "Indexers"].into_iter().enumerate() {
		push(text, LabelKind::Interface, 3, evenly_spaced(i, 5), 3);
	}
	for (i, text) in ["Blockchains", "Databases", "Clouds", "Storage", "Runtimes"]
		.into_iter()
		.enumerate()
	{
		push(text, LabelKind::Environment, 4, evenly_spaced(i, 5), 3);
	}
	labels
}

/// Angle of item `i` of `n` spread around a circle starting at the top.
fn evenly_spaced(i: usize, n: usize) -> f64 {
	-PI / 2.0 + 2.0 * PI * i as f64 / n as f64
}

pub const CORE_LABEL: &str = "HOLON";

pub const CAPTION: [(&str, bool); 3] = [
	("Constraint is highest at the center and decreases outward.", false),
	("The kernel enforces invariants, not outcomes.", false),
	("Everything beyond the kernel is optional.", true),
];

/// Colours as `"r, g, b"` triples, ready for `rgba(...)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
	pub line: &'static str,
	pub ink: &'static str,
	pub glow: &'static str,
	pub pill_fill: &'static str,
	pub pill_text: &'static str,
	pub core: &'static str,
	pub core_text: &'static str,
}

/// The two renditions of the kernel diagram. Both share one state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KernelStyle {
	/// Peach linework on a dark section.
	#[default]
	Classic,
	/// Teal linework on a light section, with dot trails and radial guides.
	Trails,
}

impl KernelStyle {
	pub fn palette(self) -> Palette {
		match self {
			KernelStyle::Classic => Palette {
				line: "254, 218, 179",
				ink: "255, 255, 255",
				glow: "255, 255, 255",
				pill_fill: "0, 51, 70",
				pill_text: "255, 254, 223",
				core: "255, 55, 0",
				core_text: "255, 255, 255",
			},
			KernelStyle::Trails => Palette {
				line: "0, 51, 70",
				ink: "0, 51, 70",
				glow: "0, 51, 70",
				pill_fill: "255, 254, 223",
				pill_text: "0, 51, 70",
				core: "255, 55, 0",
				core_text: "255, 255, 255",
			},
		}
	}

	pub fn lit_envelope(self) -> Envelope {
		match self {
			KernelStyle::Classic => Envelope::new(800.0, 0.55),
			KernelStyle::Trails => Envelope::new(900.0, 0.55),
		}
	}

	/// Reveal delay between successive rings, as a fraction of total progress.
	pub fn ring_delay(self) -> f64 {
		match self {
			KernelStyle::Classic => 0.12,
			KernelStyle::Trails => 0.10,
		}
	}

	pub fn has_trails(self) -> bool {
		self == KernelStyle::Trails
	}

	pub fn has_guides(self) -> bool {
		self == KernelStyle::Trails
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_label_ids_are_indices() {
		let labels = kernel_labels();
		assert_eq!(labels.len(), 18);
		for (i, label) in labels.iter().enumerate() {
			assert_eq!(label.id, LabelId(i));
		}
	}

	#[test]
	fn test_environment_pills_probe_ring_three() {
		let labels = kernel_labels();
		assert!(
			labels
				.iter()
				.filter(|l| l.kind == LabelKind::Environment)
				.all(|l| l.ring == 4 && l.probe_ring == 3)
		);
	}

	#[test]
	fn test_dots_only_on_middle_rings() {
		assert!(DOTS.iter().all(|d| (1..=3).contains(&d.ring)));
	}
}
