use glam::DVec2;

/// External visual object a node's transform is pushed to.
///
/// Only the setters are needed for propagation. The readers are used by the
/// family registry, which reports live values straight off the target.
pub trait Target {
	fn set_position(&mut self, x: f64, y: f64);

	fn set_orientation(&mut self, degrees: f64);

	/// Uniform size multiplier, `1.` being the natural size.
	fn set_size(&mut self, _scale: f64) {}

	fn position(&self) -> Option<DVec2> {
		None
	}

	fn orientation(&self) -> Option<f64> {
		None
	}
}

/// Headless target that just remembers what was pushed to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
	pub x: f64,
	pub y: f64,
	pub direction: f64,
	pub size: f64,
}

impl Default for Sprite {
	fn default() -> Self {
		Self {
			x: 0.,
			y: 0.,
			direction: 0.,
			size: 1.,
		}
	}
}

impl Sprite {
	pub fn at(x: f64, y: f64) -> Self {
		Self {
			x,
			y,
			..Self::default()
		}
	}
}

impl Target for Sprite {
	fn set_position(&mut self, x: f64, y: f64) {
		self.x = x;
		self.y = y;
	}

	fn set_orientation(&mut self, degrees: f64) {
		self.direction = degrees;
	}

	fn set_size(&mut self, scale: f64) {
		self.size = scale;
	}

	fn position(&self) -> Option<DVec2> {
		Some(DVec2::new(self.x, self.y))
	}

	fn orientation(&self) -> Option<f64> {
		Some(self.direction)
	}
}

impl<T: Target + ?Sized> Target for Box<T> {
	fn set_position(&mut self, x: f64, y: f64) {
		(**self).set_position(x, y)
	}

	fn set_orientation(&mut self, degrees: f64) {
		(**self).set_orientation(degrees)
	}

	fn set_size(&mut self, scale: f64) {
		(**self).set_size(scale)
	}

	fn position(&self) -> Option<DVec2> {
		(**self).position()
	}

	fn orientation(&self) -> Option<f64> {
		(**self).orientation()
	}
}
