use glam::DVec2;

/// Heading offset of hosts where a rotation of 0° faces up.
pub const DEFAULT_HEADING_OFFSET: f64 = 90.0;

/// relative transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformOffset {
	/// X Y
	pub translation: DVec2,
	/// Degrees
	pub rotation: f64,
	/// Uniform zoom
	pub scale: f64,
}

impl Default for TransformOffset {
	fn default() -> Self {
		Self {
			translation: DVec2::ZERO,
			rotation: 0.,
			scale: 1.,
		}
	}
}

impl TransformOffset {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_translation(mut self, translation: DVec2) -> Self {
		self.translation = translation;
		self
	}

	pub fn with_rotation(mut self, rotation: f64) -> Self {
		self.rotation = rotation;
		self
	}

	pub fn with_scale(mut self, scale: f64) -> Self {
		self.scale = scale;
		self
	}
}

/// Resolved transform of a node, either its relative one or the one composed through its ancestors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
	pub translation: DVec2,
	pub rotation: f64,
	pub scale: f64,
}

impl Default for Transform {
	fn default() -> Self {
		Self::IDENTITY
	}
}

impl From<TransformOffset> for Transform {
	fn from(offset: TransformOffset) -> Self {
		Self {
			translation: offset.translation,
			rotation: offset.rotation,
			scale: offset.scale,
		}
	}
}

impl Transform {
	pub const IDENTITY: Self = Self {
		translation: DVec2::ZERO,
		rotation: 0.,
		scale: 1.,
	};

	#[inline]
	pub fn x(&self) -> f64 {
		self.translation.x
	}

	#[inline]
	pub fn y(&self) -> f64 {
		self.translation.y
	}

	/// Places `local` inside `self`.
	///
	/// Rotations add and scales multiply. The local translation is scaled by `self.scale`, then rotated by
	/// `self.rotation - heading_offset` degrees, clockwise for positive angles, and moved to `self.translation`.
	pub fn then(&self, local: &TransformOffset, heading_offset: f64) -> Transform {
		let (sin, cos) = (self.rotation - heading_offset).to_radians().sin_cos();
		let scaled = local.translation * self.scale;
		let rotated = DVec2::new(scaled.x * cos + scaled.y * sin, -scaled.x * sin + scaled.y * cos);

		Transform {
			translation: self.translation + rotated,
			rotation: self.rotation + local.rotation,
			scale: self.scale * local.scale,
		}
	}
}
