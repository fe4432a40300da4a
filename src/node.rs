use crate::math::transform::TransformOffset;

/// A named entry of the transform hierarchy.
///
/// Parent links live in the registry's arena, not on the node. The id and local transform are only
/// changed through the registry, which keeps its id lookup and the bound targets in step.
#[derive(Debug, Clone)]
pub struct Node<T> {
	pub(crate) id: String,
	pub(crate) trans_offset: TransformOffset,
	pub(crate) target: Option<T>,
}

impl<T> Node<T> {
	/// Detached node with an identity transform and nothing bound.
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			trans_offset: TransformOffset::default(),
			target: None,
		}
	}

	pub fn id(&self) -> &str {
		&self.id
	}

	pub fn trans_offset(&self) -> &TransformOffset {
		&self.trans_offset
	}

	pub fn target(&self) -> Option<&T> {
		self.target.as_ref()
	}

	pub fn target_mut(&mut self) -> Option<&mut T> {
		self.target.as_mut()
	}

	pub fn is_bound(&self) -> bool {
		self.target.is_some()
	}
}

/// Partial change of a node's local transform. `None` fields are left as they are.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LocalUpdate {
	pub translation: Option<glam::DVec2>,
	pub rotation: Option<f64>,
	pub scale: Option<f64>,
}

impl From<TransformOffset> for LocalUpdate {
	fn from(offset: TransformOffset) -> Self {
		Self {
			translation: Some(offset.translation),
			rotation: Some(offset.rotation),
			scale: Some(offset.scale),
		}
	}
}

impl LocalUpdate {
	pub(crate) fn apply_to(&self, offset: &mut TransformOffset) {
		if let Some(translation) = self.translation {
			offset.translation = translation;
		}
		if let Some(rotation) = self.rotation {
			offset.rotation = rotation;
		}
		if let Some(scale) = self.scale {
			offset.scale = scale;
		}
	}
}
