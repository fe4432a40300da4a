use indextree::NodeId;

use crate::config::CompositionMode;
use crate::math::transform::Transform;

use super::NodeRegistry;

impl<T> NodeRegistry<T> {
	/// The node's local values, untouched by ancestry. Identity for unknown ids.
	pub fn relative(&self, id: &str) -> Transform {
		self.node(id)
			.map(|node| Transform::from(node.trans_offset))
			.unwrap_or(Transform::IDENTITY)
	}

	/// The node's local values composed through every ancestor, root first. Identity for unknown ids.
	pub fn effective(&self, id: &str) -> Transform {
		match self.ids.get(id) {
			Some(node_id) => self.effective_of(*node_id),
			None => Transform::IDENTITY,
		}
	}

	/// Transform according to the configured composition mode.
	pub fn transform(&self, id: &str) -> Transform {
		match self.config.mode {
			CompositionMode::Relative => self.relative(id),
			CompositionMode::Effective => self.effective(id),
		}
	}

	pub(super) fn effective_of(&self, node_id: NodeId) -> Transform {
		// ancestors() starts at the node itself and ends at its root
		let chain = node_id.ancestors(&self.arena).collect::<Vec<_>>();
		let mut offsets = chain
			.iter()
			.rev()
			.filter_map(|nid| self.arena.get(*nid))
			.map(|node| &node.get().trans_offset);

		let Some(root) = offsets.next() else {
			return Transform::IDENTITY;
		};
		offsets.fold(Transform::from(*root), |parent, local| {
			parent.then(local, self.config.heading_offset)
		})
	}
}
