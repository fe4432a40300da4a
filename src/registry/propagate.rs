use std::collections::HashMap;

use indextree::NodeId;
use tracing::trace;

use crate::config::{CompositionMode, RegistryConfig};
use crate::math::transform::Transform;
use crate::target::Target;

use super::NodeRegistry;

impl<T: Target> NodeRegistry<T> {
	/// Recompute `node_id` and every node below it, pushing each result to its bound target.
	///
	/// Pre-order traversal, so a parent is always resolved before its children and each
	/// child composes onto the parent's cached result instead of walking its ancestors again.
	pub(super) fn propagate(&mut self, node_id: NodeId) {
		let RegistryConfig {
			mode,
			heading_offset,
			push_scale,
		} = self.config;

		let subtree = node_id.descendants(&self.arena).collect::<Vec<_>>();
		let mut resolved = HashMap::<NodeId, Transform>::with_capacity(subtree.len());

		for nid in subtree {
			let Some(node) = self.arena.get(nid) else {
				continue;
			};

			let transform = match mode {
				CompositionMode::Relative => Transform::from(node.get().trans_offset),
				CompositionMode::Effective => match node.parent().and_then(|parent| resolved.get(&parent)) {
					Some(parent_trans) => parent_trans.then(&node.get().trans_offset, heading_offset),
					// only the subtree root lands here
					None => self.effective_of(nid),
				},
			};

			if let Some(node) = self.arena.get_mut(nid) {
				let node = node.get_mut();
				if let Some(target) = node.target.as_mut() {
					target.set_position(transform.x(), transform.y());
					target.set_orientation(transform.rotation);
					if push_scale {
						target.set_size(transform.scale);
					}
					trace!("Pushed {:?} to target of {:?}", transform, node.id);
				}
			}

			resolved.insert(nid, transform);
		}
	}
}

#[cfg(test)]
mod tests {
	use glam::DVec2;

	use crate::config::RegistryConfig;
	use crate::registry::NodeRegistry;
	use crate::target::{Sprite, Target};

	const EPS: f64 = 1e-9;

	fn sprite_pos(registry: &NodeRegistry<Sprite>, id: &str) -> DVec2 {
		registry.target(id).and_then(Target::position).unwrap()
	}

	fn rig(config: RegistryConfig) -> NodeRegistry<Sprite> {
		let mut registry = NodeRegistry::new(config);
		for id in ["torso", "arm", "hand", "bystander"] {
			registry.bind(id, Sprite::at(-999., -999.));
		}
		registry.set_position("torso", 10., 0.);
		registry.set_parent("arm", "torso").unwrap();
		registry.set_position("arm", 0., 10.);
		registry.set_parent("hand", "arm").unwrap();
		registry.set_position("hand", 0., 5.);
		registry
	}

	#[test]
	fn rotation_reaches_every_descendant() {
		let mut registry = rig(RegistryConfig::default());
		let before = ["torso", "arm", "hand"].map(|id| *registry.target(id).unwrap());

		registry.set_rotation("torso", 90.);

		for (i, id) in ["torso", "arm", "hand"].into_iter().enumerate() {
			let sprite = registry.target(id).unwrap();
			let effective = registry.effective(id);
			assert!((sprite.position().unwrap() - effective.translation).length() < EPS, "{id}");
			assert!((sprite.direction - effective.rotation).abs() < EPS, "{id}");
			assert_ne!(*sprite, before[i], "{id} was not updated");
		}

		assert_eq!(registry.target("bystander"), Some(&Sprite::at(-999., -999.)));
	}

	#[test]
	fn pushed_values_follow_the_hierarchy() {
		let mut registry = rig(RegistryConfig::default());
		registry.set_rotation("torso", 90.);

		// at 90° the torso frame is the neutral one
		assert!((sprite_pos(&registry, "torso") - DVec2::new(10., 0.)).length() < EPS);
		assert!((sprite_pos(&registry, "arm") - DVec2::new(10., 10.)).length() < EPS);
		assert!((sprite_pos(&registry, "hand") - DVec2::new(10., 15.)).length() < EPS);

		registry.set_rotation("torso", 180.);
		assert!((sprite_pos(&registry, "arm") - DVec2::new(20., 0.)).length() < EPS);
		assert!((sprite_pos(&registry, "hand") - DVec2::new(25., 0.)).length() < EPS);
		assert!((registry.target("hand").unwrap().direction - 180.).abs() < EPS);
	}

	#[test]
	fn scale_is_pushed_as_size_when_enabled() {
		let mut registry = rig(RegistryConfig::default());
		registry.set_scale("torso", 2.);
		assert_eq!(registry.target("hand").unwrap().size, 2.);

		let mut registry = rig(RegistryConfig::default().with_push_scale(false));
		registry.set_scale("torso", 2.);
		assert_eq!(registry.target("hand").unwrap().size, 1.);
	}

	#[test]
	fn relative_mode_pushes_local_values() {
		let mut registry = rig(RegistryConfig::relative());
		registry.set_rotation("torso", 45.);

		assert_eq!(sprite_pos(&registry, "arm"), DVec2::new(0., 10.));
		assert_eq!(registry.target("arm").unwrap().direction, 0.);
		assert_eq!(registry.target("torso").unwrap().direction, 45.);
	}

	#[test]
	fn reparent_and_unparent_repush() {
		let mut registry = rig(RegistryConfig::default().with_heading_offset(0.));

		assert!((sprite_pos(&registry, "hand") - DVec2::new(10., 15.)).length() < EPS);

		registry.clear_parent("arm");
		assert_eq!(sprite_pos(&registry, "arm"), DVec2::new(0., 10.));
		assert!((sprite_pos(&registry, "hand") - DVec2::new(0., 15.)).length() < EPS);

		registry.set_position("bystander", -5., 5.);
		registry.set_parent("arm", "bystander").unwrap();
		assert!((sprite_pos(&registry, "arm") - DVec2::new(-5., 15.)).length() < EPS);
		assert!((sprite_pos(&registry, "hand") - DVec2::new(-5., 20.)).length() < EPS);
	}

	#[test]
	fn unbound_group_nodes_still_carry_children() {
		let mut registry = NodeRegistry::<Box<dyn Target>>::new(RegistryConfig::default().with_heading_offset(0.));
		registry.bind("leaf", Box::new(Sprite::default()));
		registry.set_parent("leaf", "group").unwrap();
		registry.set_position("leaf", 1., 0.);

		registry.set_position("group", 5., 5.);

		assert!(registry.target("group").is_none());
		assert_eq!(registry.target("leaf").and_then(|t| t.position()), Some(DVec2::new(6., 5.)));
	}
}
