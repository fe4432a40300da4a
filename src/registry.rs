mod compose;
mod propagate;

use std::collections::HashMap;
use std::fmt::Display;

use glam::DVec2;
use indextree::{Arena, NodeEdge, NodeId};
use tracing::{debug, warn};

use crate::config::RegistryConfig;
use crate::node::{LocalUpdate, Node};
use crate::target::Target;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HierarchyError {
	#[error("Parenting {node:?} to {parent:?} would make {node:?} its own ancestor")]
	Cycle { node: String, parent: String },
	#[error("Node arena rejected the link: {0}")]
	Arena(#[from] indextree::NodeError),
}

/// Owns every node of a transform hierarchy, keyed by caller-supplied ids.
///
/// Nodes are created on first mention and only ever discarded all at once by [`NodeRegistry::clear_all`].
/// Every mutation of a local transform or parent link is pushed, synchronously and depth-first, to the bound
/// targets of the mutated node and all of its descendants.
#[derive(Debug)]
pub struct NodeRegistry<T> {
	config: RegistryConfig,
	arena: Arena<Node<T>>,
	ids: HashMap<String, NodeId>,
}

impl<T> Default for NodeRegistry<T> {
	fn default() -> Self {
		Self::new(RegistryConfig::default())
	}
}

impl<T> NodeRegistry<T> {
	pub fn new(config: RegistryConfig) -> Self {
		Self {
			config,
			arena: Arena::new(),
			ids: HashMap::new(),
		}
	}

	pub fn config(&self) -> &RegistryConfig {
		&self.config
	}

	fn get_internal_node(&self, id: &str) -> Option<&indextree::Node<Node<T>>> {
		self.arena.get(*self.ids.get(id)?)
	}

	fn get_or_create_internal(&mut self, id: &str) -> NodeId {
		if let Some(node_id) = self.ids.get(id) {
			return *node_id;
		}

		debug!("Creating node {:?}", id);
		let node_id = self.arena.new_node(Node::new(id));
		self.ids.insert(id.to_owned(), node_id);
		node_id
	}

	/// Existing node, or a fresh detached one with an identity transform and no target.
	///
	/// Read-only: local transforms change through [`NodeRegistry::set_local`] so that targets are updated.
	pub fn get_or_create(&mut self, id: &str) -> &Node<T> {
		let node_id = self.get_or_create_internal(id);
		self.arena[node_id].get()
	}

	pub fn node(&self, id: &str) -> Option<&Node<T>> {
		Some(self.get_internal_node(id)?.get())
	}

	pub fn target(&self, id: &str) -> Option<&T> {
		self.node(id)?.target()
	}

	pub fn target_mut(&mut self, id: &str) -> Option<&mut T> {
		let node_id = *self.ids.get(id)?;
		self.arena.get_mut(node_id)?.get_mut().target_mut()
	}

	pub fn contains(&self, id: &str) -> bool {
		self.ids.contains_key(id)
	}

	pub fn len(&self) -> usize {
		self.ids.len()
	}

	pub fn is_empty(&self) -> bool {
		self.ids.is_empty()
	}

	/// all node ids, in creation order
	pub fn ids(&self) -> impl Iterator<Item = &str> {
		self.arena.iter().map(|node| node.get().id.as_str())
	}

	/// Attaches `target` to the node, replacing and returning whatever was bound before.
	///
	/// Nothing is pushed until the node's transform changes.
	pub fn bind(&mut self, id: &str, target: T) -> Option<T> {
		debug!("Binding target to node {:?}", id);
		let node_id = self.get_or_create_internal(id);
		self.arena[node_id].get_mut().target.replace(target)
	}

	pub fn parent_of(&self, id: &str) -> Option<&str> {
		let parent = self.get_internal_node(id)?.parent()?;
		Some(self.arena.get(parent)?.get().id.as_str())
	}

	/// Direct children, in the order they were parented. Empty for unknown ids.
	pub fn children_of(&self, id: &str) -> Vec<&str> {
		let Some(node_id) = self.ids.get(id) else {
			return Vec::new();
		};

		node_id
			.children(&self.arena)
			.filter_map(|nid| self.arena.get(nid))
			.map(|nod| nod.get().id.as_str())
			.collect()
	}

	/// Discards every node. Nothing is propagated.
	pub fn clear_all(&mut self) {
		debug!("Clearing {} nodes", self.ids.len());
		self.arena = Arena::new();
		self.ids.clear();
	}
}

impl<T: Target> NodeRegistry<T> {
	pub fn set_local(&mut self, id: &str, update: LocalUpdate) {
		let node_id = self.get_or_create_internal(id);
		update.apply_to(&mut self.arena[node_id].get_mut().trans_offset);
		self.propagate(node_id);
	}

	pub fn set_position(&mut self, id: &str, x: f64, y: f64) {
		self.set_local(
			id,
			LocalUpdate {
				translation: Some(DVec2::new(x, y)),
				..Default::default()
			},
		);
	}

	pub fn set_rotation(&mut self, id: &str, degrees: f64) {
		self.set_local(
			id,
			LocalUpdate {
				rotation: Some(degrees),
				..Default::default()
			},
		);
	}

	pub fn set_scale(&mut self, id: &str, scale: f64) {
		self.set_local(
			id,
			LocalUpdate {
				scale: Some(scale),
				..Default::default()
			},
		);
	}

	/// Links `id` under `parent`, creating either node if needed.
	///
	/// A link that would make `id` its own ancestor is refused and leaves the hierarchy untouched.
	pub fn set_parent(&mut self, id: &str, parent: &str) -> Result<(), HierarchyError> {
		let node_id = self.get_or_create_internal(id);
		let parent_id = self.get_or_create_internal(parent);

		if parent_id.ancestors(&self.arena).any(|ancestor| ancestor == node_id) {
			warn!("Refusing to parent {:?} to {:?}: cycle", id, parent);
			return Err(HierarchyError::Cycle {
				node: id.to_owned(),
				parent: parent.to_owned(),
			});
		}

		// the ancestor walk above already covers AppendSelf and AppendAncestor
		parent_id.checked_append(node_id, &mut self.arena)?;
		debug!("Parented {:?} to {:?}", id, parent);

		self.propagate(node_id);
		Ok(())
	}

	/// Makes the node a root again. Unknown ids are ignored.
	pub fn clear_parent(&mut self, id: &str) {
		let Some(node_id) = self.ids.get(id).copied() else {
			return;
		};

		node_id.detach(&mut self.arena);
		debug!("Cleared parent of {:?}", id);
		self.propagate(node_id);
	}
}

fn fmt_node<T>(depth: usize, f: &mut std::fmt::Formatter<'_>, node: &Node<T>) -> std::fmt::Result {
	let id = &node.id;
	#[cfg(feature = "owo")]
	let id = {
		use owo_colors::OwoColorize;
		id.magenta()
	};

	let offset = &node.trans_offset;
	write!(
		f,
		"{:indent$}- {} ({}, {}) {}° x{}",
		"",
		id,
		offset.translation.x,
		offset.translation.y,
		offset.rotation,
		offset.scale,
		indent = depth * 2
	)?;
	if node.is_bound() {
		write!(f, " [bound]")?;
	}
	writeln!(f)
}

/// Prints the subtree under `root`, one line per node, without recursing.
fn fmt_tree<T>(f: &mut std::fmt::Formatter<'_>, root: NodeId, arena: &Arena<Node<T>>) -> std::fmt::Result {
	let mut depth = 0;
	for edge in root.traverse(arena) {
		match edge {
			NodeEdge::Start(node_id) => {
				if let Some(node) = arena.get(node_id) {
					fmt_node(depth, f, node.get())?;
				}
				depth += 1;
			}
			NodeEdge::End(_) => depth -= 1,
		}
	}
	Ok(())
}

impl<T> Display for NodeRegistry<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		if self.is_empty() {
			return write!(f, "(empty)");
		}

		let roots = self
			.arena
			.iter()
			.filter(|node| node.parent().is_none())
			.filter_map(|node| self.arena.get_node_id(node));
		for root in roots {
			fmt_tree(f, root, &self.arena)?;
		}

		Ok(())
	}
}
