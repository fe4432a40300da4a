//! Family grouping: objects addressed by `(family, id)` with an explicit parent and children per family.
//!
//! Unlike [`NodeRegistry`](crate::registry::NodeRegistry) nothing is composed here. "Parent" is a label kept
//! consistent on every write, and transforms are absolute values supplied by the caller.

use std::collections::HashMap;
use std::fmt::Display;

use glam::DVec2;
use tracing::debug;

use crate::target::Target;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FamilyKey {
	pub family: String,
	pub id: String,
}

impl FamilyKey {
	pub fn new(family: impl Into<String>, id: impl Into<String>) -> Self {
		Self {
			family: family.into(),
			id: id.into(),
		}
	}
}

impl Display for FamilyKey {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}:{}", self.family, self.id)
	}
}

/// Absolute transform last set through [`FamilyRegistry::set_transform`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FamilyOffset {
	pub translation: DVec2,
	pub deg: f64,
}

#[derive(Debug)]
pub struct FamilyObject<T> {
	pub offset: FamilyOffset,
	target: Option<T>,
	/// creation order, used to pick an object by bare id
	seq: u64,
}

impl<T> FamilyObject<T> {
	pub fn target(&self) -> Option<&T> {
		self.target.as_ref()
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Family {
	pub parent: Option<FamilyKey>,
	pub children: Vec<FamilyKey>,
}

impl Family {
	fn detach(&mut self, key: &FamilyKey) {
		self.children.retain(|child| child != key);
		if self.parent.as_ref() == Some(key) {
			self.parent = None;
		}
	}
}

#[derive(Debug)]
pub struct FamilyRegistry<T> {
	objects: HashMap<FamilyKey, FamilyObject<T>>,
	families: HashMap<String, Family>,
	next_seq: u64,
}

impl<T> Default for FamilyRegistry<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> FamilyRegistry<T> {
	pub fn new() -> Self {
		Self {
			objects: HashMap::new(),
			families: HashMap::new(),
			next_seq: 0,
		}
	}

	/// Registers an object under `family` with an empty offset.
	///
	/// An object already stored under the same key is replaced. Family bookkeeping is not touched.
	pub fn create(&mut self, id: &str, family: &str, target: impl Into<Option<T>>) {
		let key = FamilyKey::new(family, id);
		debug!("Creating family object {}", key);

		let seq = self.next_seq;
		self.next_seq += 1;
		self.objects.insert(
			key,
			FamilyObject {
				offset: FamilyOffset::default(),
				target: target.into(),
				seq,
			},
		);
	}

	/// Key of the object `id`: the one under `family` if any, else the earliest created with that id.
	fn find_key(&self, id: &str, family: &str) -> Option<FamilyKey> {
		let preferred = FamilyKey::new(family, id);
		if self.objects.contains_key(&preferred) {
			return Some(preferred);
		}

		self.objects
			.iter()
			.filter(|(key, _)| key.id == id)
			.min_by_key(|(_, object)| object.seq)
			.map(|(key, _)| key.clone())
	}

	/// Re-keys the object under `new_family`, dropping it from every list of its previous family.
	fn relocate(&mut self, old_key: &FamilyKey, new_family: &str) -> Option<FamilyKey> {
		let object = self.objects.remove(old_key)?;
		if let Some(old_family) = self.families.get_mut(&old_key.family) {
			old_family.detach(old_key);
		}

		let new_key = FamilyKey::new(new_family, old_key.id.as_str());
		self.objects.insert(new_key.clone(), object);
		Some(new_key)
	}

	/// Moves object `id` into `family` and makes it that family's parent. Returns false for unknown ids.
	pub fn promote_to_parent(&mut self, id: &str, family: &str) -> bool {
		let Some(old_key) = self.find_key(id, family) else {
			return false;
		};
		let Some(new_key) = self.relocate(&old_key, family) else {
			return false;
		};

		debug!("{} is now the parent of family {:?}", new_key, family);
		let family = self.families.entry(family.to_owned()).or_default();
		family.children.retain(|child| *child != new_key);
		family.parent = Some(new_key);
		true
	}

	/// Moves object `id` from `old_family` to the children of `new_family`. Returns false if it was not in `old_family`.
	///
	/// The object is listed once at most, and not at all if it already is the new family's parent.
	pub fn move_to_family(&mut self, id: &str, old_family: &str, new_family: &str) -> bool {
		let old_key = FamilyKey::new(old_family, id);
		let Some(new_key) = self.relocate(&old_key, new_family) else {
			return false;
		};

		debug!("Moved {} to {}", old_key, new_key);
		let family = self.families.entry(new_family.to_owned()).or_default();
		if family.parent.as_ref() != Some(&new_key) && !family.children.contains(&new_key) {
			family.children.push(new_key);
		}
		true
	}

	pub fn family(&self, family: &str) -> Option<&Family> {
		self.families.get(family)
	}

	pub fn object(&self, id: &str, family: &str) -> Option<&FamilyObject<T>> {
		self.objects.get(&FamilyKey::new(family, id))
	}

	/// Ids of the family's children, in the order they joined.
	pub fn children_of(&self, family: &str) -> Vec<&str> {
		self.families
			.get(family)
			.map(|family| family.children.iter().map(|key| key.id.as_str()).collect())
			.unwrap_or_default()
	}

	pub fn parent_of(&self, family: &str) -> Option<&str> {
		Some(self.families.get(family)?.parent.as_ref()?.id.as_str())
	}

	pub fn object_id(&self, id: &str, family: &str) -> Option<&str> {
		self.objects
			.get_key_value(&FamilyKey::new(family, id))
			.map(|(key, _)| key.id.as_str())
	}

	pub fn offset_of(&self, id: &str, family: &str) -> Option<FamilyOffset> {
		Some(self.object(id, family)?.offset)
	}

	pub fn clear_all(&mut self) {
		debug!("Clearing {} family objects", self.objects.len());
		self.objects.clear();
		self.families.clear();
	}
}

impl<T: Target> FamilyRegistry<T> {
	/// Pushes an absolute transform to the object's target and records it as its offset.
	///
	/// Nothing happens if the object is unknown or has no target.
	pub fn set_transform(&mut self, id: &str, family: &str, x: f64, y: f64, deg: f64) {
		let Some(object) = self.objects.get_mut(&FamilyKey::new(family, id)) else {
			return;
		};
		let Some(target) = object.target.as_mut() else {
			return;
		};

		target.set_position(x, y);
		target.set_orientation(deg);
		object.offset = FamilyOffset {
			translation: DVec2::new(x, y),
			deg,
		};
	}

	fn live_target(&self, id: &str, family: &str) -> Option<&T> {
		self.object(id, family)?.target()
	}

	/// Live x of the object's target, 0 if there is none.
	pub fn x_of(&self, id: &str, family: &str) -> f64 {
		self.live_target(id, family)
			.and_then(Target::position)
			.map_or(0., |pos| pos.x)
	}

	pub fn y_of(&self, id: &str, family: &str) -> f64 {
		self.live_target(id, family)
			.and_then(Target::position)
			.map_or(0., |pos| pos.y)
	}

	pub fn deg_of(&self, id: &str, family: &str) -> f64 {
		self.live_target(id, family).and_then(Target::orientation).unwrap_or(0.)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::target::Sprite;

	fn registry() -> FamilyRegistry<Sprite> {
		let mut registry = FamilyRegistry::new();
		registry.create("1", "none", Sprite::default());
		registry.create("2", "none", Sprite::default());
		registry.create("3", "none", Sprite::default());
		registry
	}

	#[test]
	fn move_is_idempotent() {
		let mut registry = registry();

		assert!(registry.move_to_family("1", "none", "f1"));
		assert!(!registry.move_to_family("1", "none", "f1"));
		assert!(registry.move_to_family("1", "f1", "f1"));

		assert_eq!(registry.children_of("f1"), ["1"]);
		assert!(registry.object("1", "none").is_none());
		assert!(registry.object("1", "f1").is_some());
	}

	#[test]
	fn move_between_families_keeps_each_listing_unique() {
		let mut registry = registry();
		registry.move_to_family("1", "none", "f1");
		registry.move_to_family("2", "none", "f1");
		registry.move_to_family("3", "none", "f1");

		registry.move_to_family("2", "f1", "f2");
		registry.move_to_family("2", "f2", "f2");

		assert_eq!(registry.children_of("f1"), ["1", "3"]);
		assert_eq!(registry.children_of("f2"), ["2"]);
	}

	#[test]
	fn moving_the_parent_out_clears_it() {
		let mut registry = registry();
		registry.move_to_family("2", "none", "f1");
		assert!(registry.promote_to_parent("1", "f1"));
		assert_eq!(registry.parent_of("f1"), Some("1"));

		registry.move_to_family("1", "f1", "f2");

		assert_eq!(registry.parent_of("f1"), None);
		assert_eq!(registry.children_of("f1"), ["2"]);
		assert_eq!(registry.children_of("f2"), ["1"]);
	}

	#[test]
	fn promoting_a_child_removes_it_from_children() {
		let mut registry = registry();
		registry.move_to_family("1", "none", "f1");
		registry.move_to_family("2", "none", "f1");

		assert!(registry.promote_to_parent("2", "f1"));
		assert_eq!(registry.parent_of("f1"), Some("2"));
		assert_eq!(registry.children_of("f1"), ["1"]);

		// moving within its own family demotes the parent to a child
		registry.move_to_family("2", "f1", "f1");
		assert_eq!(registry.children_of("f1"), ["1", "2"]);
		assert_eq!(registry.parent_of("f1"), None);
	}

	#[test]
	fn promote_finds_object_by_id_and_moves_it() {
		let mut registry = registry();
		registry.move_to_family("3", "none", "f1");

		assert!(registry.promote_to_parent("3", "f2"));
		assert!(!registry.promote_to_parent("404", "f2"));

		assert!(registry.object("3", "f1").is_none());
		assert!(registry.children_of("f1").is_empty());
		assert_eq!(registry.parent_of("f2"), Some("3"));
		assert_eq!(registry.object_id("3", "f2"), Some("3"));
		assert_eq!(registry.object_id("3", "f1"), None);
	}

	#[test]
	fn transforms_are_absolute_and_read_live() {
		let mut registry = registry();
		registry.create("ghost", "none", None);
		registry.promote_to_parent("1", "f1");
		registry.move_to_family("2", "none", "f1");

		registry.set_transform("1", "f1", 100., 50., 90.);
		registry.set_transform("2", "f1", 3., 4., 10.);
		registry.set_transform("ghost", "none", 1., 1., 1.);

		assert_eq!(registry.x_of("2", "f1"), 3.);
		assert_eq!(registry.y_of("2", "f1"), 4.);
		assert_eq!(registry.deg_of("2", "f1"), 10.);
		assert_eq!(registry.x_of("1", "f1"), 100.);
		assert_eq!(
			registry.offset_of("2", "f1"),
			Some(FamilyOffset {
				translation: DVec2::new(3., 4.),
				deg: 10.
			})
		);

		assert_eq!(registry.offset_of("ghost", "none"), Some(FamilyOffset::default()));
		assert_eq!(registry.x_of("ghost", "none"), 0.);
		assert_eq!(registry.deg_of("missing", "none"), 0.);
	}

	#[test]
	fn clear_all() {
		let mut registry = registry();
		registry.promote_to_parent("1", "f1");

		registry.clear_all();

		assert!(registry.family("f1").is_none());
		assert!(registry.object("2", "none").is_none());
		assert_eq!(FamilyKey::new("f1", "1").to_string(), "f1:1");
	}
}
