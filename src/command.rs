//! Command and reporter surface offered to a host.
//!
//! Commands mutate the registry and push to bound targets, queries only read.

use std::fmt::Display;

use tracing::debug;

use crate::math::transform::Transform;
use crate::registry::{HierarchyError, NodeRegistry};
use crate::target::Target;

#[derive(Debug, Clone, PartialEq)]
pub enum Command<T> {
	AssignNode { id: String, target: T },
	SetPosition { id: String, x: f64, y: f64 },
	SetRotation { id: String, degrees: f64 },
	SetScale { id: String, scale: f64 },
	SetParent { id: String, parent: String },
	ClearParent { id: String },
	ClearAll,
}

impl<T> Command<T> {
	pub fn opcode(&self) -> &'static str {
		match self {
			Command::AssignNode { .. } => "assignNode",
			Command::SetPosition { .. } => "setPosition",
			Command::SetRotation { .. } => "setRotation",
			Command::SetScale { .. } => "setScale",
			Command::SetParent { .. } => "setParent",
			Command::ClearParent { .. } => "clearParent",
			Command::ClearAll => "clearAllNodes",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
	X,
	Y,
	Rotation,
	Scale,
}

impl Component {
	fn of(self, transform: &Transform) -> f64 {
		match self {
			Component::X => transform.x(),
			Component::Y => transform.y(),
			Component::Rotation => transform.rotation,
			Component::Scale => transform.scale,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
	Relative { id: String, component: Component },
	Effective { id: String, component: Component },
	Parent { id: String },
	Children { id: String },
}

impl Query {
	pub fn opcode(&self) -> &'static str {
		match self {
			Query::Relative { component, .. } => match component {
				Component::X => "getRelativeX",
				Component::Y => "getRelativeY",
				Component::Rotation => "getRelativeRotation",
				Component::Scale => "getRelativeScale",
			},
			Query::Effective { component, .. } => match component {
				Component::X => "getEffectiveX",
				Component::Y => "getEffectiveY",
				Component::Rotation => "getEffectiveRotation",
				Component::Scale => "getEffectiveScale",
			},
			Query::Parent { .. } => "getParent",
			Query::Children { .. } => "getChildren",
		}
	}
}

/// Value handed back to the host for a query.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
	Number(f64),
	Text(String),
	List(Vec<String>),
}

impl Display for Reply {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Reply::Number(n) => write!(f, "{n}"),
			Reply::Text(s) => write!(f, "{s}"),
			Reply::List(items) => write!(f, "{}", items.join(" ")),
		}
	}
}

impl<T: Target> NodeRegistry<T> {
	/// Runs one host command. Only re-parenting can fail.
	pub fn apply(&mut self, command: Command<T>) -> Result<(), HierarchyError> {
		debug!("Applying {}", command.opcode());
		match command {
			Command::AssignNode { id, target } => {
				self.bind(&id, target);
			}
			Command::SetPosition { id, x, y } => self.set_position(&id, x, y),
			Command::SetRotation { id, degrees } => self.set_rotation(&id, degrees),
			Command::SetScale { id, scale } => self.set_scale(&id, scale),
			Command::SetParent { id, parent } => self.set_parent(&id, &parent)?,
			Command::ClearParent { id } => self.clear_parent(&id),
			Command::ClearAll => self.clear_all(),
		}
		Ok(())
	}
}

impl<T> NodeRegistry<T> {
	/// Answers a host query. Unknown ids give the neutral value: 0, or 1 for scale, empty text or list.
	pub fn report(&self, query: &Query) -> Reply {
		match query {
			Query::Relative { id, component } => Reply::Number(component.of(&self.relative(id))),
			Query::Effective { id, component } => Reply::Number(component.of(&self.effective(id))),
			Query::Parent { id } => Reply::Text(self.parent_of(id).unwrap_or_default().to_owned()),
			Query::Children { id } => Reply::List(self.children_of(id).into_iter().map(str::to_owned).collect()),
		}
	}
}
