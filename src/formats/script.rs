use json::JsonValue;
use tracing::{debug, info};

use crate::command::{Command, Component, Query, Reply};
use crate::config::{ConfigError, RegistryConfig};
use crate::registry::{HierarchyError, NodeRegistry};
use crate::target::Target;

use super::json::{JsonError, JsonObject};

pub type ScriptParseResult<T> = Result<T, ScriptParseError>;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ScriptParseError {
	#[error(transparent)]
	JsonError(#[from] JsonError),
	#[error("Invalid config\n  - {0}")]
	Config(#[from] ConfigError),
	#[error("Unknown opcode {op:?} at step {index}")]
	UnknownOpcode { index: usize, op: String },
}

impl ScriptParseError {
	pub fn nested(self, key: &str) -> Self {
		match self {
			ScriptParseError::JsonError(err) => ScriptParseError::JsonError(err.nested(key)),
			_ => self,
		}
	}
}

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
	#[error(transparent)]
	Parse(#[from] ScriptParseError),
	#[error("Step {step} failed\n  - {source}")]
	Hierarchy {
		step: usize,
		#[source]
		source: HierarchyError,
	},
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step<T> {
	Command(Command<T>),
	Query(Query),
}

/// A registry configuration followed by host commands and queries, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Script<T> {
	pub config: RegistryConfig,
	pub steps: Vec<Step<T>>,
}

#[derive(Debug)]
pub struct ScriptOutput<T> {
	pub registry: NodeRegistry<T>,
	/// Every query of the script with its reply, in order.
	pub replies: Vec<(Query, Reply)>,
}

fn vals<T>(key: &str, res: ScriptParseResult<T>) -> ScriptParseResult<T> {
	res.map_err(|e| e.nested(key))
}

/// `(relative, component)` for the transform reporters.
fn component_opcode(opcode: &str) -> Option<(bool, Component)> {
	Some(match opcode {
		"getRelativeX" => (true, Component::X),
		"getRelativeY" => (true, Component::Y),
		"getRelativeRotation" => (true, Component::Rotation),
		"getRelativeScale" => (true, Component::Scale),
		"getEffectiveX" => (false, Component::X),
		"getEffectiveY" => (false, Component::Y),
		"getEffectiveRotation" => (false, Component::Rotation),
		"getEffectiveScale" => (false, Component::Scale),
		_ => return None,
	})
}

fn deserialize_step<T: Default>(index: usize, val: &JsonValue) -> ScriptParseResult<Step<T>> {
	let obj = JsonObject::try_from_value(&index.to_string(), val)?;
	let op = obj.get_str("op")?;

	let step = match op {
		"assignNode" => Step::Command(Command::AssignNode {
			id: obj.get_id("id")?,
			target: T::default(),
		}),
		"setPosition" => Step::Command(Command::SetPosition {
			id: obj.get_id("id")?,
			x: obj.get_f64("x")?,
			y: obj.get_f64("y")?,
		}),
		"setRotation" => Step::Command(Command::SetRotation {
			id: obj.get_id("id")?,
			degrees: obj.get_f64("rotation")?,
		}),
		"setScale" => Step::Command(Command::SetScale {
			id: obj.get_id("id")?,
			scale: obj.get_f64("scale")?,
		}),
		"setParent" => Step::Command(Command::SetParent {
			id: obj.get_id("id")?,
			parent: obj.get_id("parent")?,
		}),
		"clearParent" => Step::Command(Command::ClearParent { id: obj.get_id("id")? }),
		"clearAllNodes" => Step::Command(Command::ClearAll),
		"getParent" => Step::Query(Query::Parent { id: obj.get_id("id")? }),
		"getChildren" => Step::Query(Query::Children { id: obj.get_id("id")? }),
		_ => {
			let Some((relative, component)) = component_opcode(op) else {
				return Err(ScriptParseError::UnknownOpcode {
					index,
					op: op.to_owned(),
				});
			};
			let id = obj.get_id("id")?;
			Step::Query(if relative {
				Query::Relative { id, component }
			} else {
				Query::Effective { id, component }
			})
		}
	};

	Ok(step)
}

/// Parses a scene script. `assignNode` steps bind a default-constructed target.
pub fn parse_script<T: Default>(text: &str) -> ScriptParseResult<Script<T>> {
	let value = json::parse(text).map_err(|e| JsonError::Syntax(e.to_string()))?;
	let obj = JsonObject::try_from_value("(root)", &value)?;

	let config = match obj.get_nullable_object("config")? {
		Some(config) => vals("config", RegistryConfig::from_json(config).map_err(ScriptParseError::from))?,
		None => RegistryConfig::default(),
	};

	let steps = obj
		.get_list("script")?
		.iter()
		.enumerate()
		.map(|(index, val)| {
			deserialize_step(index, val).map_err(|e| match e {
				ScriptParseError::JsonError(err) => ScriptParseError::JsonError(err.in_list(index)),
				other => other,
			})
		})
		.collect::<ScriptParseResult<Vec<_>>>()
		.map_err(|e| e.nested("script"))?;

	debug!("Parsed script of {} steps", steps.len());
	Ok(Script { config, steps })
}

impl<T: Target> Script<T> {
	/// Runs every step against a fresh registry. Stops at the first refused parent link.
	pub fn run(self) -> Result<ScriptOutput<T>, ScriptError> {
		let mut registry = NodeRegistry::new(self.config);
		let mut replies = Vec::new();

		for (step, item) in self.steps.into_iter().enumerate() {
			match item {
				Step::Command(command) => registry
					.apply(command)
					.map_err(|source| ScriptError::Hierarchy { step, source })?,
				Step::Query(query) => {
					let reply = registry.report(&query);
					replies.push((query, reply));
				}
			}
		}

		info!("Script done: {} nodes, {} replies", registry.len(), replies.len());
		Ok(ScriptOutput { registry, replies })
	}
}

/// Parses and runs a scene script in one go.
pub fn run_script<T: Target + Default>(text: &str) -> Result<ScriptOutput<T>, ScriptError> {
	Ok(parse_script(text)?.run()?)
}
