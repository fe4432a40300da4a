use crate::formats::json::{JsonError, JsonObject};
use crate::math::transform::DEFAULT_HEADING_OFFSET;

/// How a node's transform is derived from the hierarchy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompositionMode {
	/// Local values only. Parent links are kept as metadata.
	Relative,
	/// Local values composed through every ancestor.
	#[default]
	Effective,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
	#[error(transparent)]
	JsonError(#[from] JsonError),
	#[error("Unknown composition mode {0:?}")]
	UnknownMode(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegistryConfig {
	pub mode: CompositionMode,
	/// Degrees subtracted from a parent's rotation before it turns a child's translation.
	pub heading_offset: f64,
	/// Push the resolved scale to bound targets as a size multiplier.
	pub push_scale: bool,
}

impl Default for RegistryConfig {
	fn default() -> Self {
		Self::effective()
	}
}

impl RegistryConfig {
	pub fn effective() -> Self {
		Self {
			mode: CompositionMode::Effective,
			heading_offset: DEFAULT_HEADING_OFFSET,
			push_scale: true,
		}
	}

	pub fn relative() -> Self {
		Self {
			mode: CompositionMode::Relative,
			heading_offset: DEFAULT_HEADING_OFFSET,
			push_scale: false,
		}
	}

	pub fn with_heading_offset(mut self, heading_offset: f64) -> Self {
		self.heading_offset = heading_offset;
		self
	}

	pub fn with_push_scale(mut self, push_scale: bool) -> Self {
		self.push_scale = push_scale;
		self
	}

	/// Missing keys keep the defaults of the chosen mode.
	pub(crate) fn from_json(obj: JsonObject) -> Result<Self, ConfigError> {
		let mut config = match obj.get_nullable_str("mode")? {
			None | Some("effective") => Self::effective(),
			Some("relative") => Self::relative(),
			Some(other) => return Err(ConfigError::UnknownMode(other.to_owned())),
		};

		if let Some(heading_offset) = obj.get_nullable_f64("headingOffset")? {
			config.heading_offset = heading_offset;
		}
		if let Some(push_scale) = obj.get_nullable_bool("pushScale")? {
			config.push_scale = push_scale;
		}

		Ok(config)
	}

	pub fn parse(text: &str) -> Result<Self, ConfigError> {
		let value = json::parse(text).map_err(|e| JsonError::Syntax(e.to_string()))?;
		let obj = JsonObject::try_from_value("config", &value)?;
		Self::from_json(obj)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_object_is_default() {
		assert_eq!(RegistryConfig::parse("{}").unwrap(), RegistryConfig::default());
	}

	#[test]
	fn relative_mode_with_overrides() {
		let config = RegistryConfig::parse(r#"{"mode": "relative", "headingOffset": 0, "pushScale": true}"#).unwrap();

		assert_eq!(config.mode, CompositionMode::Relative);
		assert_eq!(config.heading_offset, 0.);
		assert!(config.push_scale);
	}

	#[test]
	fn bad_values_are_reported() {
		assert!(matches!(
			RegistryConfig::parse(r#"{"mode": "sideways"}"#),
			Err(ConfigError::UnknownMode(mode)) if mode == "sideways"
		));
		assert!(matches!(
			RegistryConfig::parse(r#"{"pushScale": 3}"#),
			Err(ConfigError::JsonError(JsonError::ValueIsNotBool(key))) if key == "pushScale"
		));
		assert!(matches!(
			RegistryConfig::parse("[1, 2]"),
			Err(ConfigError::JsonError(JsonError::ValueIsNotObject(_)))
		));
		assert!(matches!(
			RegistryConfig::parse("{"),
			Err(ConfigError::JsonError(JsonError::Syntax(_)))
		));
	}
}
