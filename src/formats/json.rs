//! Thin typed accessors over `json` values, reporting the key path on failure.

use json::JsonValue;

pub(crate) trait SerialExtend {
	fn as_object(&self) -> Option<&json::object::Object>;
}

impl SerialExtend for json::JsonValue {
	fn as_object(&self) -> Option<&json::object::Object> {
		if let json::JsonValue::Object(obj) = self {
			Some(obj)
		} else {
			None
		}
	}
}

pub type JsonResult<T> = Result<T, JsonError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum JsonError {
	#[error("Invalid JSON\n  - {0}")]
	Syntax(String),
	#[error("Key {0:?} does not exist")]
	KeyDoesNotExist(String),
	#[error("Value at {0:?} is not an object")]
	ValueIsNotObject(String),
	#[error("Value at {0:?} is not a list")]
	ValueIsNotList(String),
	#[error("Value at {0:?} is not a string")]
	ValueIsNotString(String),
	#[error("Value at {0:?} is not a number")]
	ValueIsNotNumber(String),
	#[error("Value at {0:?} is not a bool")]
	ValueIsNotBool(String),
	#[error("Error in list at index {index}\n  - {inner}")]
	ErrorInList { index: usize, inner: Box<JsonError> },
	#[error("Error in object at {key:?}\n  - {inner}")]
	ErrorInObject { key: String, inner: Box<JsonError> },
}

impl JsonError {
	pub fn nested(self, key: &str) -> Self {
		Self::ErrorInObject {
			key: key.to_owned(),
			inner: Box::new(self),
		}
	}

	pub fn in_list(self, index: usize) -> Self {
		Self::ErrorInList {
			index,
			inner: Box::new(self),
		}
	}
}

#[derive(Clone, Copy)]
pub struct JsonObject<'a>(pub &'a json::object::Object);

impl<'a> JsonObject<'a> {
	pub fn try_from_value(msg: &str, val: &'a JsonValue) -> JsonResult<Self> {
		match val.as_object() {
			Some(obj) => Ok(JsonObject(obj)),
			None => Err(JsonError::ValueIsNotObject(msg.to_owned())),
		}
	}

	fn get(&self, key: &str) -> JsonResult<&'a json::JsonValue> {
		match self.0.get(key) {
			Some(value) => Ok(value),
			None => Err(JsonError::KeyDoesNotExist(key.to_owned())),
		}
	}

	/// A missing key and an explicit `null` are both `None`.
	fn get_nullable(&self, key: &str) -> Option<&'a json::JsonValue> {
		self.0.get(key).filter(|val| !val.is_null())
	}

	pub fn get_nullable_object(&self, key: &str) -> JsonResult<Option<JsonObject<'a>>> {
		self.get_nullable(key)
			.map(|val| Self::try_from_value(key, val))
			.transpose()
	}

	pub fn get_list(&self, key: &str) -> JsonResult<&'a [JsonValue]> {
		match self.get(key)? {
			json::JsonValue::Array(arr) => Ok(arr),
			_ => Err(JsonError::ValueIsNotList(key.to_owned())),
		}
	}

	pub fn get_str(&self, key: &str) -> JsonResult<&'a str> {
		match self.get(key)?.as_str() {
			Some(val) => Ok(val),
			None => Err(JsonError::ValueIsNotString(key.to_owned())),
		}
	}

	pub fn get_nullable_str(&self, key: &str) -> JsonResult<Option<&'a str>> {
		match self.get_nullable(key) {
			None => Ok(None),
			Some(val) => match val.as_str() {
				Some(val) => Ok(Some(val)),
				None => Err(JsonError::ValueIsNotString(key.to_owned())),
			},
		}
	}

	/// Identifiers may be written as strings or numbers. Numbers are stringified.
	pub fn get_id(&self, key: &str) -> JsonResult<String> {
		let val = self.get(key)?;
		if let Some(s) = val.as_str() {
			return Ok(s.to_owned());
		}
		match val.as_number() {
			Some(num) => Ok(f64::from(num).to_string()),
			None => Err(JsonError::ValueIsNotString(key.to_owned())),
		}
	}

	/// Numbers may be written as numbers or numeric strings.
	pub fn get_f64(&self, key: &str) -> JsonResult<f64> {
		number_like(key, self.get(key)?)
	}

	pub fn get_nullable_f64(&self, key: &str) -> JsonResult<Option<f64>> {
		self.get_nullable(key).map(|val| number_like(key, val)).transpose()
	}

	pub fn get_nullable_bool(&self, key: &str) -> JsonResult<Option<bool>> {
		match self.get_nullable(key) {
			None => Ok(None),
			Some(val) => match val.as_bool() {
				Some(val) => Ok(Some(val)),
				None => Err(JsonError::ValueIsNotBool(key.to_owned())),
			},
		}
	}
}

fn number_like(key: &str, val: &JsonValue) -> JsonResult<f64> {
	if let Some(num) = val.as_number() {
		return Ok(num.into());
	}
	val.as_str()
		.and_then(|s| s.trim().parse::<f64>().ok())
		.ok_or_else(|| JsonError::ValueIsNotNumber(key.to_owned()))
}
