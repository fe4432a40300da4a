pub mod json;
pub mod script;

pub use self::json::JsonError;
pub use script::{parse_script, run_script, Script, ScriptError, ScriptOutput, ScriptParseError, Step};
