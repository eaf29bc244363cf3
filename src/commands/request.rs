//! Command requests, responses and option schemas.

use std::collections::BTreeMap;
use std::fmt;

use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};

/// Value of one command option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// Integer option.
    Integer(i64),
    /// Text option.
    Text(String),
}

impl OptionValue {
    /// Integer view, parsing text if needed.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }
}

/// Command-line values are kept verbatim; integer options parse them on read.
impl From<&str> for OptionValue {
    fn from(raw: &str) -> Self {
        Self::Text(raw.to_string())
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{}", value),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// An invocation of a command by a chat user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct CommandRequest {
    /// Invoking user.
    #[serde(alias = "discord_user_id")]
    user_id: i64,
    #[serde(default)]
    options: BTreeMap<String, OptionValue>,
}

impl CommandRequest {
    /// Adds an option.
    pub fn with_option(mut self, name: impl Into<String>, value: OptionValue) -> Self {
        self.options.insert(name.into(), value);
        self
    }

    /// Text of an option, integers rendered as text.
    pub fn text(&self, name: &str) -> Option<String> {
        self.options.get(name).map(ToString::to_string)
    }

    /// Integer value of an option.
    pub fn integer(&self, name: &str) -> Option<i64> {
        self.options.get(name).and_then(OptionValue::as_integer)
    }

    /// Integer option narrowed to `i32`.
    pub fn int32(&self, name: &str) -> Option<i32> {
        self.integer(name).and_then(|v| i32::try_from(v).ok())
    }
}

/// Reply to a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct CommandResponse {
    content: String,
    /// Only visible to the invoking user.
    ephemeral: bool,
}

/// Option type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    /// Free text.
    String,
    /// Integer, optionally bounded.
    Integer,
}

/// Schema of one command option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct OptionDescription {
    name: String,
    description: String,
    kind: OptionKind,
    required: bool,
    min: Option<i64>,
    max: Option<i64>,
}

impl OptionDescription {
    /// Text option.
    pub fn string(name: &str, description: &str, required: bool) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            kind: OptionKind::String,
            required,
            min: None,
            max: None,
        }
    }

    /// Integer option within `min..=max`.
    pub fn integer(name: &str, description: &str, required: bool, min: i64, max: i64) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            kind: OptionKind::Integer,
            required,
            min: Some(min),
            max: Some(max),
        }
    }

    /// Checks a supplied value, returning the reply for a bad one.
    pub fn check(&self, value: Option<&OptionValue>) -> Result<(), String> {
        let Some(value) = value else {
            return if self.required {
                Err(format!("Missing option `{}`", self.name))
            } else {
                Ok(())
            };
        };
        if self.kind == OptionKind::Integer {
            let number = value
                .as_integer()
                .ok_or_else(|| format!("Option `{}` must be an integer", self.name))?;
            let below = self.min.is_some_and(|min| number < min);
            let above = self.max.is_some_and(|max| number > max);
            if below || above {
                return Err(format!(
                    "Option `{}` must be between {} and {}",
                    self.name,
                    self.min.unwrap_or(i64::MIN),
                    self.max.unwrap_or(i64::MAX)
                ));
            }
        }
        Ok(())
    }
}

/// Public schema of a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct CommandDescription {
    name: String,
    description: String,
    options: Vec<OptionDescription>,
    /// Replies are only visible to the invoking user.
    ephemeral: bool,
}

impl CommandDescription {
    /// Checks a request against the option schema.
    ///
    /// # Errors
    ///
    /// Returns the reply text for the first missing, unknown or invalid option.
    pub fn check(&self, request: &CommandRequest) -> Result<(), String> {
        if let Some(unknown) = request
            .options()
            .keys()
            .find(|name| !self.options.iter().any(|o| &o.name == *name))
        {
            return Err(format!("Unknown option `{}`", unknown));
        }
        for option in &self.options {
            option.check(request.options().get(&option.name))?;
        }
        Ok(())
    }
}
