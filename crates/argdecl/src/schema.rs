//! JSON-described option sets.
//!
//! Schema options are string typed: scalars hold a `String`, vectors a
//! `Vec<String>`. Defaults are taken literally, without unquoting.
//!
//! ```json
//! {
//!   "policy": "reject-undeclared",
//!   "options": [
//!     { "key": "--verbose", "alias": "-v", "kind": "switch" },
//!     { "key": "--name", "kind": "scalar", "default": "anon" },
//!     { "key": "--tags", "kind": "vector", "min-items": 1, "max-items": 3 }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::cell::Quantifier;
use crate::decl::{OptionDef, scalar, switch, vector};
use crate::error::{Error, Result};
use crate::registry::{ParsingPolicy, Registry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptionKind {
    Switch,
    Scalar,
    Vector,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    One(String),
    Many(Vec<String>),
}

impl DefaultValue {
    fn into_items(self) -> Vec<String> {
        match self {
            Self::One(value) => vec![value],
            Self::Many(values) => values,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OptionSchema {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub kind: OptionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RegistrySchema {
    #[serde(default)]
    pub policy: ParsingPolicy,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionSchema>,
}

impl RegistrySchema {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn into_registry(self) -> Result<Registry<'static>> {
        let defs = self
            .options
            .into_iter()
            .map(OptionSchema::into_def)
            .collect::<Result<Vec<_>>>()?;
        Registry::new(defs, self.policy)
    }
}

macro_rules! with_attributes {
    ($def:expr, $alias:expr, $description:expr) => {{
        let mut def = $def;
        if let Some(alias) = $alias {
            def = def.alias(alias);
        }
        if let Some(description) = $description {
            def = def.description(description);
        }
        def
    }};
}

impl OptionSchema {
    fn into_def(self) -> Result<OptionDef<'static>> {
        let has_bounds = self.min_items.is_some() || self.max_items.is_some();
        let def: OptionDef<'static> = match self.kind {
            OptionKind::Switch => {
                if self.default.is_some() || has_bounds {
                    return Err(Error::Schema(format!(
                        "switch '{}' takes no default or item bounds",
                        self.key
                    )));
                }
                with_attributes!(switch(self.key), self.alias, self.description).into()
            }
            OptionKind::Scalar => {
                if has_bounds {
                    return Err(Error::Schema(format!(
                        "scalar '{}' takes no item bounds",
                        self.key
                    )));
                }
                let value = match self.default {
                    None => String::new(),
                    Some(DefaultValue::One(value)) => value,
                    Some(DefaultValue::Many(_)) => {
                        return Err(Error::Schema(format!(
                            "scalar '{}' needs a single default value",
                            self.key
                        )));
                    }
                };
                with_attributes!(scalar(self.key, value), self.alias, self.description).into()
            }
            OptionKind::Vector => {
                let items = self.default.map(DefaultValue::into_items).unwrap_or_default();
                let quantifier = Quantifier::new(
                    self.min_items.unwrap_or(0),
                    self.max_items.unwrap_or(Quantifier::UNBOUNDED),
                );
                let def = vector(self.key, items).bounds(quantifier);
                with_attributes!(def, self.alias, self.description).into()
            }
        };
        Ok(def)
    }
}
