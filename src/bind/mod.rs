//! Bind-parameter construction for ora-bind.
//!
//! Converts the parameter descriptors entered on the node into the bind map
//! handed to the driver. Descriptors flagged for IN-list expansion are split
//! into several generated placeholders and the SQL template is rewritten to
//! reference them.

mod suffix;

pub use suffix::{SequentialSuffix, SuffixGenerator, UuidSuffix};

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;
use tracing::debug;

/// Declared type of a parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    #[default]
    String,
    Number,
}

impl DataType {
    /// Coerces a raw user-entered value to this type.
    ///
    /// Numeric coercion never fails: empty or unparseable input becomes `NaN`
    /// and is left for the driver to accept or reject.
    ///
    /// Parsing follows Rust's `f64` grammar, not JavaScript's `Number()`:
    /// `"inf"` and `"infinity"` become infinite rather than `NaN`, and hex
    /// literals like `"0x10"` become `NaN` rather than 16.
    pub fn coerce(&self, raw: &str) -> BindValue {
        match self {
            Self::String => BindValue::Text(raw.to_string()),
            Self::Number => BindValue::Number(parse_number(raw)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn parse_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// A single parameter as entered on the node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    /// Placeholder identifier without the leading colon.
    pub name: String,

    /// Raw value, comma-separated when `expand_as_list` is set.
    #[serde(default, deserialize_with = "deserialize_raw_value")]
    pub value: String,

    /// Type the value is coerced to before binding.
    #[serde(default)]
    pub datatype: DataType,

    /// Expand the value into a parenthesized list of placeholders for `IN (...)`.
    #[serde(default, rename = "parseInStatement", alias = "expandAsList")]
    pub expand_as_list: bool,
}

impl ParameterDescriptor {
    /// Creates a scalar descriptor.
    pub fn new(name: impl Into<String>, value: impl Into<String>, datatype: DataType) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            datatype,
            expand_as_list: false,
        }
    }

    /// Creates a descriptor that expands into an IN-list.
    pub fn list(name: impl Into<String>, value: impl Into<String>, datatype: DataType) -> Self {
        Self {
            expand_as_list: true,
            ..Self::new(name, value, datatype)
        }
    }
}

/// Definition files may write values as strings, numbers, or booleans.
fn deserialize_raw_value<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawValue {
        Text(String),
        Int(i64),
        Float(f64),
        Bool(bool),
    }

    Ok(match RawValue::deserialize(deserializer)? {
        RawValue::Text(s) => s,
        RawValue::Int(i) => i.to_string(),
        RawValue::Float(f) => f.to_string(),
        RawValue::Bool(b) => b.to_string(),
    })
}

/// A typed value ready to be bound.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BindValue {
    Text(String),
    Number(f64),
}

impl BindValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for BindValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "'{s}'"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// One bind-map entry: declared type plus coerced value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BindParameter {
    #[serde(rename = "type")]
    pub data_type: DataType,
    #[serde(rename = "val")]
    pub value: BindValue,
}

impl BindParameter {
    pub fn new(data_type: DataType, value: BindValue) -> Self {
        Self { data_type, value }
    }
}

/// Placeholder identifier (no colon) to bind parameter.
pub type BindMap = BTreeMap<String, BindParameter>;

/// Final SQL text and bind map produced by the binder.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BoundQuery {
    pub sql: String,
    pub binds: BindMap,
}

impl BoundQuery {
    /// Returns the `:identifier` placeholders found in the SQL text, in order
    /// of first appearance.
    ///
    /// This is a textual scan; it does not skip string literals or comments.
    pub fn placeholder_names(&self) -> Vec<String> {
        static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
        let re = PLACEHOLDER.get_or_init(|| {
            Regex::new(r":([A-Za-z_][A-Za-z0-9_$#]*)").expect("placeholder pattern is valid")
        });

        let mut names: Vec<String> = Vec::new();
        for cap in re.captures_iter(&self.sql) {
            let name = &cap[1];
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        names
    }

    /// Renders the SQL and binds for logs and dry runs.
    pub fn describe(&self) -> String {
        let mut out = self.sql.clone();
        for (name, param) in &self.binds {
            out.push_str(&format!("\n  :{name} = {} ({})", param.value, param.data_type));
        }
        out
    }
}

/// Replaces every `:name` occurrence in `sql` with `replacement`.
///
/// Matching is purely textual, so `:id` also matches the start of `:id2`.
pub fn replace_placeholder(sql: &str, name: &str, replacement: &str) -> String {
    sql.replace(&format!(":{name}"), replacement)
}

/// Builds bind maps, drawing list-expansion suffixes from `G`.
#[derive(Debug, Clone, Default)]
pub struct Binder<G = UuidSuffix> {
    generator: G,
}

impl Binder<UuidSuffix> {
    pub fn new() -> Self {
        Self {
            generator: UuidSuffix,
        }
    }
}

impl<G: SuffixGenerator> Binder<G> {
    pub fn with_generator(generator: G) -> Self {
        Self { generator }
    }

    /// Binds `descriptors` against `query`, processing them in order.
    ///
    /// Duplicate names are not detected; a later descriptor overwrites an
    /// earlier entry with the same key.
    pub fn bind(&mut self, query: &str, descriptors: &[ParameterDescriptor]) -> BoundQuery {
        let mut sql = query.to_string();
        let mut binds = BindMap::new();

        for descriptor in descriptors {
            if descriptor.expand_as_list {
                sql = self.expand_list(&sql, &mut binds, descriptor);
            } else {
                binds.insert(
                    descriptor.name.clone(),
                    BindParameter::new(
                        descriptor.datatype,
                        descriptor.datatype.coerce(&descriptor.value),
                    ),
                );
            }
        }

        debug!(
            "Bound {} descriptor(s) into {} bind parameter(s)",
            descriptors.len(),
            binds.len()
        );

        BoundQuery { sql, binds }
    }

    fn expand_list(
        &mut self,
        sql: &str,
        binds: &mut BindMap,
        descriptor: &ParameterDescriptor,
    ) -> String {
        // "" splits into one empty piece, giving a single-element list.
        let placeholders: Vec<String> = descriptor
            .value
            .split(',')
            .map(|piece| {
                let name = format!("{}{}", descriptor.name, self.generator.next_suffix());
                binds.insert(
                    name.clone(),
                    BindParameter::new(descriptor.datatype, descriptor.datatype.coerce(piece.trim())),
                );
                format!(":{name}")
            })
            .collect();

        debug!(
            "Expanded :{} into {} placeholder(s)",
            descriptor.name,
            placeholders.len()
        );

        let list = format!("({})", placeholders.join(","));
        replace_placeholder(sql, &descriptor.name, &list)
    }
}

/// Binds `descriptors` against `query` using random UUID suffixes.
pub fn bind_parameters(query: &str, descriptors: &[ParameterDescriptor]) -> BoundQuery {
    Binder::new().bind(query, descriptors)
}
