//! Static node metadata as presented to the host.

use serde::Serialize;

/// Name of the credential type the node asks the host for.
pub const CREDENTIALS_NAME: &str = "oracleCredentials";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescription {
    pub display_name: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub group: Vec<&'static str>,
    pub version: u32,
    pub description: &'static str,
    pub defaults: NodeDefaults,
    pub inputs: Vec<&'static str>,
    pub outputs: Vec<&'static str>,
    pub credentials: Vec<CredentialRequirement>,
    pub properties: Vec<Property>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeDefaults {
    pub name: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CredentialRequirement {
    pub name: &'static str,
    pub required: bool,
}

/// A configurable field on the node.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub display_name: &'static str,
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: PropertyKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_options: Option<TypeOptions>,
    pub default: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<PropertyOption>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyKind {
    String,
    Options,
    FixedCollection,
}

/// Editor hints for a property.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub always_open_edit_window: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_values: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_value_button_text: Option<&'static str>,
}

/// An entry of an `options` property, or a named group of fields inside a
/// fixed collection.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PropertyOption {
    Value {
        name: &'static str,
        value: serde_json::Value,
    },
    #[serde(rename_all = "camelCase")]
    Group {
        display_name: &'static str,
        name: &'static str,
        values: Vec<Property>,
    },
}

impl PropertyOption {
    fn value(name: &'static str, value: impl Into<serde_json::Value>) -> Self {
        Self::Value {
            name,
            value: value.into(),
        }
    }
}

impl Property {
    fn string(display_name: &'static str, name: &'static str) -> Self {
        Self {
            display_name,
            name,
            kind: PropertyKind::String,
            type_options: None,
            default: serde_json::Value::from(""),
            placeholder: None,
            hint: None,
            description: None,
            required: true,
            options: Vec::new(),
        }
    }

    fn options(
        display_name: &'static str,
        name: &'static str,
        default: impl Into<serde_json::Value>,
        options: Vec<PropertyOption>,
    ) -> Self {
        Self {
            kind: PropertyKind::Options,
            default: default.into(),
            options,
            ..Self::string(display_name, name)
        }
    }
}

impl NodeDescription {
    /// The node as registered with the host.
    pub fn oracle_database() -> Self {
        let query = Property {
            type_options: Some(TypeOptions {
                always_open_edit_window: Some(true),
                ..TypeOptions::default()
            }),
            placeholder: Some("SELECT id, name FROM product WHERE id < :param_name"),
            description: Some("The SQL query to execute. Use :param_name for parameters."),
            ..Property::string("SQL Statement", "query")
        };

        let name = Property {
            placeholder: Some("e.g. param_name"),
            hint: Some("Parameter name (do not include \":\")"),
            ..Property::string("Name", "name")
        };

        let value = Property {
            placeholder: Some("Example: 12345"),
            ..Property::string("Value", "value")
        };

        let datatype = Property::options(
            "Data Type",
            "datatype",
            "string",
            vec![
                PropertyOption::value("String", "string"),
                PropertyOption::value("Number", "number"),
            ],
        );

        let parse_in_statement = Property {
            hint: Some(
                "If \"Yes\", the \"Value\" field should be comma-separated values (e.g., 1,2,3 or str1,str2,str3)",
            ),
            ..Property::options(
                "Parse for IN statement",
                "parseInStatement",
                false,
                vec![
                    PropertyOption::value("No", false),
                    PropertyOption::value("Yes", true),
                ],
            )
        };

        let params = Property {
            kind: PropertyKind::FixedCollection,
            type_options: Some(TypeOptions {
                multiple_value_button_text: Some("Add another Parameter"),
                multiple_values: Some(true),
                ..TypeOptions::default()
            }),
            default: serde_json::json!({}),
            placeholder: Some("Add Parameter"),
            description: Some("Parameters for the SQL query"),
            required: false,
            options: vec![PropertyOption::Group {
                display_name: "Values",
                name: "values",
                values: vec![name, value, datatype, parse_in_statement],
            }],
            ..Property::string("Parameters", "params")
        };

        Self {
            display_name: "Oracle Database with Parameterization",
            name: "Oracle Database with Parameterization",
            icon: "file:oracle.svg",
            group: vec!["input"],
            version: 1,
            description: "Execute SQL queries on Oracle database with parameter support - embedded thin client",
            defaults: NodeDefaults {
                name: "Oracle Database",
            },
            inputs: vec!["main"],
            outputs: vec!["main"],
            credentials: vec![CredentialRequirement {
                name: CREDENTIALS_NAME,
                required: true,
            }],
            properties: vec![query, params],
        }
    }
}
