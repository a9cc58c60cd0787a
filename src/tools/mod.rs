//! Agent tool surface.
//!
//! Describes the index queries as callable tools (name, description and a
//! JSON-schema for the arguments) and dispatches JSON tool calls to a
//! [`SemanticIndex`]. Agent frameworks bind [`tool_definitions`] and route
//! every call through [`dispatch`] or [`call`].
//!
//! ```rust,ignore
//! let args = serde_json::json!({ "term": "net_sales" });
//! let hits = tools::dispatch(&index, "search", &args)?;
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::index::{QueryError, SearchFilter, SemanticIndex};
use crate::model::FieldKind;

pub const LIST_CUBES: &str = "list_cubes";
pub const GET_CUBE: &str = "get_cube";
pub const SEARCH: &str = "search";
pub const LIST_MEASURES: &str = "list_measures";
pub const LIST_DIMENSIONS: &str = "list_dimensions";

/// Errors returned by [`dispatch`].
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: '{0}'")]
    UnknownTool(String),

    #[error("Invalid arguments for '{tool}': {message}")]
    InvalidArguments { tool: String, message: String },

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("Failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A tool as advertised to the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    /// JSON schema of the arguments object
    pub parameters: Value,
}

#[derive(Debug, Deserialize)]
struct GetCubeArgs {
    #[serde(alias = "cube_name", alias = "name")]
    cube: String,
}

#[derive(Debug, Deserialize)]
struct SearchArgs {
    #[serde(alias = "query")]
    term: String,
    #[serde(default, alias = "cube_name")]
    cube: Option<String>,
    #[serde(default, alias = "item_type")]
    kind: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CubeFilterArgs {
    #[serde(default, alias = "cube_name")]
    cube: Option<String>,
}

/// Definitions of every tool, in a stable order.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: LIST_CUBES,
            description: "List all cubes (data marts) with their description and \
                          the number of measures and dimensions in each.",
            parameters: json!({ "type": "object", "properties": {} }),
        },
        ToolDefinition {
            name: GET_CUBE,
            description: "Get every measure and dimension of one cube. \
                          The cube name must match exactly.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "cube": { "type": "string", "description": "Exact cube name, e.g. Orders" }
                },
                "required": ["cube"]
            }),
        },
        ToolDefinition {
            name: SEARCH,
            description: "Search cube names, field names and descriptions for a term \
                          (case-insensitive substring match).",
            parameters: json!({
                "type": "object",
                "properties": {
                    "term": { "type": "string", "description": "Text to look for" },
                    "cube": { "type": "string", "description": "Only search this cube" },
                    "kind": {
                        "type": "string",
                        "enum": ["measure", "dimension"],
                        "description": "Only return fields of this kind"
                    }
                },
                "required": ["term"]
            }),
        },
        ToolDefinition {
            name: LIST_MEASURES,
            description: "List measures, optionally restricted to one cube.",
            parameters: cube_filter_schema(),
        },
        ToolDefinition {
            name: LIST_DIMENSIONS,
            description: "List dimensions, optionally restricted to one cube.",
            parameters: cube_filter_schema(),
        },
    ]
}

fn cube_filter_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "cube": { "type": "string", "description": "Exact cube name" }
        }
    })
}

/// Run a tool call and return its result as JSON.
pub fn dispatch(index: &SemanticIndex, tool: &str, args: &Value) -> Result<Value, ToolError> {
    tracing::debug!(tool, %args, "dispatching tool call");

    match tool {
        LIST_CUBES => Ok(serde_json::to_value(index.list_cubes()?)?),
        GET_CUBE => {
            let args: GetCubeArgs = parse_args(tool, args)?;
            Ok(serde_json::to_value(index.get_cube(&args.cube)?)?)
        }
        SEARCH => {
            let args: SearchArgs = parse_args(tool, args)?;
            let kind = args
                .kind
                .as_deref()
                .map(str::parse::<FieldKind>)
                .transpose()
                .map_err(|kind| ToolError::InvalidArguments {
                    tool: tool.to_string(),
                    message: format!("unknown kind '{}'", kind),
                })?;
            let filter = SearchFilter {
                cube: args.cube,
                kind,
            };
            Ok(serde_json::to_value(index.search_with(&args.term, &filter)?)?)
        }
        LIST_MEASURES => {
            let args: CubeFilterArgs = parse_optional_args(tool, args)?;
            Ok(serde_json::to_value(index.list_measures(args.cube.as_deref())?)?)
        }
        LIST_DIMENSIONS => {
            let args: CubeFilterArgs = parse_optional_args(tool, args)?;
            Ok(serde_json::to_value(index.list_dimensions(args.cube.as_deref())?)?)
        }
        other => Err(ToolError::UnknownTool(other.to_string())),
    }
}

/// Run a tool call and render the outcome as text for the model.
///
/// Successful results are pretty-printed JSON; failures become a short
/// sentence the model can act on instead of an error.
pub fn call(index: &SemanticIndex, tool: &str, args: &Value) -> String {
    match dispatch(index, tool, args) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|e| e.to_string()),
        Err(ToolError::Query(QueryError::NotFound { name })) => {
            format!("Cube '{}' not found.", name)
        }
        Err(e) => format!("Error: {}", e),
    }
}

fn parse_args<T: DeserializeOwned>(tool: &str, args: &Value) -> Result<T, ToolError> {
    T::deserialize(args).map_err(|e| ToolError::InvalidArguments {
        tool: tool.to_string(),
        message: e.to_string(),
    })
}

/// Like [`parse_args`], but a missing (`null`) arguments object means defaults.
fn parse_optional_args<T: DeserializeOwned + Default>(
    tool: &str,
    args: &Value,
) -> Result<T, ToolError> {
    match args {
        Value::Null => Ok(T::default()),
        _ => parse_args(tool, args),
    }
}
