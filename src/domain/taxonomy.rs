//! Taxonomy normalization: nested JSON records into a uniform tree
//!
//! A taxonomy document is an object whose values are records. A record either
//! carries an explicit `children` object, or every entry that is not one of the
//! reserved keys (`id`, `name`, `details`) is treated as an implicit child.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument, trace};

use crate::domain::error::{DomainError, DomainResult};

/// Keys that carry node data and never become children.
pub const RESERVED_KEYS: [&str; 3] = ["id", "name", "details"];

/// Key holding an explicit children mapping.
pub const CHILDREN_KEY: &str = "children";

/// Display name of the synthetic hub node.
pub const DEFAULT_ROOT_NAME: &str = "Waal Bridge";

/// Uniform tree node produced by [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            details: None,
            children: Vec::new(),
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of leaves below (and including) this node.
    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.children.iter().map(TreeNode::leaf_count).sum()
        }
    }

    /// Number of levels in this subtree; a leaf has one level.
    pub fn levels(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(TreeNode::levels)
            .max()
            .unwrap_or(0)
    }

    /// Descend by child names, first match wins at every level.
    pub fn find(&self, path: &[&str]) -> Option<&TreeNode> {
        path.iter().try_fold(self, |node, segment| {
            node.children.iter().find(|c| c.name == *segment)
        })
    }
}

/// How a record contributes children, decided once per record.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeShape<'a> {
    /// Record has a `children` object; only its entries are children.
    Explicit(&'a Map<String, Value>),
    /// Every non-reserved entry of the record is a child.
    Implicit(Vec<(&'a String, &'a Value)>),
    /// Nothing qualifies as a child.
    Leaf,
}

impl<'a> NodeShape<'a> {
    /// Classify a record. `path` is only used for error reporting.
    pub fn of(record: &'a Map<String, Value>, path: &str) -> DomainResult<Self> {
        match record.get(CHILDREN_KEY) {
            Some(Value::Object(children)) => Ok(NodeShape::Explicit(children)),
            Some(other) => Err(malformed(&join_path(path, CHILDREN_KEY), other)),
            None => {
                let entries: Vec<_> = record.iter().filter(|(k, _)| !is_reserved(k)).collect();
                if entries.is_empty() {
                    Ok(NodeShape::Leaf)
                } else {
                    Ok(NodeShape::Implicit(entries))
                }
            }
        }
    }

    /// Child entries in document order.
    pub fn entries(&self) -> Vec<(&'a String, &'a Value)> {
        match self {
            NodeShape::Explicit(children) => children.iter().collect(),
            NodeShape::Implicit(entries) => entries.clone(),
            NodeShape::Leaf => Vec::new(),
        }
    }
}

pub fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// Normalize a taxonomy document into a tree under a synthetic hub node.
///
/// Every top-level key except the reserved ones becomes one child of the hub,
/// in document order. Records are normalized recursively via [`NodeShape`].
///
/// # Errors
///
/// Returns [`DomainError::Malformed`] when the document, any child entry, or a
/// `children` value is not an object. No partial tree is returned.
#[instrument(level = "debug", skip(raw))]
pub fn normalize(raw: &Value, root_name: &str) -> DomainResult<TreeNode> {
    let top = as_record(raw, "")?;
    let children = top
        .iter()
        .filter(|(key, _)| !is_reserved(key))
        .map(|(key, value)| normalize_entry(key, value, key))
        .collect::<DomainResult<Vec<_>>>()?;

    debug!("normalized {} top-level categories", children.len());
    Ok(TreeNode {
        name: root_name.to_string(),
        details: None,
        children,
    })
}

fn normalize_entry(key: &str, value: &Value, path: &str) -> DomainResult<TreeNode> {
    let record = as_record(value, path)?;
    let shape = NodeShape::of(record, path)?;
    trace!(path, ?shape, "record shape");

    let children = shape
        .entries()
        .into_iter()
        .map(|(k, v)| normalize_entry(k, v, &join_path(path, k)))
        .collect::<DomainResult<Vec<_>>>()?;

    // Record fields win over the key, like an object spread.
    let name = record
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or(key)
        .to_string();

    Ok(TreeNode {
        name,
        details: record_details(record),
        children,
    })
}

fn record_details(record: &Map<String, Value>) -> Option<String> {
    match record.get("details")? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn as_record<'a>(value: &'a Value, path: &str) -> DomainResult<&'a Map<String, Value>> {
    value.as_object().ok_or_else(|| malformed(path, value))
}

fn malformed(path: &str, found: &Value) -> DomainError {
    DomainError::Malformed {
        path: if path.is_empty() {
            "<document>".to_string()
        } else {
            path.to_string()
        },
        found: json_kind(found).to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn join_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}/{key}")
    }
}
