use crate::foundation::core::Geometry;
use crate::foundation::error::{EcmlError, EcmlResult};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Key of the wrapper object used for JSON text blocks.
pub const CDATA_KEY: &str = "__cdata";

/// Attribute names with a fixed meaning at the ECML boundary.
pub const DOCUMENTED_FIELDS: [&str; 15] = [
    "id",
    "x",
    "y",
    "w",
    "h",
    "rotate",
    "visible",
    "editable",
    "data",
    "config",
    "event",
    "events",
    "param",
    "asset",
    "assetMedia",
];

/// `data`/`config` payload as it appears in ECML.
#[derive(Clone, Debug, PartialEq)]
pub enum EcmlBlock {
    /// JSON text wrapped as `{"__cdata": "<json>"}`.
    Text(String),
    /// Structured value used as-is.
    Value(Value),
}

impl EcmlBlock {
    /// Wrap a value as a JSON text block.
    pub fn text(value: &Value) -> Self {
        Self::Text(value.to_string())
    }

    /// Classify a raw ECML value. Only an object whose `__cdata` member is a non-empty string
    /// counts as a text block.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => match map.get(CDATA_KEY) {
                Some(Value::String(text)) if !text.is_empty() => Self::Text(text.clone()),
                _ => Self::Value(Value::Object(map)),
            },
            other => Self::Value(other),
        }
    }

    /// Decode the block. Text blocks are JSON-parsed; structured values are returned as-is.
    pub fn decode(&self) -> Result<Value, serde_json::Error> {
        match self {
            Self::Text(text) => serde_json::from_str(text),
            Self::Value(value) => Ok(value.clone()),
        }
    }
}

impl Serialize for EcmlBlock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(text) => {
                let mut map = Map::new();
                map.insert(CDATA_KEY.to_string(), Value::String(text.clone()));
                map.serialize(serializer)
            }
            Self::Value(value) => value.serialize(serializer),
        }
    }
}

/// A named runtime parameter in its ECML list form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EcmlParam {
    /// Parameter name.
    pub name: String,
    /// Parameter value; absent when the param was declared without one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// Descriptor of a media asset a node needs bundled.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    /// Media identifier; the key of a node's media map.
    pub id: String,
    /// Location of the asset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    /// Media kind (`image`, `audio`, `js`, ...).
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Asset id in the content repository.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
    /// Keys this crate does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Media {
    /// Media with only an id and a source.
    pub fn new(id: impl Into<String>, src: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            src: Some(src.into()),
            kind: None,
            asset_id: None,
            extra: Map::new(),
        }
    }
}

/// What happened to an input field that could not be used.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IssueKind {
    /// The field was dropped.
    Ignored,
    /// The field was dropped and the node kept its default for it.
    Defaulted,
}

/// A tolerated problem in ECML input.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldIssue {
    /// Offending field name (empty for the tree itself).
    pub field: String,
    /// Outcome.
    pub kind: IssueKind,
    /// Human readable reason.
    pub reason: String,
}

impl FieldIssue {
    pub(crate) fn ignored(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind: IssueKind::Ignored,
            reason: reason.into(),
        }
    }

    pub(crate) fn defaulted(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind: IssueKind::Defaulted,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            IssueKind::Ignored => "ignored",
            IssueKind::Defaulted => "defaulted",
        };
        if self.field.is_empty() {
            write!(f, "{kind}: {}", self.reason)
        } else {
            write!(f, "{kind} '{}': {}", self.field, self.reason)
        }
    }
}

/// Result of permissive parsing: the value plus every tolerated issue.
#[derive(Clone, Debug, PartialEq)]
pub struct Parsed<T> {
    /// Parsed value, possibly missing the fields listed in `issues`.
    pub value: T,
    /// Tolerated problems, in input order.
    pub issues: Vec<FieldIssue>,
}

impl<T> Parsed<T> {
    /// Whether parsing met no problems.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Reject the value if any issue was recorded.
    pub fn into_strict(self) -> EcmlResult<T> {
        match self.issues.first() {
            None => Ok(self.value),
            Some(first) => Err(EcmlError::validation(format!(
                "{} ECML issue(s), first: {first}",
                self.issues.len()
            ))),
        }
    }
}

/// A node's ECML attribute tree (percent space).
///
/// This is the durable interchange shape. Undefined fields are omitted on output; unknown
/// fields pass through untouched in [`EcmlNode::extra`].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct EcmlNode {
    /// Node id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Percent-space geometry.
    #[serde(flatten)]
    pub geometry: Geometry,
    /// Visibility flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    /// Editability flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editable: Option<bool>,
    /// Asset reference resolved to a media descriptor on hydration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,
    /// Inline media descriptor overriding the media registry for `asset`.
    #[serde(rename = "assetMedia", skip_serializing_if = "Option::is_none")]
    pub asset_media: Option<Media>,
    /// Type-specific attributes.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Plugin data payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<EcmlBlock>,
    /// Plugin configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<EcmlBlock>,
    /// Legacy `events` field; accepted on input and never written back.
    #[serde(skip)]
    pub legacy_events: Option<Value>,
    /// Runtime events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<Vec<Value>>,
    /// Runtime params.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<Vec<EcmlParam>>,
}

pub(crate) fn coerce_f64(value: &Value) -> Option<f64> {
    let v = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    v.is_finite().then_some(v)
}

pub(crate) fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) if s == "true" => Some(true),
        Value::String(s) if s == "false" => Some(false),
        _ => None,
    }
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn list_of(value: Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        obj @ Value::Object(_) => Some(vec![obj]),
        _ => None,
    }
}

fn parse_param(item: Value) -> Result<EcmlParam, String> {
    let Value::Object(mut map) = item else {
        return Err(format!("param entry is {}", value_kind(&item)));
    };
    let name = match map.remove("name") {
        Some(Value::String(name)) => name,
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => return Err(format!("param name is {}", value_kind(&other))),
        None => return Err("param entry has no name".to_string()),
    };
    let value = map.remove("value").filter(|v| !v.is_null());
    Ok(EcmlParam { name, value })
}

impl EcmlNode {
    /// Parse an attribute tree permissively.
    ///
    /// Ill-shaped documented fields are dropped and reported; numeric strings are accepted for
    /// geometry; a single `event`/`param` object counts as a one-element list; everything else
    /// is kept in [`EcmlNode::extra`].
    pub fn parse(value: Value) -> Parsed<Self> {
        let mut issues = Vec::new();
        let map = match value {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                issues.push(FieldIssue::ignored(
                    "",
                    format!("expected an object, found {}", value_kind(&other)),
                ));
                Map::new()
            }
        };

        let mut node = Self::default();
        for (key, v) in map {
            if v.is_null() && DOCUMENTED_FIELDS.contains(&key.as_str()) {
                continue;
            }
            match key.as_str() {
                "id" => match v {
                    Value::String(s) => node.id = Some(s),
                    Value::Number(n) => node.id = Some(n.to_string()),
                    other => issues.push(FieldIssue::ignored(
                        key,
                        format!("expected a string, found {}", value_kind(&other)),
                    )),
                },
                "x" | "y" | "w" | "h" | "rotate" => match coerce_f64(&v) {
                    Some(n) => {
                        if let Some(slot) = node.geometry.field_mut(&key) {
                            *slot = Some(n);
                        }
                    }
                    None => issues.push(FieldIssue::ignored(
                        key,
                        format!("expected a finite number, found {}", value_kind(&v)),
                    )),
                },
                "visible" | "editable" => match coerce_bool(&v) {
                    Some(b) if key == "visible" => node.visible = Some(b),
                    Some(b) => node.editable = Some(b),
                    None => issues.push(FieldIssue::ignored(
                        key,
                        format!("expected a boolean, found {}", value_kind(&v)),
                    )),
                },
                "asset" => match v {
                    Value::String(s) => node.asset = Some(s),
                    other => issues.push(FieldIssue::ignored(
                        key,
                        format!("expected a string, found {}", value_kind(&other)),
                    )),
                },
                "assetMedia" => match serde_json::from_value::<Media>(v) {
                    Ok(media) => node.asset_media = Some(media),
                    Err(e) => issues.push(FieldIssue::ignored(key, e.to_string())),
                },
                "data" => node.data = Some(EcmlBlock::from_value(v)),
                "config" => node.config = Some(EcmlBlock::from_value(v)),
                "events" => node.legacy_events = Some(v),
                "event" => {
                    let kind = value_kind(&v);
                    match list_of(v) {
                        Some(list) => node.event = Some(list),
                        None => issues.push(FieldIssue::ignored(
                            key,
                            format!("expected a list of events, found {kind}"),
                        )),
                    }
                }
                "param" => {
                    let kind = value_kind(&v);
                    match list_of(v) {
                        Some(items) => {
                            let mut params = Vec::with_capacity(items.len());
                            for item in items {
                                match parse_param(item) {
                                    Ok(p) => params.push(p),
                                    Err(reason) => issues.push(FieldIssue::ignored("param", reason)),
                                }
                            }
                            node.param = Some(params);
                        }
                        None => issues.push(FieldIssue::ignored(
                            key,
                            format!("expected a list of params, found {kind}"),
                        )),
                    }
                }
                _ => {
                    node.extra.insert(key, v);
                }
            }
        }

        Parsed {
            value: node,
            issues,
        }
    }

    /// Parse an attribute tree from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> EcmlResult<Parsed<Self>> {
        let value: Value = serde_json::from_reader(r)
            .map_err(|e| EcmlError::validation(format!("parse ECML JSON: {e}")))?;
        Ok(Self::parse(value))
    }

    /// Parse an attribute tree from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> EcmlResult<Parsed<Self>> {
        let path = path.as_ref();
        let f = File::open(path)
            .map_err(|e| EcmlError::validation(format!("open ECML '{}': {e}", path.display())))?;
        Self::from_reader(BufReader::new(f))
    }

    /// Render the tree as a JSON value.
    pub fn to_value(&self) -> EcmlResult<Value> {
        serde_json::to_value(self).map_err(|e| EcmlError::serde(format!("serialize ECML: {e}")))
    }
}

impl<'de> Deserialize<'de> for EcmlNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let parsed = Self::parse(Value::deserialize(deserializer)?);
        for issue in &parsed.issues {
            tracing::warn!(%issue, "tolerated ECML issue");
        }
        Ok(parsed.value)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ecml/model.rs"]
mod tests;
