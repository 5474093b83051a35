//! List query building
//!
//! Pure functions that turn a list request (resource, pagination, filters)
//! into the query parameters sent to the backend.

use std::fmt;
use std::str::FromStr;

use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::resources::filter_param;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

// =============================================================================
// Pagination
// =============================================================================

/// How the caller wants the collection paginated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaginationMode {
    /// Request the whole collection
    Off,
    #[default]
    Server,
    Client,
}

/// Pagination state of a list request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    pub mode: PaginationMode,
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl Pagination {
    /// Disable pagination entirely
    pub fn off() -> Self {
        Self {
            mode: PaginationMode::Off,
            ..Self::default()
        }
    }

    /// Server-side pagination at the given page
    pub fn server(current_page: u32, page_size: u32) -> Self {
        Self {
            mode: PaginationMode::Server,
            current_page: Some(current_page),
            page_size: Some(page_size),
        }
    }

    pub fn is_off(&self) -> bool {
        self.mode == PaginationMode::Off
    }

    /// Effective page number, never below 1
    pub fn page(&self) -> u32 {
        self.current_page.unwrap_or(DEFAULT_PAGE).max(1)
    }

    /// Effective page size, never below 1
    pub fn limit(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1)
    }
}

// =============================================================================
// Filters
// =============================================================================

/// Operators of a field filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrudOperator {
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,
    In,
    Nin,
    Ina,
    Nina,
    Contains,
    Ncontains,
    Containss,
    Ncontainss,
    Between,
    Nbetween,
    Null,
    Nnull,
    Startswith,
    Nstartswith,
    Startswiths,
    Nstartswiths,
    Endswith,
    Nendswith,
    Endswiths,
    Nendswiths,
}

impl CrudOperator {
    pub const ALL: [CrudOperator; 26] = [
        Self::Eq,
        Self::Ne,
        Self::Lt,
        Self::Gt,
        Self::Lte,
        Self::Gte,
        Self::In,
        Self::Nin,
        Self::Ina,
        Self::Nina,
        Self::Contains,
        Self::Ncontains,
        Self::Containss,
        Self::Ncontainss,
        Self::Between,
        Self::Nbetween,
        Self::Null,
        Self::Nnull,
        Self::Startswith,
        Self::Nstartswith,
        Self::Startswiths,
        Self::Nstartswiths,
        Self::Endswith,
        Self::Nendswith,
        Self::Endswiths,
        Self::Nendswiths,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Lt => "lt",
            Self::Gt => "gt",
            Self::Lte => "lte",
            Self::Gte => "gte",
            Self::In => "in",
            Self::Nin => "nin",
            Self::Ina => "ina",
            Self::Nina => "nina",
            Self::Contains => "contains",
            Self::Ncontains => "ncontains",
            Self::Containss => "containss",
            Self::Ncontainss => "ncontainss",
            Self::Between => "between",
            Self::Nbetween => "nbetween",
            Self::Null => "null",
            Self::Nnull => "nnull",
            Self::Startswith => "startswith",
            Self::Nstartswith => "nstartswith",
            Self::Startswiths => "startswiths",
            Self::Nstartswiths => "nstartswiths",
            Self::Endswith => "endswith",
            Self::Nendswith => "nendswith",
            Self::Endswiths => "endswiths",
            Self::Nendswiths => "nendswiths",
        }
    }
}

impl fmt::Display for CrudOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown operator name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown filter operator: {0}")]
pub struct UnknownOperator(pub String);

impl FromStr for CrudOperator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == lowered)
            .ok_or_else(|| UnknownOperator(s.to_string()))
    }
}

/// Combinator of a conditional filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionalOperator {
    Or,
    And,
}

/// Constraint on a single field
///
/// `value` is `None` when the UI sent no value at all, as opposed to an
/// explicit `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicalFilter {
    pub field: String,
    pub operator: CrudOperator,
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<Value>,
}

/// Keep an explicit `null` as `Some(Value::Null)`
fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Group of filters joined by `or` / `and`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub operator: ConditionalOperator,
    pub value: Vec<CrudFilter>,
}

/// A filter predicate as sent by the admin UI
///
/// Anything that is neither a field filter nor a conditional group (an
/// unknown operator, a missing field) lands in `Unknown` and is never sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CrudFilter {
    Logical(LogicalFilter),
    Conditional(ConditionalFilter),
    Unknown(Value),
}

impl CrudFilter {
    pub fn new(field: impl Into<String>, operator: CrudOperator, value: impl Into<Value>) -> Self {
        CrudFilter::Logical(LogicalFilter {
            field: field.into(),
            operator,
            value: Some(value.into()),
        })
    }

    /// Shorthand for an `eq` filter
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, CrudOperator::Eq, value)
    }

    /// Field the filter constrains; only field filters have one
    pub fn field(&self) -> Option<&str> {
        match self {
            CrudFilter::Logical(filter) => Some(&filter.field),
            CrudFilter::Conditional(_) | CrudFilter::Unknown(_) => None,
        }
    }

    /// Value as sent in the query string; `undefined` when absent
    pub fn value_text(&self) -> Option<String> {
        match self {
            CrudFilter::Logical(filter) => Some(match &filter.value {
                Some(value) => coerce_filter_value(value),
                None => "undefined".to_string(),
            }),
            CrudFilter::Conditional(_) | CrudFilter::Unknown(_) => None,
        }
    }
}

/// Render a filter value the way the admin UI stringifies it
///
/// Numbers follow the JavaScript number formatting, arrays are joined with
/// commas (null elements render empty) and objects collapse to
/// `[object Object]`.
pub fn coerce_filter_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                return n.to_string();
            }
            match n.as_f64() {
                Some(f) => format_js_number(f),
                None => n.to_string(),
            }
        }
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => coerce_filter_value(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Shortest round-trip digits, exponent form outside `[1e-6, 1e21)`
fn format_js_number(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }

    let magnitude = f.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return f.to_string();
    }

    // `{:e}` prints "1e21" / "1.5e-7"; positive exponents carry a sign
    let formatted = format!("{f:e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => formatted,
    }
}

// =============================================================================
// Query parameters
// =============================================================================

/// A query parameter value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QueryValue {
    Number(u64),
    Text(String),
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Number(n) => write!(f, "{n}"),
            QueryValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<u32> for QueryValue {
    fn from(n: u32) -> Self {
        QueryValue::Number(u64::from(n))
    }
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        QueryValue::Text(s)
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        QueryValue::Text(s.to_string())
    }
}

/// Ordered parameter mapping
///
/// Inserting an existing name replaces its value but keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: Vec<(String, QueryValue)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<QueryValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&QueryValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Percent-encoded `name=value` pairs joined by `&`, in insertion order
    pub fn to_query_string(&self) -> String {
        self.entries
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(&value.to_string())
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl Serialize for QueryParams {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(key, value)| (key, value)))
    }
}

/// A request to list one resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequest {
    pub resource: String,
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default)]
    pub filters: Vec<CrudFilter>,
}

impl ListRequest {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            ..Self::default()
        }
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    pub fn with_filter(mut self, filter: CrudFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Endpoint path of the resource, relative to the backend base URL
    pub fn endpoint(&self) -> &str {
        &self.resource
    }

    pub fn query_params(&self) -> QueryParams {
        build_query_params(&self.resource, self.pagination.as_ref(), &self.filters)
    }
}

/// Build the backend query parameters of a list request
///
/// A missing pagination state paginates with defaults. Filters whose field
/// has no parameter for `resource` are dropped, and filters that target the
/// same parameter overwrite each other in order.
pub fn build_query_params(
    resource: &str,
    pagination: Option<&Pagination>,
    filters: &[CrudFilter],
) -> QueryParams {
    let mut params = QueryParams::new();

    let pagination = pagination.cloned().unwrap_or_default();
    if !pagination.is_off() {
        params.insert("page", pagination.page());
        params.insert("limit", pagination.limit());
    }

    for filter in filters {
        let (Some(field), Some(value)) = (filter.field(), filter.value_text()) else {
            continue;
        };
        if let Some(param) = filter_param(resource, field) {
            params.insert(param, value);
        }
    }

    params
}
