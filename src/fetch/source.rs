//! Listing source definition
//!
//! Describes where the listing lives, how a request body for an
//! `(offset, limit)` window is built, and where the total count, the result
//! rows and each item field sit in the response.

use crate::error::{Error, Result};
use crate::types::{Item, JsonObject, JsonValue};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use url::Url;

const DEFAULT_ENDPOINT: &str = "https://zapier.com/explore-api";
const DEFAULT_OPERATION: &str = "CategoryAppsBFFQuery";
const DEFAULT_QUERY: &str = r#"
query CategoryAppsBFFQuery(
    $categorySlug: String = "all",
    $limit: Int = 10,
    $offset: Int = 0,
    $orderBy: AppSortOrder,
    $filterBy: String
) {
    appCategory: appCategoryWithSlug(slug: $categorySlug) {
        apps(
            orderBy: $orderBy
            limit: $limit
            offset: $offset
            additionalCategorySlug: $filterBy
        ) {
            results {
                id
                name
                logo {
                    mainUrl
                }
                description
                slug
                profileUrl
            }
            count
        }
    }
}
"#;

/// Where each [`Item`] field is read from inside a result row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Path to the display name
    pub name: String,
    /// Path to the profile/detail URL
    pub url: String,
    /// Path to the logo URL
    pub icon: String,
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            name: "name".to_string(),
            url: "profileUrl".to_string(),
            icon: "logo.mainUrl".to_string(),
        }
    }
}

/// Remote listing endpoint and response layout.
///
/// Every field is optional in configuration files; missing fields fall back
/// to the public app directory preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// URL every request is POSTed to
    pub endpoint: String,
    /// GraphQL operation name
    pub operation_name: Option<String>,
    /// GraphQL query document; without one the variables are the whole body
    pub query: Option<String>,
    /// Fixed variables (ordering, filters)
    pub variables: JsonObject,
    /// Variable carrying the window offset
    pub offset_variable: String,
    /// Variable carrying the window size
    pub limit_variable: String,
    /// Path to the result rows
    pub results_path: String,
    /// Path to the total item count
    pub count_path: String,
    /// Item field paths inside a row
    pub fields: FieldMapping,
    /// Extra request headers
    pub headers: HashMap<String, String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        let mut variables = JsonObject::new();
        variables.insert("categorySlug".to_string(), json!("all"));
        variables.insert("orderBy".to_string(), json!("POPULARITY"));
        variables.insert("filterBy".to_string(), json!(""));

        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            operation_name: Some(DEFAULT_OPERATION.to_string()),
            query: Some(DEFAULT_QUERY.to_string()),
            variables,
            offset_variable: "offset".to_string(),
            limit_variable: "limit".to_string(),
            results_path: "data.appCategory.apps.results".to_string(),
            count_path: "data.appCategory.apps.count".to_string(),
            fields: FieldMapping::default(),
            headers: HashMap::new(),
        }
    }
}

impl SourceConfig {
    /// A plain JSON source: variables are sent as the body
    pub fn rest(
        endpoint: impl Into<String>,
        results_path: impl Into<String>,
        count_path: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            operation_name: None,
            query: None,
            variables: JsonObject::new(),
            results_path: results_path.into(),
            count_path: count_path.into(),
            ..Self::default()
        }
    }

    /// Check the source before any request is made
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.endpoint)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                "source.endpoint",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }

        let required = [
            ("source.offset_variable", &self.offset_variable),
            ("source.limit_variable", &self.limit_variable),
            ("source.results_path", &self.results_path),
            ("source.count_path", &self.count_path),
            ("source.fields.name", &self.fields.name),
            ("source.fields.url", &self.fields.url),
            ("source.fields.icon", &self.fields.icon),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(Error::invalid_value(field, "cannot be empty"));
            }
        }

        Ok(())
    }

    /// Request body for the window `(offset, limit)`
    pub fn request_body(&self, offset: u64, limit: u64) -> JsonValue {
        let mut variables = self.variables.clone();
        variables.insert(self.offset_variable.clone(), json!(offset));
        variables.insert(self.limit_variable.clone(), json!(limit));

        let Some(query) = &self.query else {
            return JsonValue::Object(variables);
        };

        let mut body = JsonObject::new();
        if let Some(operation) = &self.operation_name {
            body.insert("operationName".to_string(), json!(operation));
        }
        body.insert("variables".to_string(), JsonValue::Object(variables));
        body.insert("query".to_string(), json!(query));
        JsonValue::Object(body)
    }

    /// Read the total item count from a response
    pub fn read_count(&self, response: &JsonValue) -> Result<u64> {
        let value = lookup(response, &self.count_path)
            .ok_or_else(|| Error::decode(format!("count not found at '{}'", self.count_path)))?;

        let count = match value {
            JsonValue::Number(n) => n.as_u64(),
            JsonValue::String(s) => s.trim().parse().ok(),
            _ => None,
        };

        count.ok_or_else(|| {
            Error::decode(format!(
                "count at '{}' is not a non-negative integer: {value}",
                self.count_path
            ))
        })
    }

    /// Map every result row of a response to an [`Item`].
    ///
    /// Returns the items and the number of rows that had at least one field
    /// missing; missing fields become empty strings.
    pub fn read_items(&self, response: &JsonValue) -> Result<(Vec<Item>, usize)> {
        let rows = select_rows(response, &self.results_path)?;

        let mut degraded = 0;
        let items = rows
            .iter()
            .map(|row| {
                let (item, complete) = self.map_row(row);
                if !complete {
                    degraded += 1;
                }
                item
            })
            .collect();

        Ok((items, degraded))
    }

    fn map_row(&self, row: &JsonValue) -> (Item, bool) {
        let name = read_string(row, &self.fields.name);
        let url = read_string(row, &self.fields.url);
        let icon = read_string(row, &self.fields.icon);
        let complete = name.is_some() && url.is_some() && icon.is_some();

        let item = Item {
            name: name.unwrap_or_default(),
            url: url.unwrap_or_default(),
            icon: icon.unwrap_or_default(),
        };
        (item, complete)
    }
}

/// Walk a dot-notation path, with `[n]` array indexing
pub(crate) fn lookup<'a>(value: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let path = path.strip_prefix("$.").unwrap_or(path);

    let mut current = value;
    for part in path.split('.') {
        match part.find('[') {
            Some(bracket) => {
                let name = &part[..bracket];
                let index: usize = part[bracket + 1..].strip_suffix(']')?.parse().ok()?;
                if !name.is_empty() {
                    current = current.get(name)?;
                }
                current = current.get(index)?;
            }
            None => current = current.get(part)?,
        }
    }

    Some(current)
}

/// Extract result rows; wildcard paths go through jsonpath-rust
fn select_rows(value: &JsonValue, path: &str) -> Result<Vec<JsonValue>> {
    if path.contains('*') {
        use jsonpath_rust::JsonPath;

        let jp = JsonPath::try_from(path).map_err(|e| Error::JsonPath {
            message: format!("Invalid JSONPath '{path}': {e}"),
        })?;

        // A wildcard that matches nothing yields an empty array, so an empty
        // match only counts as an empty page when the container exists
        return match jp.find(value) {
            JsonValue::Array(rows) if rows.is_empty() && !wildcard_anchor_exists(value, path) => {
                Err(Error::decode(format!("results not found at '{path}'")))
            }
            JsonValue::Array(rows) => Ok(rows),
            JsonValue::Null => Err(Error::decode(format!("results not found at '{path}'"))),
            other => Err(Error::decode(format!(
                "results at '{path}' are not an array: {other}"
            ))),
        };
    }

    match lookup(value, path) {
        Some(JsonValue::Array(rows)) => Ok(rows.clone()),
        Some(other) => Err(Error::decode(format!(
            "results at '{path}' are not an array: {other}"
        ))),
        None => Err(Error::decode(format!("results not found at '{path}'"))),
    }
}

/// Check that the part of a wildcard path before the first `*` resolves
pub(crate) fn wildcard_anchor_exists(value: &JsonValue, path: &str) -> bool {
    let anchor = path
        .split('*')
        .next()
        .unwrap_or_default()
        .trim_end_matches(['[', '.']);

    match anchor {
        "" | "$" => true,
        anchor => lookup(value, anchor).is_some(),
    }
}

fn read_string(row: &JsonValue, path: &str) -> Option<String> {
    match lookup(row, path)? {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
