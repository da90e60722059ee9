//! Sales totals over phonetically clustered city names.
//!
//! Sales exports often spell the same city several ways ("Istanbul",
//! "Istanboul", "Istambul"). Records are grouped by the Soundex code of their
//! city, and the query city's group is summed.

use super::phonetic::soundex;
use super::ToolError;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Parameters accepted by `analyze_sales_with_phonetic_clustering`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SalesQuery {
    pub file_path: PathBuf,
    pub product: String,
    pub city: String,
    #[serde(default, alias = "min_units")]
    pub min_sales: f64,
}

impl SalesQuery {
    pub fn from_params(params: Map<String, Value>) -> Result<Self, ToolError> {
        serde_json::from_value(Value::Object(params))
            .map_err(|e| ToolError::InvalidParams(e.to_string()))
    }
}

/// One row of the sales export.
#[derive(Debug, Deserialize)]
pub struct SalesRecord {
    pub city: String,
    pub product: String,
    #[serde(alias = "units", alias = "quantity")]
    pub sales: f64,
}

pub async fn analyze(query: SalesQuery) -> Result<Value, ToolError> {
    let raw = tokio::fs::read(&query.file_path)
        .await
        .map_err(|e| ToolError::Io {
            path: query.file_path.display().to_string(),
            source: e,
        })?;

    let records: Vec<SalesRecord> = serde_json::from_slice(&raw).map_err(|e| {
        ToolError::InvalidInput(format!(
            "{} is not a JSON array of sales records: {}",
            query.file_path.display(),
            e
        ))
    })?;

    summarize(&query, &records)
}

/// Pure part of the analysis, separated from file I/O.
pub fn summarize(query: &SalesQuery, records: &[SalesRecord]) -> Result<Value, ToolError> {
    let target = cluster_key(&query.city).ok_or_else(|| {
        ToolError::InvalidParams(format!("city {:?} has no alphabetic characters", query.city))
    })?;

    let mut clusters: BTreeMap<String, BTreeSet<&str>> = BTreeMap::new();
    let mut matched_city_names = BTreeSet::new();
    let mut total_sales = 0.0;
    let mut matched_transactions = 0usize;

    for record in records {
        let Some(key) = cluster_key(&record.city) else {
            continue;
        };
        let city = record.city.trim();
        clusters.entry(key.clone()).or_default().insert(city);

        if key == target
            && record.product.trim().eq_ignore_ascii_case(query.product.trim())
            && record.sales >= query.min_sales
        {
            total_sales += record.sales;
            matched_transactions += 1;
            matched_city_names.insert(city);
        }
    }

    tracing::debug!(
        city = %query.city,
        product = %query.product,
        clusters = clusters.len(),
        matched_transactions,
        "Sales clustering complete"
    );

    Ok(json!({
        "product": query.product,
        "city": query.city,
        "min_sales": number(query.min_sales),
        "total_sales": number(total_sales),
        "matched_transactions": matched_transactions,
        "matched_city_names": matched_city_names,
        "clusters": clusters,
    }))
}

fn cluster_key(city: &str) -> Option<String> {
    soundex(city.trim())
}

/// Whole numbers are emitted as JSON integers.
fn number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        json!(value as i64)
    } else {
        json!(value)
    }
}
