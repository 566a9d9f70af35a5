//! Catalog records as delivered by the ingestion layer.
//!
//! Records are immutable for the duration of a linking or scoring run;
//! the accessors below only read and never normalize in place.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::attributes;

/// Which marketplace a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Catalog {
    A,
    B,
}

impl std::fmt::Display for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Catalog::A => write!(f, "a"),
            Catalog::B => write!(f, "b"),
        }
    }
}

/// A single attribute value. Nulls are modelled as `None` at the map level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Number(f64),
    Text(String),
}

impl AttributeValue {
    /// Returns the trimmed text form, or `None` for blank text and non-finite
    /// numbers.
    ///
    /// Integral numbers render without a fractional part (`42.0` → `"42"`), so
    /// a numeric attribute and its string form vote together.
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        match self {
            AttributeValue::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            AttributeValue::Number(n) if !n.is_finite() => None,
            AttributeValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    #[allow(clippy::cast_possible_truncation)]
                    let whole = *n as i64;
                    Some(whole.to_string())
                } else {
                    Some(n.to_string())
                }
            }
        }
    }

    /// Returns the numeric form, parsing text when needed.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(n) => n.is_finite().then_some(*n),
            AttributeValue::Text(s) => s
                .trim()
                .replace(',', ".")
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite()),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Number(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        #[allow(clippy::cast_precision_loss)]
        AttributeValue::Number(value as f64)
    }
}

/// One product row from either catalog. Identity is `(catalog, id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub catalog: Catalog,
    pub id: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, Option<AttributeValue>>,
    /// Raw multi-valued barcode field, e.g. `"4601234567890;4601234567891"`.
    #[serde(default)]
    pub barcodes: Option<String>,
}

impl CatalogRecord {
    #[must_use]
    pub fn new(catalog: Catalog, id: impl Into<String>) -> Self {
        Self {
            catalog,
            id: id.into(),
            attributes: BTreeMap::new(),
            barcodes: None,
        }
    }

    /// Sets the raw barcode field.
    #[must_use]
    pub fn with_barcodes(mut self, raw: impl Into<String>) -> Self {
        self.barcodes = Some(raw.into());
        self
    }

    /// Sets a single attribute, replacing any previous value.
    #[must_use]
    pub fn with_attr(mut self, name: &str, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name.to_string(), Some(value.into()));
        self
    }

    /// Returns the raw attribute value, treating explicit nulls as absent.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name).and_then(Option::as_ref)
    }

    #[must_use]
    pub fn text(&self, name: &str) -> Option<String> {
        self.value(name).and_then(AttributeValue::as_text)
    }

    #[must_use]
    pub fn number(&self, name: &str) -> Option<f64> {
        self.value(name).and_then(AttributeValue::as_number)
    }

    /// Price as a decimal. Accepts both numeric values and decimal strings
    /// such as `"1299.00"` or `"1299,00"`.
    #[must_use]
    pub fn price(&self) -> Option<Decimal> {
        match self.value(attributes::PRICE)? {
            AttributeValue::Number(n) => Decimal::try_from(*n).ok(),
            AttributeValue::Text(s) => Decimal::from_str(&s.trim().replace(',', ".")).ok(),
        }
    }

    /// Units in stock, rounded to the nearest whole unit.
    #[must_use]
    pub fn stock(&self) -> Option<i64> {
        let n = self.number(attributes::STOCK)?;
        #[allow(clippy::cast_possible_truncation)]
        Some(n.round() as i64)
    }

    /// Supported size values parsed from the `sizes` attribute.
    #[must_use]
    pub fn sizes(&self) -> BTreeSet<String> {
        self.value(attributes::SIZES)
            .and_then(AttributeValue::as_text)
            .map(|raw| parse_sizes(&raw))
            .unwrap_or_default()
    }
}

/// Splits a size list such as `"38, 39;40/41"` into a set of size tokens.
#[must_use]
pub fn parse_sizes(raw: &str) -> BTreeSet<String> {
    raw.split(|c: char| c == ',' || c == ';' || c == '/' || c.is_whitespace())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
        .collect()
}
