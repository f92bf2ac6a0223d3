//! Maps raw query records onto [`AlertRecord`]s through a per-dataset schema table.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::{
    error::Error,
    model::{
        alert::{AlertRecord, RawRecord},
        confidence::{FIRE_HIGH_CONFIDENCE_LABELS, INTEGRATED_HIGH_CONFIDENCE_LABELS},
        dataset::Dataset,
    },
    util::time::parse_utc,
};

/// A numeric upstream column with the default used when it is absent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub alias: &'static str,
    pub name: &'static str,
    pub default: f64,
}

/// How one dataset's raw records map onto [`AlertRecord`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertSchema {
    pub dataset: Dataset,
    pub date_field: &'static str,
    pub confidence_field: &'static str,
    pub measurements: &'static [Measurement],
    /// Labels scoring 1.0. Independent of the dataset's filter levels.
    pub high_confidence_labels: &'static [&'static str],
}

pub const INTEGRATED_ALERTS_SCHEMA: AlertSchema = AlertSchema {
    dataset: Dataset::IntegratedAlerts,
    date_field: "gfw_integrated_alerts__date",
    confidence_field: "gfw_integrated_alerts__confidence",
    measurements: &[Measurement {
        alias: "gfw_integrated_alerts__intensity",
        name: "intensity",
        default: 0.0,
    }],
    high_confidence_labels: INTEGRATED_HIGH_CONFIDENCE_LABELS,
};

pub const FIRE_ALERTS_SCHEMA: AlertSchema = AlertSchema {
    dataset: Dataset::NasaViirsFireAlerts,
    date_field: "alert__date",
    confidence_field: "confidence__cat",
    measurements: &[
        Measurement {
            alias: "frp__MW",
            name: "frp",
            default: 0.0,
        },
        Measurement {
            alias: "bright_ti4__K",
            name: "bright_ti4",
            default: 0.0,
        },
        Measurement {
            alias: "bright_ti5__K",
            name: "bright_ti5",
            default: 0.0,
        },
    ],
    high_confidence_labels: FIRE_HIGH_CONFIDENCE_LABELS,
};

impl AlertSchema {
    pub const fn for_dataset(dataset: Dataset) -> &'static AlertSchema {
        match dataset {
            Dataset::IntegratedAlerts => &INTEGRATED_ALERTS_SCHEMA,
            Dataset::NasaViirsFireAlerts => &FIRE_ALERTS_SCHEMA,
        }
    }

    pub fn confidence_score(&self, label: &str) -> f64 {
        if self.high_confidence_labels.contains(&label) {
            1.0
        } else {
            0.0
        }
    }

    /// Converts one raw record.
    ///
    /// # Errors
    /// - [`Error::UnexpectedShape`]: a required field is missing or not parseable
    pub fn normalize(&self, raw: &RawRecord) -> Result<AlertRecord, Error> {
        let latitude = number(raw, "latitude")?
            .ok_or_else(|| missing(self.dataset, "latitude"))?;
        let longitude = number(raw, "longitude")?
            .ok_or_else(|| missing(self.dataset, "longitude"))?;

        let date = raw
            .get(self.date_field)
            .and_then(Value::as_str)
            .ok_or_else(|| missing(self.dataset, self.date_field))?;
        let recorded_at = parse_utc(date).ok_or_else(|| {
            Error::UnexpectedShape(format!(
                "{}: unparseable {} {:?}",
                self.dataset, self.date_field, date
            ))
        })?;

        let confidence_label = raw
            .get(self.confidence_field)
            .and_then(Value::as_str)
            .ok_or_else(|| missing(self.dataset, self.confidence_field))?
            .to_string();

        let mut measurements = BTreeMap::new();
        for measurement in self.measurements {
            let value = number(raw, measurement.alias)?.unwrap_or(measurement.default);
            measurements.insert(measurement.name.to_string(), value);
        }

        Ok(AlertRecord {
            dataset: self.dataset,
            latitude,
            longitude,
            recorded_at,
            confidence: self.confidence_score(&confidence_label),
            confidence_label,
            measurements,
        })
    }
}

fn missing(dataset: Dataset, field: &str) -> Error {
    Error::UnexpectedShape(format!("{dataset}: missing field {field}"))
}

/// Numeric field that may arrive as a JSON number or a numeric string; null counts as absent.
fn number(raw: &RawRecord, field: &str) -> Result<Option<f64>, Error> {
    match raw.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) => s.trim().parse::<f64>().map(Some).map_err(|_| {
            Error::UnexpectedShape(format!("field {field} is not numeric: {s:?}"))
        }),
        Some(other) => Err(Error::UnexpectedShape(format!(
            "field {field} is not numeric: {other}"
        ))),
    }
}

/// Normalizes a query response, skipping records that do not fit the schema.
pub fn normalize_records(dataset: Dataset, records: &[RawRecord]) -> Vec<AlertRecord> {
    let schema = AlertSchema::for_dataset(dataset);

    records
        .iter()
        .filter_map(|raw| match schema.normalize(raw) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Skipping {} record: {}", dataset, e);
                None
            }
        })
        .collect()
}
