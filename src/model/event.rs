use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{alert::AlertRecord, dataset::Dataset};

pub const INTEGRATED_ALERT_EVENT_TYPE: &str = "gfwgladalert";
pub const FIRE_ALERT_EVENT_TYPE: &str = "gfwfirealert";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EventLocation {
    pub lat: f64,
    pub lon: f64,
}

/// Alert shaped for the downstream event sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertEvent {
    pub title: String,
    pub event_type: String,
    pub recorded_at: DateTime<Utc>,
    pub location: EventLocation,
    pub event_details: serde_json::Map<String, serde_json::Value>,
}

impl AlertEvent {
    pub fn from_record(record: &AlertRecord) -> Self {
        let mut event_details = serde_json::Map::new();

        let (title, event_type) = match record.dataset {
            Dataset::IntegratedAlerts => {
                event_details.insert("confidence".to_string(), record.confidence.into());
                (
                    "GFW Integrated Deforestation Alert",
                    INTEGRATED_ALERT_EVENT_TYPE,
                )
            }
            Dataset::NasaViirsFireAlerts => {
                // Fire events carry the raw category rather than the score
                event_details.insert(
                    "confidence".to_string(),
                    record.confidence_label.clone().into(),
                );
                event_details.insert(
                    "alert_time".to_string(),
                    record.recorded_at.to_rfc3339().into(),
                );
                ("GFW VIIRS Alert", FIRE_ALERT_EVENT_TYPE)
            }
        };

        Self {
            title: title.to_string(),
            event_type: event_type.to_string(),
            recorded_at: record.recorded_at,
            location: EventLocation {
                lat: record.latitude,
                lon: record.longitude,
            },
            event_details,
        }
    }
}
