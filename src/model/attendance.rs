use chrono::{DateTime, Local, Utc};
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display as StrumDisplay, EnumString};
use uuid::Uuid;

#[derive(
    Debug,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Hash,
    Serialize,
    Deserialize,
    StrumDisplay,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceType {
    CheckIn,
    CheckOut,
}

impl AttendanceType {
    pub fn opposite(self) -> Self {
        match self {
            AttendanceType::CheckIn => AttendanceType::CheckOut,
            AttendanceType::CheckOut => AttendanceType::CheckIn,
        }
    }

    /// Human readable form used in history lines and prompts.
    pub fn label(self) -> &'static str {
        match self {
            AttendanceType::CheckIn => "CHECK IN",
            AttendanceType::CheckOut => "CHECK OUT",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64, accuracy: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy,
        }
    }

    /// Four-decimal `"lat, lon"` string stored as the record's location name.
    pub fn short_name(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn generate() -> Self {
        RecordId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId(value.to_string())
    }
}

/// One check-in or check-out event. Unknown JSON fields are ignored on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: RecordId,
    /// Epoch milliseconds.
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub kind: AttendanceType,
    pub coordinates: Coordinates,
    pub photo_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_late: Option<bool>,
}

impl AttendanceRecord {
    pub fn new(
        kind: AttendanceType,
        timestamp: i64,
        coordinates: Coordinates,
        photo_url: String,
    ) -> Self {
        Self {
            id: RecordId::generate(),
            timestamp,
            kind,
            location_name: Some(coordinates.short_name()),
            coordinates,
            photo_url,
            is_late: Some(false),
        }
    }

    pub fn local_time(&self) -> DateTime<Local> {
        local_datetime(self.timestamp)
    }
}

/// Epoch milliseconds in the device's local timezone. Out-of-range values map to the epoch.
pub fn local_datetime(timestamp: i64) -> DateTime<Local> {
    DateTime::<Utc>::from_timestamp_millis(timestamp)
        .unwrap_or_default()
        .with_timezone(&Local)
}

/// Restores the master ordering: newest first.
pub fn sort_newest_first(records: &mut [AttendanceRecord]) {
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_fills_derived_fields() {
        let coords = Coordinates::new(10.762622, 106.660172, 5.0);
        let record = AttendanceRecord::new(
            AttendanceType::CheckIn,
            1_700_000_000_000,
            coords,
            "data:image/jpeg;base64,AAAA".to_string(),
        );

        assert_eq!(record.location_name.as_deref(), Some("10.7626, 106.6602"));
        assert_eq!(record.is_late, Some(false));
        assert!(!record.id.as_str().is_empty());
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(RecordId::generate(), RecordId::generate());
    }

    #[test]
    fn serializes_with_camel_case_and_type_field() {
        let record = AttendanceRecord {
            id: RecordId::from("1700000000000"),
            timestamp: 1_700_000_000_000,
            kind: AttendanceType::CheckOut,
            coordinates: Coordinates::new(10.0, 106.0, 5.0),
            photo_url: "data:image/jpeg;base64,AAAA".to_string(),
            location_name: None,
            is_late: None,
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["type"], "CHECK_OUT");
        assert_eq!(value["photoUrl"], "data:image/jpeg;base64,AAAA");
        assert_eq!(value["id"], "1700000000000");
        assert!(value.get("locationName").is_none());
    }

    #[test]
    fn ignores_unknown_fields() {
        let json = r#"{
            "id": "abc",
            "timestamp": 42,
            "type": "CHECK_IN",
            "coordinates": {"latitude": 1.0, "longitude": 2.0, "accuracy": 3.0},
            "photoUrl": "",
            "deviceModel": "unknown"
        }"#;

        let record: AttendanceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.kind, AttendanceType::CheckIn);
        assert_eq!(record.location_name, None);
    }

    #[test]
    fn sorts_newest_first() {
        let coords = Coordinates::new(0.0, 0.0, 1.0);
        let mut records: Vec<_> = [3, 1, 2]
            .into_iter()
            .map(|t| AttendanceRecord::new(AttendanceType::CheckIn, t, coords, String::new()))
            .collect();

        sort_newest_first(&mut records);

        let order: Vec<i64> = records.iter().map(|r| r.timestamp).collect();
        assert_eq!(order, vec![3, 2, 1]);
    }

    #[test]
    fn type_strings() {
        assert_eq!(AttendanceType::CheckIn.to_string(), "CHECK_IN");
        assert_eq!(AttendanceType::CheckOut.label(), "CHECK OUT");
        assert_eq!(AttendanceType::CheckIn.opposite(), AttendanceType::CheckOut);
    }
}
