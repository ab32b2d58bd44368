//! Vehicle rental record types.
//!
//! A [`VehicleRecord`] is one row of a partition. The six user-editable
//! fields live in [`RecordFields`] so that creation and full-field updates
//! take exactly the same shape, and the storage layer alone assigns ids.

use serde::{Deserialize, Serialize};

/// The six user-editable fields of a vehicle record.
///
/// Every field is always present; an empty string is a valid value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordFields {
    /// Rental date, conventionally `DD/MM/YYYY`.
    pub date: String,
    /// Time of day, conventionally `HH:MM`.
    pub time: String,
    /// Registration plate.
    pub plate: String,
    /// Vehicle name or model.
    pub vehicle: String,
    /// Full name of the responsible person.
    pub person: String,
    /// Partner organization.
    pub partner: String,
}

impl RecordFields {
    /// Build a field set from its six values.
    #[must_use]
    pub fn new(
        date: impl Into<String>,
        time: impl Into<String>,
        plate: impl Into<String>,
        vehicle: impl Into<String>,
        person: impl Into<String>,
        partner: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            time: time.into(),
            plate: plate.into(),
            vehicle: vehicle.into(),
            person: person.into(),
            partner: partner.into(),
        }
    }
}

/// A stored vehicle rental record.
///
/// The `id` is assigned by the partition store on creation and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VehicleRecord {
    /// Partition-unique identifier.
    pub id: i64,
    /// The record's field values.
    #[serde(flatten)]
    pub fields: RecordFields,
}

impl VehicleRecord {
    /// Column headers in report and table order.
    pub const COLUMNS: [&'static str; 7] =
        ["ID", "Date", "Time", "Plate", "Vehicle", "Person", "Partner"];

    /// Cell values in column order, all rendered as text.
    #[must_use]
    pub fn cells(&self) -> [String; 7] {
        let f = &self.fields;
        [
            self.id.to_string(),
            f.date.clone(),
            f.time.clone(),
            f.plate.clone(),
            f.vehicle.clone(),
            f.person.clone(),
            f.partner.clone(),
        ]
    }
}

/// The partner organizations the rental desk works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Partner {
    /// CERIZA
    #[serde(rename = "CERIZA")]
    Ceriza,
    /// FOX CAR
    #[serde(rename = "FOX CAR")]
    FoxCar,
    /// ZEZGO
    #[serde(rename = "ZEZGO")]
    Zezgo,
    /// IZI
    #[serde(rename = "IZI")]
    Izi,
    /// DIRECT (no intermediary)
    #[serde(rename = "DIRECT")]
    Direct,
}

impl Partner {
    /// All partners, in the order they are offered to users.
    pub const ALL: [Partner; 5] = [
        Self::Ceriza,
        Self::FoxCar,
        Self::Zezgo,
        Self::Izi,
        Self::Direct,
    ];

    /// The label stored in the `partner` field.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ceriza => "CERIZA",
            Self::FoxCar => "FOX CAR",
            Self::Zezgo => "ZEZGO",
            Self::Izi => "IZI",
            Self::Direct => "DIRECT",
        }
    }
}

impl std::fmt::Display for Partner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Partner {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown partner: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> VehicleRecord {
        VehicleRecord {
            id: 7,
            fields: RecordFields::new("01/01/2024", "09:00", "AA-123", "Clio", "X", "CERIZA"),
        }
    }

    #[test]
    fn test_cells_in_column_order() {
        let cells = sample().cells();
        assert_eq!(
            cells,
            ["7", "01/01/2024", "09:00", "AA-123", "Clio", "X", "CERIZA"].map(String::from)
        );
        assert_eq!(cells.len(), VehicleRecord::COLUMNS.len());
    }

    #[test]
    fn test_default_fields_are_empty() {
        let fields = RecordFields::default();
        assert!(fields.date.is_empty());
        assert!(fields.partner.is_empty());
    }

    #[test]
    fn test_record_serializes_flat() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["vehicle"], "Clio");
        assert!(json.get("fields").is_none());
    }

    #[test]
    fn test_partner_labels() {
        assert_eq!(Partner::FoxCar.to_string(), "FOX CAR");
        assert_eq!("ZEZGO".parse::<Partner>(), Ok(Partner::Zezgo));
        assert!("zezgo".parse::<Partner>().is_err());
    }

    #[test]
    fn test_partner_serde_uses_labels() {
        let json = serde_json::to_string(&Partner::FoxCar).unwrap();
        assert_eq!(json, "\"FOX CAR\"");
    }
}
