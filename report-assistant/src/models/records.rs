// Reference data records
// Shapes returned by data providers (mock today, backend queries later).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineRecord {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRecord {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: String,
}

/// One row of the data preview table.
///
/// `included` is the only mutable part; everything else is display data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataRow {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub machine: String,
    pub parameter: String,
    pub value: f64,
    pub unit: String,
    pub included: bool,
}

impl DataRow {
    /// Text shown in the timestamp column (also what search matches against).
    pub fn timestamp_display(&self) -> String {
        self.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    /// Text shown in the value column.
    pub fn value_display(&self) -> String {
        format!("{:.2}", self.value)
    }
}

/// Sample point used by the chart preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub name: String,
    pub timestamp: String,
    pub category: String,
    pub value: f64,
    pub count: f64,
    pub duration: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn data_row_display_fields_are_stable() {
        let row = DataRow {
            id: "data-0".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap(),
            machine: "MACHINE-001".to_string(),
            parameter: "Param A".to_string(),
            value: 12.3456,
            unit: "PSI".to_string(),
            included: true,
        };

        assert_eq!(row.timestamp_display(), "2024-03-05 07:08:09");
        assert_eq!(row.value_display(), "12.35");
    }
}
