// Mock data provider
// Generated once at startup; a fixed seed makes the randomized rows reproducible.

use super::{default_chart_series, default_machines, default_templates, DataProvider};
use crate::models::records::{ChartPoint, DataRow, MachineRecord, TemplateRecord};
use chrono::{DateTime, Duration, Utc};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const MOCK_ROW_COUNT: usize = 50;

/// Rows are spread over roughly the last 11.5 days.
const MAX_AGE_MS: i64 = 1_000_000_000;

#[derive(Debug, Clone)]
pub struct MockDataProvider {
    seed: u64,
    rows: Vec<DataRow>,
}

impl MockDataProvider {
    pub fn new(seed: Option<u64>) -> Self {
        Self::generate(seed.unwrap_or_else(rand::random), Utc::now())
    }

    pub fn generate(seed: u64, now: DateTime<Utc>) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let rows = (0..MOCK_ROW_COUNT)
            .map(|i| {
                let age_ms = rng.random_range(0..MAX_AGE_MS);
                let machine_no: u32 = rng.random_range(1..=5);
                let raw: f64 = rng.random_range(0.0..100.0);
                DataRow {
                    id: format!("data-{}", i),
                    timestamp: now - Duration::milliseconds(age_ms),
                    machine: format!("MACHINE-{:03}", machine_no),
                    parameter: format!("Param {}", (b'A' + (i % 5) as u8) as char),
                    value: (raw * 100.0).round() / 100.0,
                    unit: if i % 2 == 0 { "°C" } else { "PSI" }.to_string(),
                    included: true,
                }
            })
            .collect();

        debug!(
            "[PHASE: data] [STEP: mock] Generated {} preview rows (seed={})",
            MOCK_ROW_COUNT, seed
        );
        Self { seed, rows }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl DataProvider for MockDataProvider {
    fn machines(&self) -> Vec<MachineRecord> {
        default_machines()
    }

    fn templates(&self) -> Vec<TemplateRecord> {
        default_templates()
    }

    fn preview_rows(&self) -> Vec<DataRow> {
        self.rows.clone()
    }

    fn chart_series(&self) -> Vec<ChartPoint> {
        default_chart_series()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn same_seed_same_rows() {
        let a = MockDataProvider::generate(42, now());
        let b = MockDataProvider::generate(42, now());
        assert_eq!(a.preview_rows(), b.preview_rows());
        assert_eq!(a.seed(), 42);
    }

    #[test]
    fn generated_rows_respect_declared_ranges() {
        let rows = MockDataProvider::generate(7, now()).preview_rows();
        assert_eq!(rows.len(), MOCK_ROW_COUNT);

        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.id, format!("data-{}", i));
            assert!(row.included);
            assert!((0.0..=100.0).contains(&row.value), "value {}", row.value);
            assert!(row.timestamp <= now());
            assert!(row.timestamp > now() - Duration::milliseconds(MAX_AGE_MS + 1));
            assert!(["MACHINE-001", "MACHINE-002", "MACHINE-003", "MACHINE-004", "MACHINE-005"]
                .contains(&row.machine.as_str()));
        }
        assert_eq!(rows[0].unit, "°C");
        assert_eq!(rows[1].unit, "PSI");
        assert_eq!(rows[6].parameter, "Param B");
    }
}
