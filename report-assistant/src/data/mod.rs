// Data providers
//
// Panels read reference data (machines, templates, preview rows, chart series) through
// `DataProvider` so a real backend query layer can replace the mock without touching them.

pub mod mock;

use crate::models::records::{ChartPoint, DataRow, MachineRecord, TemplateRecord};

pub use mock::MockDataProvider;

pub trait DataProvider: Send + Sync {
    fn machines(&self) -> Vec<MachineRecord>;

    fn templates(&self) -> Vec<TemplateRecord>;

    fn preview_rows(&self) -> Vec<DataRow>;

    fn chart_series(&self) -> Vec<ChartPoint>;
}

/// Provider over fixed collections (deterministic fixtures, imported data).
#[derive(Debug, Clone, Default)]
pub struct StaticDataProvider {
    pub machines: Vec<MachineRecord>,
    pub templates: Vec<TemplateRecord>,
    pub rows: Vec<DataRow>,
    pub series: Vec<ChartPoint>,
}

impl DataProvider for StaticDataProvider {
    fn machines(&self) -> Vec<MachineRecord> {
        self.machines.clone()
    }

    fn templates(&self) -> Vec<TemplateRecord> {
        self.templates.clone()
    }

    fn preview_rows(&self) -> Vec<DataRow> {
        self.rows.clone()
    }

    fn chart_series(&self) -> Vec<ChartPoint> {
        self.series.clone()
    }
}

/// The 20 synthetic machines `MACHINE-001` .. `MACHINE-020`.
pub fn default_machines() -> Vec<MachineRecord> {
    (1..=20)
        .map(|i| MachineRecord {
            id: format!("MACHINE-{:03}", i),
            name: format!("Machine {:03}", i),
        })
        .collect()
}

pub fn default_templates() -> Vec<TemplateRecord> {
    let t = |id: &str, name: &str, category: &str, description: &str| TemplateRecord {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        description: description.to_string(),
    };
    vec![
        t(
            "tpl1",
            "Daily Production Overview",
            "Production",
            "Summary of daily production metrics and KPIs.",
        ),
        t(
            "tpl2",
            "Weekly Maintenance Log",
            "Maintenance",
            "Detailed log of maintenance activities for the week.",
        ),
        t(
            "tpl3",
            "Monthly Quality Report",
            "Quality",
            "Comprehensive quality analysis for the month.",
        ),
        t(
            "tpl4",
            "Shift Handover Notes",
            "Operations",
            "Standardized notes for shift handover procedures.",
        ),
        t(
            "tpl5",
            "Equipment Downtime Analysis",
            "Maintenance",
            "Analysis of equipment downtime and root causes.",
        ),
    ]
}

/// Sample series shared by every chart type in the preview.
pub fn default_chart_series() -> Vec<ChartPoint> {
    let p = |name: &str, ts: &str, category: &str, value: f64, count: f64, duration: f64| {
        ChartPoint {
            name: name.to_string(),
            timestamp: ts.to_string(),
            category: category.to_string(),
            value,
            count,
            duration,
        }
    };
    vec![
        p("Machine A", "08:00", "Production", 400.0, 200.0, 35.0),
        p("Machine B", "10:00", "Maintenance", 300.0, 250.0, 20.0),
        p("Machine C", "12:00", "Quality", 200.0, 300.0, 45.0),
        p("Machine D", "14:00", "Operations", 278.0, 180.0, 15.0),
        p("Machine E", "16:00", "Production", 189.0, 220.0, 30.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_collections_have_expected_shapes() {
        let machines = default_machines();
        assert_eq!(machines.len(), 20);
        assert_eq!(machines[0].id, "MACHINE-001");
        assert_eq!(machines[0].name, "Machine 001");
        assert_eq!(machines[19].id, "MACHINE-020");

        let templates = default_templates();
        assert_eq!(templates.len(), 5);
        assert_eq!(templates[0].id, "tpl1");

        assert_eq!(default_chart_series().len(), 5);
    }

    #[test]
    fn static_provider_returns_its_fixtures() {
        let provider = StaticDataProvider {
            machines: default_machines()[..2].to_vec(),
            templates: Vec::new(),
            rows: Vec::new(),
            series: default_chart_series(),
        };
        assert_eq!(provider.machines().len(), 2);
        assert!(provider.templates().is_empty());
        assert_eq!(provider.chart_series()[0].name, "Machine A");
    }
}
