// Step 1: selection criteria (date range, machines, report type)

use crate::models::draft::{CriteriaValue, ReportType};
use crate::models::records::MachineRecord;
use crate::utils::validation::FieldErrors;
use chrono::NaiveDate;

pub const FIELD_DATE_RANGE: &str = "dateRange";
pub const FIELD_MACHINE_IDS: &str = "machineIds";
pub const FIELD_REPORT_TYPE: &str = "reportType";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CriteriaForm {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    /// Selection order is preserved.
    pub machine_ids: Vec<String>,
    pub machine_search: String,
    pub report_type: Option<ReportType>,
}

impl CriteriaForm {
    /// Fresh form: both ends of the range default to `today`, nothing selected.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            date_from: Some(today),
            date_to: Some(today),
            ..Self::default()
        }
    }

    /// Machines whose name or id contains the search text (case-insensitive).
    /// The source list is never modified.
    pub fn filtered_machines<'a>(&self, machines: &'a [MachineRecord]) -> Vec<&'a MachineRecord> {
        let needle = self.machine_search.trim().to_lowercase();
        machines
            .iter()
            .filter(|m| {
                needle.is_empty()
                    || m.name.to_lowercase().contains(&needle)
                    || m.id.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn is_selected(&self, machine_id: &str) -> bool {
        self.machine_ids.iter().any(|id| id == machine_id)
    }

    /// Check or uncheck a machine. Returns the new checked state.
    pub fn toggle_machine(&mut self, machine_id: &str) -> bool {
        if let Some(pos) = self.machine_ids.iter().position(|id| id == machine_id) {
            self.machine_ids.remove(pos);
            false
        } else {
            self.machine_ids.push(machine_id.to_string());
            true
        }
    }

    pub fn cycle_report_type(&mut self) {
        self.report_type = Some(match self.report_type {
            None => ReportType::ProductionSummary,
            Some(ReportType::ProductionSummary) => ReportType::DowntimeAnalysis,
            Some(ReportType::DowntimeAnalysis) => ReportType::QualityMetrics,
            Some(ReportType::QualityMetrics) => ReportType::ProductionSummary,
        });
    }

    pub fn validate(&self) -> Result<CriteriaValue, FieldErrors> {
        let mut errors = FieldErrors::new();

        match (self.date_from, self.date_to) {
            (None, _) => errors.add(FIELD_DATE_RANGE, "Start date is required."),
            (_, None) => errors.add(FIELD_DATE_RANGE, "End date is required."),
            (Some(from), Some(to)) if from > to => {
                errors.add(FIELD_DATE_RANGE, "Start date must not be after end date.")
            }
            _ => {}
        }

        if self.machine_ids.is_empty() {
            errors.add(
                FIELD_MACHINE_IDS,
                "At least one machine ID must be selected.",
            );
        }

        if self.report_type.is_none() {
            errors.add(FIELD_REPORT_TYPE, "Report type is required.");
        }

        match (self.date_from, self.date_to, self.report_type) {
            (Some(date_from), Some(date_to), Some(report_type)) if errors.is_empty() => {
                Ok(CriteriaValue {
                    date_from,
                    date_to,
                    machine_ids: self.machine_ids.clone(),
                    report_type,
                })
            }
            _ => Err(errors),
        }
    }
}
