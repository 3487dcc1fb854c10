//! Report generator step panels.
//!
//! Each panel owns its local form state (search text, sort, pagination, selection) and
//! exposes `validate()` producing the step's committed value. [`ReportForms`] bundles the five
//! panels with the reference data they read, and [`report_wizard`] wires them into the generic
//! [`Wizard`] in display order.

pub mod charts;
pub mod criteria;
pub mod output;
pub mod preview;
pub mod template;

use crate::data::DataProvider;
use crate::models::draft::{ReportDraft, StepValue};
use crate::models::records::{ChartPoint, DataRow, MachineRecord, TemplateRecord};
use crate::utils::validation::FieldErrors;
use crate::wizard::{StepDefinition, Wizard, WizardError};
use chrono::NaiveDate;

pub use charts::ChartForm;
pub use criteria::CriteriaForm;
pub use output::OutputForm;
pub use preview::PreviewTable;
pub use template::TemplateForm;

pub const STEP_LABELS: [&str; 5] = [
    "Selection Criteria",
    "Template Selection",
    "Data Preview",
    "Chart Selection",
    "Output Options",
];

/// Form state of every step plus the reference data behind it.
#[derive(Debug, Clone)]
pub struct ReportForms {
    pub criteria: CriteriaForm,
    pub template: TemplateForm,
    pub preview: PreviewTable,
    pub charts: ChartForm,
    pub output: OutputForm,
    machines: Vec<MachineRecord>,
    templates: Vec<TemplateRecord>,
    series: Vec<ChartPoint>,
    rows: Vec<DataRow>,
}

impl ReportForms {
    pub fn from_provider(provider: &dyn DataProvider, today: NaiveDate) -> Self {
        let templates = provider.templates();
        let rows = provider.preview_rows();
        Self {
            criteria: CriteriaForm::new(today),
            template: TemplateForm::with_default(&templates),
            preview: PreviewTable::new(rows.clone()),
            charts: ChartForm::default(),
            output: OutputForm::new(today),
            machines: provider.machines(),
            templates,
            series: provider.chart_series(),
            rows,
        }
    }

    /// Fresh panels over the same reference data.
    pub fn reset(&mut self, today: NaiveDate) {
        self.criteria = CriteriaForm::new(today);
        self.template = TemplateForm::with_default(&self.templates);
        self.preview = PreviewTable::new(self.rows.clone());
        self.charts = ChartForm::default();
        self.output = OutputForm::new(today);
    }

    pub fn machines(&self) -> &[MachineRecord] {
        &self.machines
    }

    pub fn templates(&self) -> &[TemplateRecord] {
        &self.templates
    }

    pub fn series(&self) -> &[ChartPoint] {
        &self.series
    }

    pub fn template_name(&self, template_id: &str) -> Option<&str> {
        self.templates
            .iter()
            .find(|t| t.id == template_id)
            .map(|t| t.name.as_str())
    }
}

fn criteria_step(forms: &ReportForms, _: &ReportDraft) -> Result<StepValue, FieldErrors> {
    forms.criteria.validate().map(StepValue::Criteria)
}

fn template_step(forms: &ReportForms, _: &ReportDraft) -> Result<StepValue, FieldErrors> {
    forms
        .template
        .validate(&forms.templates)
        .map(StepValue::Template)
}

fn preview_step(forms: &ReportForms, _: &ReportDraft) -> Result<StepValue, FieldErrors> {
    forms.preview.validate().map(StepValue::Preview)
}

fn charts_step(forms: &ReportForms, _: &ReportDraft) -> Result<StepValue, FieldErrors> {
    forms.charts.validate().map(StepValue::Charts)
}

fn output_step(forms: &ReportForms, _: &ReportDraft) -> Result<StepValue, FieldErrors> {
    forms.output.validate().map(StepValue::Output)
}

/// The five-step report generator, gated on validation.
pub type ReportWizard = Wizard<ReportForms, ReportDraft>;

pub fn report_wizard() -> Result<ReportWizard, WizardError> {
    Wizard::new(vec![
        StepDefinition::new(STEP_LABELS[0], criteria_step),
        StepDefinition::new(STEP_LABELS[1], template_step),
        StepDefinition::new(STEP_LABELS[2], preview_step),
        StepDefinition::new(STEP_LABELS[3], charts_step),
        StepDefinition::new(STEP_LABELS[4], output_step),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{default_chart_series, default_machines, default_templates, MockDataProvider};
    use crate::data::StaticDataProvider;
    use crate::models::draft::{ChartsValue, OutputFormat, ReportType};
    use crate::wizard::Gate;
    use chrono::{TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn forms() -> ReportForms {
        let now = Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap();
        let provider = StaticDataProvider {
            machines: default_machines(),
            templates: default_templates(),
            rows: MockDataProvider::generate(1, now).preview_rows(),
            series: default_chart_series(),
        };
        ReportForms::from_provider(&provider, date(2024, 2, 1))
    }

    #[test]
    fn wizard_labels_follow_display_order() {
        let wizard = report_wizard().unwrap();
        assert_eq!(wizard.state().step_count(), 5);
        assert_eq!(wizard.state().labels()[3], "Chart Selection");
        assert_eq!(wizard.state().current_label(), "Selection Criteria");
    }

    #[test]
    fn canonical_scenario_collects_all_five_values() {
        let mut forms = forms();
        let mut wizard = report_wizard().unwrap();

        forms.criteria.date_from = Some(date(2024, 1, 1));
        forms.criteria.date_to = Some(date(2024, 1, 31));
        forms.criteria.toggle_machine("MACHINE-001");
        forms.criteria.report_type = ReportType::from_id("production_summary");

        for expected in 1..=4 {
            assert_eq!(wizard.next(&forms).unwrap(), expected);
        }

        forms.output.format = Some(OutputFormat::Csv);
        forms.output.file_name = "test_report".to_string();

        let draft = wizard.submit(&forms, |draft| draft.clone()).unwrap();

        let criteria = draft.criteria.unwrap();
        assert_eq!(criteria.date_from, date(2024, 1, 1));
        assert_eq!(criteria.date_to, date(2024, 1, 31));
        assert_eq!(criteria.machine_ids, vec!["MACHINE-001"]);
        assert_eq!(criteria.report_type, ReportType::ProductionSummary);

        assert_eq!(draft.template.unwrap().template_id, "tpl1");
        assert_eq!(draft.preview.unwrap().selected_row_ids.len(), 50);
        assert_eq!(draft.charts, Some(ChartsValue { charts: None }));

        let output = draft.output.unwrap();
        assert_eq!(output.format, OutputFormat::Csv);
        assert_eq!(output.file_name, "test_report");
        assert_eq!(output.email, None);
    }

    #[test]
    fn invalid_criteria_block_the_first_step() {
        let forms = forms();
        let mut wizard = report_wizard().unwrap();

        let errors = wizard.next(&forms).unwrap_err();
        assert!(errors.contains(criteria::FIELD_MACHINE_IDS));
        assert!(errors.contains(criteria::FIELD_REPORT_TYPE));
        assert_eq!(wizard.step_index(), 0);
    }

    #[test]
    fn ungated_wizard_walks_past_invalid_steps() {
        let forms = forms();
        let mut wizard = report_wizard().unwrap().with_gate(Gate::Ungated);

        assert_eq!(wizard.next(&forms).unwrap(), 1);
        assert!(wizard.draft().criteria.is_none());
        assert_eq!(wizard.next(&forms).unwrap(), 2);
        assert!(wizard.draft().template.is_some());
    }

    #[test]
    fn ungated_wizard_drops_a_preview_that_lost_its_rows() {
        let mut forms = forms();
        let mut wizard = report_wizard().unwrap().with_gate(Gate::Ungated);
        wizard.next(&forms).unwrap();
        wizard.next(&forms).unwrap();
        wizard.next(&forms).unwrap();
        assert!(wizard.draft().preview.is_some());

        wizard.back();
        forms.preview.select_all(false);
        wizard.next(&forms).unwrap();
        assert!(wizard.draft().preview.is_none());
    }

    #[test]
    fn chart_toggle_round_trip_restores_defaults_in_draft() {
        let mut forms = forms();
        forms.charts.set_include_charts(true);
        forms.charts.cycle_chart_type();
        forms.charts.cycle_color_scheme();
        forms.charts.set_include_charts(false);
        forms.charts.set_include_charts(true);

        let value = charts_step(&forms, &ReportDraft::default()).unwrap();
        match value {
            StepValue::Charts(ChartsValue { charts: Some(spec) }) => {
                assert_eq!(spec, charts::DEFAULT_CHART)
            }
            other => panic!("unexpected step value {:?}", other),
        }
    }

    #[test]
    fn reset_restores_fresh_panels() {
        let mut forms = forms();
        forms.criteria.toggle_machine("MACHINE-002");
        forms.template.select("tpl4");
        forms.preview.select_all(false);
        forms.output.file_name = "x".to_string();

        forms.reset(date(2024, 3, 3));
        assert!(forms.criteria.machine_ids.is_empty());
        assert!(forms.template.is_selected("tpl1"));
        assert!(forms.preview.all_selected());
        assert_eq!(forms.output.file_name, "SCADA_Report_2024-03-03");
        assert_eq!(forms.template_name("tpl4"), Some("Shift Handover Notes"));
    }
}
