// Non-interactive wizard run (deterministic proof mode).
//
// Drives the report wizard through all five steps against mock data and the stub reporting
// service, the same path the TUI takes, and returns what was submitted and acknowledged.

use crate::backend::reporting::{submit_with_timeout, StubReportBackend};
use crate::config::AppConfig;
use crate::data::MockDataProvider;
use crate::models::draft::{ChartType, ColorScheme, OutputFormat, ReportType, XField, YField};
use crate::models::responses::WizardTranscript;
use crate::panels::{report_wizard, ReportForms, ReportWizard};
use anyhow::{Context, Result};
use chrono::{NaiveDate, TimeZone, Utc};
use log::info;

const SMOKE_SEED: u64 = 7;

pub async fn wizard_smoke(config: &AppConfig) -> Result<WizardTranscript> {
    let now = Utc
        .with_ymd_and_hms(2024, 2, 1, 9, 0, 0)
        .single()
        .context("invalid smoke clock")?;
    let today = now.date_naive();
    let provider = MockDataProvider::generate(config.mock_seed.unwrap_or(SMOKE_SEED), now);

    let mut forms = ReportForms::from_provider(&provider, today);
    let mut wizard = report_wizard()?;
    let mut steps = Vec::new();

    info!("[PHASE: smoke] [STEP: criteria] Filling selection criteria");
    forms.criteria.date_from = NaiveDate::from_ymd_opt(2024, 1, 1);
    forms.criteria.date_to = NaiveDate::from_ymd_opt(2024, 1, 31);
    forms.criteria.toggle_machine("MACHINE-001");
    forms.criteria.toggle_machine("MACHINE-002");
    forms.criteria.report_type = Some(ReportType::ProductionSummary);
    advance(&mut wizard, &forms, &mut steps)?;

    // Template: keep the preselected first entry.
    advance(&mut wizard, &forms, &mut steps)?;

    info!("[PHASE: smoke] [STEP: preview] Excluding the first preview row");
    if let Some(id) = forms.preview.page_rows().first().map(|r| r.id.clone()) {
        forms.preview.toggle_row(&id);
    }
    advance(&mut wizard, &forms, &mut steps)?;

    info!("[PHASE: smoke] [STEP: charts] Enabling a bar chart");
    forms.charts.set_include_charts(true);
    forms.charts.chart_type = Some(ChartType::Bar);
    forms.charts.x_field = Some(XField::Name);
    forms.charts.y_field = Some(YField::Value);
    forms.charts.color_scheme = Some(ColorScheme::Default);
    advance(&mut wizard, &forms, &mut steps)?;

    forms.output.format = Some(OutputFormat::Pdf);
    steps.push(wizard.state().current_label().to_string());
    let draft = wizard
        .submit(&forms, |draft| draft.clone())
        .map_err(|e| anyhow::anyhow!("wizard smoke could not submit: {}", e))?;

    let backend = StubReportBackend::new(forms.templates().to_vec(), config.submit_delay());
    let handle = submit_with_timeout(&backend, &draft)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e.user_message()))?;

    info!(
        "[PHASE: smoke] [STEP: complete] Wizard smoke produced {}",
        handle.output_file()
    );
    Ok(WizardTranscript {
        steps,
        draft,
        handle,
    })
}

fn advance(
    wizard: &mut ReportWizard,
    forms: &ReportForms,
    steps: &mut Vec<String>,
) -> Result<()> {
    let label = wizard.state().current_label().to_string();
    wizard
        .next(forms)
        .map_err(|errors| anyhow::anyhow!("step '{}' did not validate: {}", label, errors))?;
    steps.push(label);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config() -> AppConfig {
        AppConfig {
            submit_delay_ms: 0,
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn canonical_scenario_completes_every_step() {
        let transcript = wizard_smoke(&fast_config()).await.unwrap();

        assert_eq!(transcript.steps.len(), 5);
        assert_eq!(transcript.steps[4], "Output Options");
        assert!(transcript.draft.is_complete());

        let criteria = transcript.draft.criteria.as_ref().unwrap();
        assert_eq!(criteria.machine_ids, vec!["MACHINE-001", "MACHINE-002"]);
        let preview = transcript.draft.preview.as_ref().unwrap();
        assert_eq!(preview.selected_row_ids.len(), 49);
        assert!(transcript.draft.charts.as_ref().unwrap().charts.is_some());

        assert_eq!(transcript.handle.format, OutputFormat::Pdf);
        assert_eq!(transcript.handle.title, "Report Generation Started");
    }

    #[tokio::test]
    async fn scenario_is_deterministic_for_a_seed() {
        let a = wizard_smoke(&fast_config()).await.unwrap();
        let b = wizard_smoke(&fast_config()).await.unwrap();
        assert_eq!(
            a.draft.preview.unwrap().selected_row_ids,
            b.draft.preview.unwrap().selected_row_ids
        );
    }
}
