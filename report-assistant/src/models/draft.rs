// Report draft model
//
// The committed value of every wizard step, plus the draft that accumulates them.

use crate::wizard::Draft;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    ProductionSummary,
    DowntimeAnalysis,
    QualityMetrics,
}

impl ReportType {
    pub const ALL: [ReportType; 3] = [
        ReportType::ProductionSummary,
        ReportType::DowntimeAnalysis,
        ReportType::QualityMetrics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::ProductionSummary => "Production Summary",
            ReportType::DowntimeAnalysis => "Downtime Analysis",
            ReportType::QualityMetrics => "Quality Metrics",
        }
    }

    pub fn as_id(&self) -> &'static str {
        match self {
            ReportType::ProductionSummary => "production_summary",
            ReportType::DowntimeAnalysis => "downtime_analysis",
            ReportType::QualityMetrics => "quality_metrics",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_id() == id.trim())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Bar,
    Line,
    Pie,
}

impl ChartType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Bar => "Bar Chart",
            ChartType::Line => "Line Chart",
            ChartType::Pie => "Pie Chart",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            ChartType::Bar => ChartType::Line,
            ChartType::Line => ChartType::Pie,
            ChartType::Pie => ChartType::Bar,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum XField {
    Name,
    Timestamp,
    Category,
}

impl XField {
    pub fn as_str(&self) -> &'static str {
        match self {
            XField::Name => "Machine Name",
            XField::Timestamp => "Timestamp",
            XField::Category => "Category",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            XField::Name => XField::Timestamp,
            XField::Timestamp => XField::Category,
            XField::Category => XField::Name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YField {
    Value,
    Count,
    Duration,
}

impl YField {
    pub fn as_str(&self) -> &'static str {
        match self {
            YField::Value => "Value",
            YField::Count => "Count",
            YField::Duration => "Duration",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            YField::Value => YField::Count,
            YField::Count => YField::Duration,
            YField::Duration => YField::Value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColorScheme {
    Default,
    BlueScale,
    GreenScale,
    Monochrome,
}

impl ColorScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorScheme::Default => "Default",
            ColorScheme::BlueScale => "Blue Scale",
            ColorScheme::GreenScale => "Green Scale",
            ColorScheme::Monochrome => "Monochrome",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            ColorScheme::Default => ColorScheme::BlueScale,
            ColorScheme::BlueScale => ColorScheme::GreenScale,
            ColorScheme::GreenScale => ColorScheme::Monochrome,
            ColorScheme::Monochrome => ColorScheme::Default,
        }
    }

    /// Series colors as RGB triples.
    pub fn palette(&self) -> [(u8, u8, u8); 5] {
        match self {
            ColorScheme::Default => [
                (0x00, 0x88, 0xFE),
                (0x00, 0xC4, 0x9F),
                (0xFF, 0xBB, 0x28),
                (0xFF, 0x80, 0x42),
                (0x88, 0x84, 0xD8),
            ],
            ColorScheme::BlueScale => [
                (0x08, 0x30, 0x6B),
                (0x08, 0x51, 0x9C),
                (0x21, 0x71, 0xB5),
                (0x42, 0x92, 0xC6),
                (0x6B, 0xAE, 0xD6),
            ],
            ColorScheme::GreenScale => [
                (0x00, 0x44, 0x1B),
                (0x00, 0x6D, 0x2C),
                (0x23, 0x8B, 0x45),
                (0x41, 0xAB, 0x5D),
                (0x74, 0xC4, 0x76),
            ],
            ColorScheme::Monochrome => [
                (0x25, 0x25, 0x25),
                (0x52, 0x52, 0x52),
                (0x73, 0x73, 0x73),
                (0x96, 0x96, 0x96),
                (0xBD, 0xBD, 0xBD),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Pdf,
    Csv,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "PDF Document",
            OutputFormat::Csv => "CSV File",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Csv => "csv",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            OutputFormat::Pdf => OutputFormat::Csv,
            OutputFormat::Csv => OutputFormat::Pdf,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriteriaValue {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub machine_ids: Vec<String>,
    pub report_type: ReportType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateValue {
    pub template_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewValue {
    pub selected_row_ids: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    pub chart_type: ChartType,
    pub x_field: XField,
    pub y_field: YField,
    pub color_scheme: ColorScheme,
}

/// `charts` is `None` when charts are excluded from the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartsValue {
    pub charts: Option<ChartSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailDispatch {
    pub recipients: Vec<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputValue {
    pub format: OutputFormat,
    pub file_name: String,
    pub location: Option<String>,
    pub email: Option<EmailDispatch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", content = "value", rename_all = "camelCase")]
pub enum StepValue {
    Criteria(CriteriaValue),
    Template(TemplateValue),
    Preview(PreviewValue),
    Charts(ChartsValue),
    Output(OutputValue),
}

/// Last valid value of each wizard step. Lives only as long as the wizard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDraft {
    pub criteria: Option<CriteriaValue>,
    pub template: Option<TemplateValue>,
    pub preview: Option<PreviewValue>,
    pub charts: Option<ChartsValue>,
    pub output: Option<OutputValue>,
}

impl Draft for ReportDraft {
    type Value = StepValue;

    fn commit(&mut self, value: StepValue) {
        match value {
            StepValue::Criteria(v) => self.criteria = Some(v),
            StepValue::Template(v) => self.template = Some(v),
            StepValue::Preview(v) => self.preview = Some(v),
            StepValue::Charts(v) => self.charts = Some(v),
            StepValue::Output(v) => self.output = Some(v),
        }
    }

    fn clear(&mut self, step: usize) {
        match step {
            0 => self.criteria = None,
            1 => self.template = None,
            2 => self.preview = None,
            3 => self.charts = None,
            4 => self.output = None,
            _ => {}
        }
    }
}

impl ReportDraft {
    /// Names of steps that have no committed value yet.
    pub fn missing_steps(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.criteria.is_none() {
            missing.push("criteria");
        }
        if self.template.is_none() {
            missing.push("template");
        }
        if self.preview.is_none() {
            missing.push("preview");
        }
        if self.charts.is_none() {
            missing.push("charts");
        }
        if self.output.is_none() {
            missing.push("output");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_steps().is_empty()
    }
}
