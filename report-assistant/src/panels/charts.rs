// Step 4: chart configuration and live preview

use crate::models::draft::{ChartSpec, ChartType, ChartsValue, ColorScheme, XField, YField};
use crate::models::records::ChartPoint;
use crate::utils::validation::FieldErrors;

pub const FIELD_CHART_TYPE: &str = "chartType";
pub const FIELD_X_AXIS: &str = "xAxisField";
pub const FIELD_Y_AXIS: &str = "yAxisField";
pub const FIELD_COLOR_SCHEME: &str = "colorScheme";

pub const DEFAULT_CHART: ChartSpec = ChartSpec {
    chart_type: ChartType::Bar,
    x_field: XField::Name,
    y_field: YField::Value,
    color_scheme: ColorScheme::Default,
};

/// Chart sub-fields are only meaningful while `include_charts` is on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartForm {
    include_charts: bool,
    pub chart_type: Option<ChartType>,
    pub x_field: Option<XField>,
    pub y_field: Option<YField>,
    pub color_scheme: Option<ColorScheme>,
}

impl Default for ChartForm {
    fn default() -> Self {
        Self {
            include_charts: false,
            chart_type: Some(DEFAULT_CHART.chart_type),
            x_field: Some(DEFAULT_CHART.x_field),
            y_field: Some(DEFAULT_CHART.y_field),
            color_scheme: Some(DEFAULT_CHART.color_scheme),
        }
    }
}

impl ChartForm {
    pub fn include_charts(&self) -> bool {
        self.include_charts
    }

    /// Turning charts on always starts from the default configuration.
    pub fn set_include_charts(&mut self, include: bool) {
        if include && !self.include_charts {
            *self = Self {
                include_charts: true,
                ..Self::default()
            };
        } else {
            self.include_charts = include;
        }
    }

    pub fn toggle_include_charts(&mut self) {
        self.set_include_charts(!self.include_charts);
    }

    pub fn cycle_chart_type(&mut self) {
        self.chart_type = Some(self.chart_type.map_or(DEFAULT_CHART.chart_type, |c| c.next()));
    }

    pub fn cycle_x_field(&mut self) {
        self.x_field = Some(self.x_field.map_or(DEFAULT_CHART.x_field, |x| x.next()));
    }

    pub fn cycle_y_field(&mut self) {
        self.y_field = Some(self.y_field.map_or(DEFAULT_CHART.y_field, |y| y.next()));
    }

    pub fn cycle_color_scheme(&mut self) {
        self.color_scheme = Some(
            self.color_scheme
                .map_or(DEFAULT_CHART.color_scheme, |c| c.next()),
        );
    }

    pub fn validate(&self) -> Result<ChartsValue, FieldErrors> {
        if !self.include_charts {
            return Ok(ChartsValue { charts: None });
        }

        let mut errors = FieldErrors::new();
        if self.chart_type.is_none() {
            errors.add(FIELD_CHART_TYPE, "Chart type is required.");
        }
        if self.x_field.is_none() {
            errors.add(FIELD_X_AXIS, "X-axis field is required.");
        }
        if self.y_field.is_none() {
            errors.add(FIELD_Y_AXIS, "Y-axis field is required.");
        }
        if self.color_scheme.is_none() {
            errors.add(FIELD_COLOR_SCHEME, "Color scheme is required.");
        }

        match (self.chart_type, self.x_field, self.y_field, self.color_scheme) {
            (Some(chart_type), Some(x_field), Some(y_field), Some(color_scheme)) => {
                Ok(ChartsValue {
                    charts: Some(ChartSpec {
                        chart_type,
                        x_field,
                        y_field,
                        color_scheme,
                    }),
                })
            }
            _ => Err(errors),
        }
    }

    /// Preview of the current configuration over `series`. `None` while charts are off.
    pub fn preview(&self, series: &[ChartPoint]) -> Option<ChartPreview> {
        if !self.include_charts {
            return None;
        }
        let spec = ChartSpec {
            chart_type: self.chart_type.unwrap_or(DEFAULT_CHART.chart_type),
            x_field: self.x_field.unwrap_or(DEFAULT_CHART.x_field),
            y_field: self.y_field.unwrap_or(DEFAULT_CHART.y_field),
            color_scheme: self.color_scheme.unwrap_or(DEFAULT_CHART.color_scheme),
        };
        Some(ChartPreview::build(spec, series))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPreview {
    pub spec: ChartSpec,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    /// One color per point, cycling through the scheme's palette.
    pub colors: Vec<(u8, u8, u8)>,
}

impl ChartPreview {
    pub fn build(spec: ChartSpec, series: &[ChartPoint]) -> Self {
        let palette = spec.color_scheme.palette();
        let labels = series
            .iter()
            .map(|p| match spec.x_field {
                XField::Name => p.name.clone(),
                XField::Timestamp => p.timestamp.clone(),
                XField::Category => p.category.clone(),
            })
            .collect();
        let values = series
            .iter()
            .map(|p| match spec.y_field {
                YField::Value => p.value,
                YField::Count => p.count,
                YField::Duration => p.duration,
            })
            .collect();
        let colors = (0..series.len())
            .map(|i| palette[i % palette.len()])
            .collect();

        Self {
            spec,
            labels,
            values,
            colors,
        }
    }

    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    /// Share of each slice in whole percent, as the pie legend shows it.
    pub fn percentages(&self) -> Vec<u64> {
        let total: f64 = self.values.iter().sum();
        self.values
            .iter()
            .map(|v| {
                if total > 0.0 {
                    (v / total * 100.0).round() as u64
                } else {
                    0
                }
            })
            .collect()
    }
}
