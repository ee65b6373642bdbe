// Panel domain model - Grafana panel schema
use super::unit::Unit;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Reference to a datasource, usually a template variable such as `${DS_PROMETHEUS}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataSourceRef {
    pub uid: String,
}

impl DataSourceRef {
    pub fn new(uid: impl Into<String>) -> Self {
        Self { uid: uid.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelKind {
    Stat,
    #[serde(rename = "timeseries")]
    TimeSeries,
    Table,
    #[serde(rename = "bargauge")]
    BarGauge,
    #[serde(rename = "piechart")]
    PieChart,
    Row,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GridPos {
    pub h: u32,
    pub w: u32,
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TargetFormat {
    #[serde(rename = "table")]
    Table,
}

/// A single PromQL query attached to a panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datasource: Option<DataSourceRef>,
    pub expr: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<TargetFormat>,
    pub instant: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend_format: Option<String>,
    pub range: bool,
    pub ref_id: String,
}

impl Target {
    /// Range query, evaluated over the dashboard time window.
    pub fn range(expr: impl Into<String>) -> Self {
        Self {
            datasource: None,
            expr: expr.into(),
            format: None,
            instant: false,
            legend_format: None,
            range: true,
            ref_id: String::new(),
        }
    }

    /// Instant query, evaluated once at the end of the window.
    pub fn instant(expr: impl Into<String>) -> Self {
        Self {
            instant: true,
            range: false,
            ..Self::range(expr)
        }
    }

    pub fn legend(mut self, legend_format: impl Into<String>) -> Self {
        self.legend_format = Some(legend_format.into());
        self
    }

    pub fn format(mut self, format: TargetFormat) -> Self {
        self.format = Some(format);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdsMode {
    Absolute,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdStep {
    pub color: String,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Thresholds {
    pub mode: ThresholdsMode,
    pub steps: Vec<ThresholdStep>,
}

impl Thresholds {
    /// Absolute thresholds starting at `base` with `(value, color)` steps above it.
    pub fn absolute(base: &str, steps: &[(f64, &str)]) -> Self {
        let mut all = vec![ThresholdStep {
            color: base.to_string(),
            value: None,
        }];
        all.extend(steps.iter().map(|(value, color)| ThresholdStep {
            color: color.to_string(),
            value: Some(*value),
        }));
        Self {
            mode: ThresholdsMode::Absolute,
            steps: all,
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::absolute("green", &[(80.0, "red")])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MappingKind {
    Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappingResult {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueMapping {
    #[serde(rename = "type")]
    pub kind: MappingKind,
    pub options: BTreeMap<String, MappingResult>,
}

impl ValueMapping {
    /// Value-to-text mapping; `entries` are `(raw value, display text, color)`.
    pub fn value_to_text(entries: &[(&str, &str, Option<&str>)]) -> Self {
        let options = entries
            .iter()
            .enumerate()
            .map(|(i, (raw, text, color))| {
                let result = MappingResult {
                    text: text.to_string(),
                    color: color.map(str::to_string),
                    index: color.map(|_| i as u32),
                };
                (raw.to_string(), result)
            })
            .collect();
        Self {
            kind: MappingKind::Value,
            options,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColorMode {
    #[serde(rename = "thresholds")]
    Thresholds,
    #[serde(rename = "palette-classic")]
    PaletteClassic,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldColor {
    pub mode: ColorMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_color: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawStyle {
    Line,
    Bars,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesCustom {
    pub draw_style: DrawStyle,
    pub fill_opacity: u32,
    pub line_width: u32,
    pub show_points: String,
    pub span_nulls: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCustom {
    pub align: String,
    pub cell_options: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldCustom {
    TimeSeries(TimeSeriesCustom),
    Table(TableCustom),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDefaults {
    pub color: FieldColor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom: Option<FieldCustom>,
    pub mappings: Vec<ValueMapping>,
    pub thresholds: Thresholds,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Matcher {
    pub id: String,
    pub options: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    pub id: String,
    pub value: Value,
}

impl Property {
    pub fn new(id: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
        }
    }

    pub fn fixed_color(color: &str) -> Self {
        Self::new(
            "color",
            serde_json::json!({ "mode": "fixed", "fixedColor": color }),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldOverride {
    pub matcher: Matcher,
    pub properties: Vec<Property>,
}

impl FieldOverride {
    /// Override applied to the series or column with the given display name.
    pub fn by_name(name: &str, properties: Vec<Property>) -> Self {
        Self {
            matcher: Matcher {
                id: "byName".to_string(),
                options: name.to_string(),
            },
            properties,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldConfig {
    pub defaults: FieldDefaults,
    pub overrides: Vec<FieldOverride>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ReduceCalc {
    LastNotNull,
    Mean,
    Min,
    Max,
    Sum,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReduceOptions {
    pub calcs: Vec<ReduceCalc>,
    pub fields: String,
    pub values: bool,
}

impl ReduceOptions {
    pub fn calc(calc: ReduceCalc) -> Self {
        Self {
            calcs: vec![calc],
            fields: String::new(),
            values: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendDisplayMode {
    List,
    Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPlacement {
    Bottom,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendOptions {
    pub calcs: Vec<ReduceCalc>,
    pub display_mode: LegendDisplayMode,
    pub placement: LegendPlacement,
    pub show_legend: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

impl Default for LegendOptions {
    fn default() -> Self {
        Self {
            calcs: Vec::new(),
            display_mode: LegendDisplayMode::List,
            placement: LegendPlacement::Bottom,
            show_legend: true,
            values: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipOptions {
    pub mode: String,
    pub sort: String,
}

impl Default for TooltipOptions {
    fn default() -> Self {
        Self {
            mode: "multi".to_string(),
            sort: "none".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Auto,
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CellHeight {
    Sm,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatOptions {
    pub color_mode: String,
    pub graph_mode: String,
    pub justify_mode: String,
    pub orientation: Orientation,
    pub reduce_options: ReduceOptions,
    pub text_mode: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesOptions {
    pub legend: LegendOptions,
    pub tooltip: TooltipOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarGaugeOptions {
    pub display_mode: String,
    pub orientation: Orientation,
    pub reduce_options: ReduceOptions,
    pub show_unfilled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieChartOptions {
    pub legend: LegendOptions,
    pub pie_type: String,
    pub reduce_options: ReduceOptions,
    pub tooltip: TooltipOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableOptions {
    pub cell_height: CellHeight,
    pub show_header: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PanelOptions {
    Stat(StatOptions),
    TimeSeries(TimeSeriesOptions),
    BarGauge(BarGaugeOptions),
    PieChart(PieChartOptions),
    Table(TableOptions),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizeOptions {
    pub exclude_by_name: BTreeMap<String, bool>,
    pub index_by_name: BTreeMap<String, u32>,
    pub rename_by_name: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "id", content = "options", rename_all = "lowercase")]
pub enum Transformation {
    Organize(OrganizeOptions),
}

/// A dashboard panel. Row panels carry no field config, options or targets.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datasource: Option<DataSourceRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_config: Option<FieldConfig>,
    pub grid_pos: GridPos,
    pub id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<PanelOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub panels: Option<Vec<Panel>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<Target>,
    pub title: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub transformations: Vec<Transformation>,
    #[serde(rename = "type")]
    pub kind: PanelKind,
}

impl Panel {
    /// Collapsible section header spanning the full grid width.
    pub fn row(title: impl Into<String>) -> Self {
        Self {
            collapsed: Some(false),
            datasource: None,
            description: None,
            field_config: None,
            grid_pos: GridPos::default(),
            id: 0,
            options: None,
            panels: Some(Vec::new()),
            targets: Vec::new(),
            title: title.into(),
            transformations: Vec::new(),
            kind: PanelKind::Row,
        }
    }
}
