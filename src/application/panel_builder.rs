// Panel builders - typed constructors for each Grafana visualization
use crate::domain::panel::{
    BarGaugeOptions, CellHeight, ColorMode, DrawStyle, FieldColor, FieldConfig, FieldCustom,
    FieldDefaults, FieldOverride, GridPos, LegendOptions, LegendPlacement, Orientation, Panel, PanelKind,
    PanelOptions, PieChartOptions, ReduceCalc, ReduceOptions, StatOptions, TableCustom,
    TableOptions, Target, Thresholds, TimeSeriesCustom, TimeSeriesOptions, TooltipOptions,
    Transformation, ValueMapping,
};
use crate::domain::unit::Unit;
use std::collections::BTreeMap;

struct Common {
    title: String,
    description: Option<String>,
    targets: Vec<Target>,
    unit: Option<Unit>,
    color: ColorMode,
    custom: Option<FieldCustom>,
    mappings: Vec<ValueMapping>,
    thresholds: Option<Thresholds>,
    overrides: Vec<FieldOverride>,
}

impl Common {
    fn into_panel(self, kind: PanelKind, options: PanelOptions, transformations: Vec<Transformation>) -> Panel {
        Panel {
            collapsed: None,
            datasource: None,
            description: self.description,
            field_config: Some(FieldConfig {
                defaults: FieldDefaults {
                    color: FieldColor {
                        mode: self.color,
                        fixed_color: None,
                    },
                    custom: self.custom,
                    mappings: self.mappings,
                    thresholds: self.thresholds.unwrap_or_default(),
                    unit: self.unit,
                },
                overrides: self.overrides,
            }),
            grid_pos: GridPos::default(),
            id: 0,
            options: Some(options),
            panels: None,
            targets: self.targets,
            title: self.title,
            transformations,
            kind,
        }
    }
}

/// Single big number, reduced from the query result.
#[derive(Debug, Clone)]
pub struct StatPanel {
    pub title: String,
    pub description: Option<String>,
    pub targets: Vec<Target>,
    pub unit: Unit,
    pub reduce_calc: ReduceCalc,
    pub mappings: Vec<ValueMapping>,
    pub thresholds: Option<Thresholds>,
}

impl Default for StatPanel {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: None,
            targets: Vec::new(),
            unit: Unit::Short,
            reduce_calc: ReduceCalc::LastNotNull,
            mappings: Vec::new(),
            thresholds: None,
        }
    }
}

impl StatPanel {
    pub fn build(self) -> Panel {
        let options = PanelOptions::Stat(StatOptions {
            color_mode: "value".to_string(),
            graph_mode: "area".to_string(),
            justify_mode: "auto".to_string(),
            orientation: Orientation::Auto,
            reduce_options: ReduceOptions::calc(self.reduce_calc),
            text_mode: "auto".to_string(),
        });
        Common {
            title: self.title,
            description: self.description,
            targets: self.targets,
            unit: Some(self.unit),
            color: ColorMode::Thresholds,
            custom: None,
            mappings: self.mappings,
            thresholds: self.thresholds,
            overrides: Vec::new(),
        }
        .into_panel(PanelKind::Stat, options, Vec::new())
    }
}

#[derive(Debug, Clone)]
pub struct TimeSeriesPanel {
    pub title: String,
    pub targets: Vec<Target>,
    pub unit: Unit,
    pub draw_style: DrawStyle,
    pub legend: LegendOptions,
    pub thresholds: Option<Thresholds>,
    pub overrides: Vec<FieldOverride>,
}

impl Default for TimeSeriesPanel {
    fn default() -> Self {
        Self {
            title: String::new(),
            targets: Vec::new(),
            unit: Unit::Short,
            draw_style: DrawStyle::Line,
            legend: LegendOptions::default(),
            thresholds: None,
            overrides: Vec::new(),
        }
    }
}

impl TimeSeriesPanel {
    pub fn build(self) -> Panel {
        let fill_opacity = match self.draw_style {
            DrawStyle::Line => 10,
            DrawStyle::Bars => 80,
        };
        let custom = FieldCustom::TimeSeries(TimeSeriesCustom {
            draw_style: self.draw_style,
            fill_opacity,
            line_width: 1,
            show_points: "auto".to_string(),
            span_nulls: false,
        });
        let options = PanelOptions::TimeSeries(TimeSeriesOptions {
            legend: self.legend,
            tooltip: TooltipOptions::default(),
        });
        Common {
            title: self.title,
            description: None,
            targets: self.targets,
            unit: Some(self.unit),
            color: ColorMode::PaletteClassic,
            custom: Some(custom),
            mappings: Vec::new(),
            thresholds: self.thresholds,
            overrides: self.overrides,
        }
        .into_panel(PanelKind::TimeSeries, options, Vec::new())
    }
}

#[derive(Debug, Clone)]
pub struct BarGaugePanel {
    pub title: String,
    pub targets: Vec<Target>,
    pub unit: Unit,
    pub orientation: Orientation,
    pub thresholds: Option<Thresholds>,
    pub overrides: Vec<FieldOverride>,
}

impl Default for BarGaugePanel {
    fn default() -> Self {
        Self {
            title: String::new(),
            targets: Vec::new(),
            unit: Unit::Short,
            orientation: Orientation::Auto,
            thresholds: None,
            overrides: Vec::new(),
        }
    }
}

impl BarGaugePanel {
    pub fn build(self) -> Panel {
        let options = PanelOptions::BarGauge(BarGaugeOptions {
            display_mode: "gradient".to_string(),
            orientation: self.orientation,
            reduce_options: ReduceOptions::calc(ReduceCalc::LastNotNull),
            show_unfilled: true,
        });
        Common {
            title: self.title,
            description: None,
            targets: self.targets,
            unit: Some(self.unit),
            color: ColorMode::Thresholds,
            custom: None,
            mappings: Vec::new(),
            thresholds: self.thresholds,
            overrides: self.overrides,
        }
        .into_panel(PanelKind::BarGauge, options, Vec::new())
    }
}

#[derive(Debug, Clone)]
pub struct PieChartPanel {
    pub title: String,
    pub targets: Vec<Target>,
    pub unit: Unit,
}

impl Default for PieChartPanel {
    fn default() -> Self {
        Self {
            title: String::new(),
            targets: Vec::new(),
            unit: Unit::Short,
        }
    }
}

impl PieChartPanel {
    pub fn build(self) -> Panel {
        let options = PanelOptions::PieChart(PieChartOptions {
            legend: LegendOptions {
                placement: LegendPlacement::Right,
                values: vec!["value".to_string()],
                ..LegendOptions::default()
            },
            pie_type: "pie".to_string(),
            reduce_options: ReduceOptions::calc(ReduceCalc::LastNotNull),
            tooltip: TooltipOptions::default(),
        });
        Common {
            title: self.title,
            description: None,
            targets: self.targets,
            unit: Some(self.unit),
            color: ColorMode::PaletteClassic,
            custom: None,
            mappings: Vec::new(),
            thresholds: None,
            overrides: Vec::new(),
        }
        .into_panel(PanelKind::PieChart, options, Vec::new())
    }
}

#[derive(Debug, Clone)]
pub struct TablePanel {
    pub title: String,
    pub targets: Vec<Target>,
    pub cell_height: CellHeight,
    pub overrides: Vec<FieldOverride>,
    pub transformations: Vec<Transformation>,
}

impl Default for TablePanel {
    fn default() -> Self {
        Self {
            title: String::new(),
            targets: Vec::new(),
            cell_height: CellHeight::Sm,
            overrides: Vec::new(),
            transformations: Vec::new(),
        }
    }
}

impl TablePanel {
    pub fn build(self) -> Panel {
        let custom = FieldCustom::Table(TableCustom {
            align: "auto".to_string(),
            cell_options: serde_json::json!({ "type": "auto" }),
        });
        let options = PanelOptions::Table(TableOptions {
            cell_height: self.cell_height,
            show_header: true,
        });
        Common {
            title: self.title,
            description: None,
            targets: self.targets,
            unit: None,
            color: ColorMode::Thresholds,
            custom: Some(custom),
            mappings: Vec::new(),
            thresholds: None,
            overrides: self.overrides,
        }
        .into_panel(PanelKind::Table, options, self.transformations)
    }
}

/// Columns to hide in an `organize` transformation.
pub fn table_exclude_by_name(names: &[&str]) -> BTreeMap<String, bool> {
    names.iter().map(|name| (name.to_string(), true)).collect()
}

/// Column order for an `organize` transformation, in the order given.
pub fn table_index_by_name(names: &[&str]) -> BTreeMap<String, u32> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| (name.to_string(), i as u32))
        .collect()
}
