// Dashboard domain model
use super::layout::{LayoutItem, auto_layout};
use super::panel::{DataSourceRef, Panel};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

pub const SCHEMA_VERSION: u32 = 39;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeRange {
    pub from: String,
    pub to: String,
}

impl TimeRange {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// How the cursor is shared between panels. Grafana stores this as an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphTooltip {
    Crosshair = 1,
}

impl Serialize for GraphTooltip {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    Datasource,
    Query,
}

/// A dashboard-level variable, resolved by Grafana at view time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateVariable {
    pub current: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datasource: Option<DataSourceRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    pub hide: u8,
    pub include_all: bool,
    pub label: String,
    pub multi: bool,
    pub name: String,
    pub options: Vec<Value>,
    pub query: String,
    pub refresh: u8,
    pub regex: String,
    pub sort: u8,
    #[serde(rename = "type")]
    pub kind: VariableKind,
}

impl TemplateVariable {
    /// Datasource picker restricted to Prometheus datasources.
    pub fn prometheus_datasource(name: &str, label: &str) -> Self {
        Self {
            current: Map::new(),
            datasource: None,
            definition: None,
            hide: 0,
            include_all: false,
            label: label.to_string(),
            multi: false,
            name: name.to_string(),
            options: Vec::new(),
            query: "prometheus".to_string(),
            refresh: 1,
            regex: String::new(),
            sort: 0,
            kind: VariableKind::Datasource,
        }
    }

    /// Variable whose values come from a datasource query, refreshed on dashboard load.
    pub fn query(datasource: DataSourceRef, name: &str, label: &str, query: &str) -> Self {
        Self {
            current: Map::new(),
            datasource: Some(datasource),
            definition: Some(query.to_string()),
            hide: 0,
            include_all: false,
            label: label.to_string(),
            multi: false,
            name: name.to_string(),
            options: Vec::new(),
            query: query.to_string(),
            refresh: 1,
            regex: String::new(),
            sort: 0,
            kind: VariableKind::Query,
        }
    }

    pub fn multi(mut self, include_all: bool) -> Self {
        self.multi = true;
        self.include_all = include_all;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Templating {
    pub list: Vec<TemplateVariable>,
}

/// Identity and presentation metadata of a dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardMeta {
    pub title: String,
    pub uid: String,
    pub description: String,
    pub tags: Vec<String>,
    pub graph_tooltip: GraphTooltip,
    pub version: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub description: String,
    pub editable: bool,
    pub fiscal_year_start_month: u8,
    pub graph_tooltip: GraphTooltip,
    pub links: Vec<Value>,
    pub live_now: bool,
    pub panels: Vec<Panel>,
    pub refresh: String,
    pub schema_version: u32,
    pub tags: Vec<String>,
    pub templating: Templating,
    pub time: TimeRange,
    pub timepicker: Map<String, Value>,
    pub timezone: String,
    pub title: String,
    pub uid: String,
    pub version: u32,
    pub week_start: String,
}

impl Dashboard {
    /// Lay out the panel tree and combine it with variables and time range.
    pub fn assemble(
        meta: DashboardMeta,
        items: Vec<LayoutItem>,
        variables: Vec<TemplateVariable>,
        time: TimeRange,
    ) -> Self {
        Self {
            description: meta.description,
            editable: true,
            fiscal_year_start_month: 0,
            graph_tooltip: meta.graph_tooltip,
            links: Vec::new(),
            live_now: false,
            panels: auto_layout(items),
            refresh: String::new(),
            schema_version: SCHEMA_VERSION,
            tags: meta.tags,
            templating: Templating { list: variables },
            time,
            timepicker: Map::new(),
            timezone: "browser".to_string(),
            title: meta.title,
            uid: meta.uid,
            version: meta.version,
            week_start: String::new(),
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
