// Router Monitor dashboard - panel composition and final assembly
use crate::application::panel_builder::{
    BarGaugePanel, PieChartPanel, StatPanel, TablePanel, TimeSeriesPanel, table_exclude_by_name,
    table_index_by_name,
};
use crate::application::traffic_query::{Aggregation, Direction, TrafficScope, Window};
use crate::domain::dashboard::{Dashboard, DashboardMeta, GraphTooltip, TemplateVariable, TimeRange};
use crate::domain::layout::{LayoutItem, PanelGroup, PanelRow};
use crate::domain::panel::{
    CellHeight, DataSourceRef, DrawStyle, FieldOverride, LegendDisplayMode, LegendOptions,
    LegendPlacement, OrganizeOptions, Orientation, Panel, Property, ReduceCalc, Target,
    TargetFormat, Thresholds, Transformation, ValueMapping,
};
use crate::domain::unit::Unit;
use serde_json::json;

pub const DATASOURCE_UID: &str = "${DS_PROMETHEUS}";
const DEVICE_LEGEND: &str = "{{ hostname }} ({{ ip_addr }})";

fn datasource() -> Option<DataSourceRef> {
    Some(DataSourceRef::new(DATASOURCE_UID))
}

fn row(height: u32, panels: Vec<Panel>) -> PanelRow {
    PanelRow::new(datasource(), height, panels)
}

fn traffic_target(direction: Direction, scope: TrafficScope, window: Window, aggregation: Aggregation) -> Target {
    let query = direction.query(scope, window, aggregation);
    let target = match window {
        Window::Range => Target::instant(query.render()),
        _ => Target::range(query.render()),
    };
    target.legend(DEVICE_LEGEND)
}

fn green_only() -> Option<Thresholds> {
    Some(Thresholds::absolute("green", &[]))
}

fn total_bytes_pie_chart(direction: Direction) -> Panel {
    PieChartPanel {
        title: format!("Total Bytes {}ed - by local IP (pie chart)", direction.verb()),
        targets: vec![traffic_target(direction, TrafficScope::PerLocalIp, Window::Range, Aggregation::Increase)],
        unit: Aggregation::Increase.unit(),
    }
    .build()
}

fn total_bytes_bar_gauge(direction: Direction) -> Panel {
    BarGaugePanel {
        title: format!("Total Bytes {}ed - by local IP (bar gauge)", direction.verb()),
        targets: vec![traffic_target(direction, TrafficScope::PerLocalIp, Window::Range, Aggregation::Increase)],
        unit: Aggregation::Increase.unit(),
        orientation: Orientation::Horizontal,
        thresholds: green_only(),
        ..Default::default()
    }
    .build()
}

fn total_bytes_time_series(title: &str, direction: Direction, scope: TrafficScope) -> Panel {
    TimeSeriesPanel {
        title: title.to_string(),
        targets: vec![traffic_target(direction, scope, Window::Interval, Aggregation::Increase)],
        unit: Aggregation::Increase.unit(),
        draw_style: DrawStyle::Bars,
        legend: LegendOptions {
            calcs: vec![ReduceCalc::Sum],
            display_mode: LegendDisplayMode::Table,
            placement: LegendPlacement::Bottom,
            ..LegendOptions::default()
        },
        thresholds: green_only(),
        ..Default::default()
    }
    .build()
}

fn data_rate_time_series(title: &str, direction: Direction, scope: TrafficScope) -> Panel {
    TimeSeriesPanel {
        title: title.to_string(),
        targets: vec![traffic_target(direction, scope, Window::RateInterval, Aggregation::Rate)],
        unit: Aggregation::Rate.unit(),
        legend: LegendOptions {
            calcs: vec![ReduceCalc::Mean, ReduceCalc::Min, ReduceCalc::Max],
            display_mode: LegendDisplayMode::Table,
            placement: LegendPlacement::Bottom,
            ..LegendOptions::default()
        },
        thresholds: green_only(),
        ..Default::default()
    }
    .build()
}

fn network_traffic_rows() -> Vec<PanelRow> {
    use Direction::{Download, Upload};
    use TrafficScope::{InternetTotal, PerLocalIp};

    vec![
        row(12, Direction::ALL.iter().map(|d| total_bytes_pie_chart(*d)).collect()),
        row(12, Direction::ALL.iter().map(|d| total_bytes_bar_gauge(*d)).collect()),
        row(
            12,
            vec![
                total_bytes_time_series("Total bytes downloaded - by local IP", Download, PerLocalIp),
                total_bytes_time_series("Total bytes uploaded - by local IP", Upload, PerLocalIp),
                data_rate_time_series("Download Data Rate - by local IP", Download, PerLocalIp),
                data_rate_time_series("Upload Data Rate - by local IP", Upload, PerLocalIp),
            ],
        ),
        row(
            10,
            vec![
                total_bytes_time_series("Total bytes downloaded", Download, InternetTotal),
                total_bytes_time_series("Total bytes uploaded", Upload, InternetTotal),
                data_rate_time_series("Download Data Rate", Download, InternetTotal),
                data_rate_time_series("Upload Data Rate", Upload, InternetTotal),
            ],
        ),
    ]
}

fn overview_row() -> PanelRow {
    let internet = StatPanel {
        title: "Internet".to_string(),
        targets: vec![Target::range(r#"router_monitor_internet_connection_is_up{instance=~"$instance"}"#)],
        unit: Unit::Short,
        mappings: vec![ValueMapping::value_to_text(&[("0", "Down", None), ("1", "Up", None)])],
        thresholds: Some(Thresholds::absolute("red", &[(1.0, "green")])),
        ..Default::default()
    };

    let downtime = StatPanel {
        title: "Internet Downtime".to_string(),
        targets: vec![Target::range(
            r#"(1 - avg_over_time(router_monitor_internet_connection_is_up{instance=~"$instance"}[$__range])) * $__range_s"#,
        )],
        unit: Unit::Seconds,
        thresholds: Some(Thresholds::absolute("green", &[(1.0, "red")])),
        ..Default::default()
    };

    let average_latency = StatPanel {
        title: "Average Connection Latency".to_string(),
        targets: vec![Target::range(
            r#"rate(router_monitor_internet_connection_duration_seconds_sum{instance=~"$instance"}[$__rate_interval]) / rate(router_monitor_internet_connection_duration_seconds_count{instance=~"$instance"}[$__rate_interval])"#,
        )],
        unit: Unit::Seconds,
        reduce_calc: ReduceCalc::Mean,
        thresholds: Some(Thresholds::absolute("green", &[(0.1, "#EAB839"), (0.2, "red")])),
        ..Default::default()
    };

    let max_latency = StatPanel {
        title: "Max Connection Latency".to_string(),
        targets: vec![Target::range(latency_quantile("0.99"))],
        unit: Unit::Seconds,
        reduce_calc: ReduceCalc::Max,
        thresholds: Some(Thresholds::absolute("green", &[(0.5, "#EAB839"), (1.0, "red")])),
        ..Default::default()
    };

    let devices = StatPanel {
        title: "No. of devices".to_string(),
        description: Some("Number of devices connected".to_string()),
        targets: vec![Target::range(r#"count(router_monitor_arp_devices{instance=~"$instance"})"#)],
        unit: Unit::Short,
        ..Default::default()
    };

    let bandwidth = BarGaugePanel {
        title: "Bandwidth Usage".to_string(),
        targets: vec![
            Target::range(
                r#"sum by(src) (increase(router_monitor_bytes_total{dst=~"$localips",src=~"internet",instance=~"$instance"}[$__range]))"#,
            )
            .legend("Download"),
            Target::range(
                r#"sum by(dst) (increase(router_monitor_bytes_total{src=~"$localips",dst=~"internet",instance=~"$instance"}[$__range]))"#,
            )
            .legend("Upload"),
        ],
        unit: Unit::BytesSi,
        orientation: Orientation::Horizontal,
        overrides: vec![
            FieldOverride::by_name("Upload", vec![Property::fixed_color("blue")]),
            FieldOverride::by_name("Download", vec![Property::fixed_color("green")]),
        ],
        ..Default::default()
    };

    row(
        3,
        vec![
            internet.build(),
            downtime.build(),
            average_latency.build(),
            max_latency.build(),
            devices.build(),
            bandwidth.build(),
        ],
    )
}

fn latency_quantile(quantile: &str) -> String {
    format!(
        r#"histogram_quantile({}, sum by (le) (rate(router_monitor_internet_connection_duration_seconds_bucket{{instance=~"$instance"}}[$__rate_interval])))"#,
        quantile
    )
}

fn connection_latency_row() -> PanelRow {
    let panel = TimeSeriesPanel {
        title: "Connection Latency".to_string(),
        targets: vec![
            Target::range(
                "rate(router_monitor_internet_connection_duration_seconds_sum{instance=~\"$instance\"}[$__rate_interval])/\nrate(router_monitor_internet_connection_duration_seconds_count{instance=~\"$instance\"}[$__rate_interval])",
            )
            .legend("average"),
            Target::range(r#"1 - router_monitor_internet_connection_is_up{instance=~"$instance"}"#).legend("down"),
            Target::range(latency_quantile("0.95")).legend("95p"),
            Target::range(latency_quantile("0.50")).legend("50p"),
        ],
        unit: Unit::Seconds,
        legend: LegendOptions {
            calcs: Vec::new(),
            display_mode: LegendDisplayMode::List,
            ..LegendOptions::default()
        },
        overrides: vec![FieldOverride::by_name(
            "down",
            vec![
                Property::fixed_color("red"),
                Property::new("custom.drawStyle", "bars"),
                Property::new("custom.fillOpacity", 100),
                Property::new("custom.lineWidth", 0),
                Property::new("max", 1),
                Property::new("unit", Unit::Short.as_str()),
            ],
        )],
        ..Default::default()
    };
    row(6, vec![panel.build()])
}

fn connected_devices_row() -> PanelRow {
    let flags = ValueMapping::value_to_text(&[
        ("0x0", "INVALID", Some("red")),
        ("0x2", "VALID", Some("green")),
    ]);

    let organize = OrganizeOptions {
        exclude_by_name: table_exclude_by_name(&["Value", "Time"]),
        index_by_name: table_index_by_name(&["flags", "hostname", "ip_addr", "hw_addr", "device"]),
        rename_by_name: [
            ("hostname", "Hostname"),
            ("device", "Interface"),
            ("hw_addr", "Mac Address"),
            ("ip_addr", "IP Address"),
            ("flags", "Flags"),
        ]
        .into_iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect(),
    };

    let panel = TablePanel {
        title: "Connected Devices".to_string(),
        targets: vec![
            Target::instant(
                r#"label_del(router_monitor_arp_devices + on(ip_addr) group_left(hostname) router_monitor_hostnames, "job", "instance")"#,
            )
            .format(TargetFormat::Table),
        ],
        cell_height: CellHeight::Sm,
        overrides: vec![FieldOverride::by_name(
            "Flags",
            vec![
                Property::new("mappings", json!([flags])),
                Property::new("custom.cellOptions", json!({ "type": "color-background" })),
            ],
        )],
        transformations: vec![Transformation::Organize(organize)],
    };
    row(12, vec![panel.build()])
}

/// Panel tree of the Router Monitor dashboard, top to bottom.
pub fn layout() -> Vec<LayoutItem> {
    vec![
        PanelGroup::new("Overview", vec![overview_row()]).into(),
        connection_latency_row().into(),
        connected_devices_row().into(),
        PanelGroup::new("Network Traffic", network_traffic_rows()).into(),
    ]
}

pub fn template_variables() -> Vec<TemplateVariable> {
    let ds = DataSourceRef::new(DATASOURCE_UID);
    vec![
        TemplateVariable::prometheus_datasource("DS_PROMETHEUS", "Prometheus"),
        TemplateVariable::query(
            ds.clone(),
            "localips",
            "Local IPs",
            "label_values(router_monitor_packets_total, dst)",
        )
        .multi(true),
        TemplateVariable::query(
            ds,
            "instance",
            "Instance",
            "label_values(router_monitor_internet_connection_is_up, instance)",
        ),
    ]
}

pub fn meta() -> DashboardMeta {
    DashboardMeta {
        title: "Router Monitor".to_string(),
        uid: "router-monitor".to_string(),
        description: "Dashboard for Router Monitor".to_string(),
        tags: vec!["router-monitor".to_string()],
        graph_tooltip: GraphTooltip::Crosshair,
        version: 1,
    }
}

pub fn build() -> Dashboard {
    Dashboard::assemble(meta(), layout(), template_variables(), TimeRange::new("now-24h", "now"))
}
