// Traffic query composition - PromQL for router_monitor_bytes_total
use crate::domain::unit::Unit;
use std::fmt;

const BYTES_METRIC: &str = "router_monitor_bytes_total";
const INSTANCE_FILTER: &str = r#"instance=~"$instance""#;
const DEVICE_JOIN: &str = "
+ on(ip_addr) group_left(hw_addr, device, flags) router_monitor_arp_devices
+ on(ip_addr) group_left(hostname) router_monitor_hostnames
";

/// Grafana range token substituted at view time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// Whole dashboard time range.
    Range,
    /// One graph step.
    Interval,
    /// Step widened to cover at least four scrapes, for `rate`.
    RateInterval,
}

impl Window {
    pub fn as_str(&self) -> &'static str {
        match self {
            Window::Range => "$__range",
            Window::Interval => "$__interval",
            Window::RateInterval => "$__rate_interval",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    Increase,
    Rate,
}

impl Aggregation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregation::Increase => "increase",
            Aggregation::Rate => "rate",
        }
    }

    /// Unit of the values this aggregation yields over a byte counter.
    pub fn unit(&self) -> Unit {
        match self {
            Aggregation::Increase => Unit::BytesSi,
            Aggregation::Rate => Unit::BytesPerSecSi,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Download,
    Upload,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Download, Direction::Upload];

    /// Label selector matching traffic between local IPs and the internet.
    pub fn labels(&self) -> &'static str {
        match self {
            Direction::Download => r#"dst=~"$localips",src=~"internet""#,
            Direction::Upload => r#"src=~"$localips",dst=~"internet""#,
        }
    }

    /// Label carrying the local endpoint.
    pub fn local_label(&self) -> &'static str {
        match self {
            Direction::Download => "dst",
            Direction::Upload => "src",
        }
    }

    /// Label carrying the internet endpoint.
    pub fn remote_label(&self) -> &'static str {
        match self {
            Direction::Download => "src",
            Direction::Upload => "dst",
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            Direction::Download => "Download",
            Direction::Upload => "Upload",
        }
    }

    pub fn query(&self, scope: TrafficScope, window: Window, aggregation: Aggregation) -> TrafficQuery {
        match scope {
            TrafficScope::PerLocalIp => TrafficQuery {
                labels: self.labels().to_string(),
                ip_label: self.local_label().to_string(),
                window,
                aggregation,
                include_device_join: true,
            },
            TrafficScope::InternetTotal => TrafficQuery {
                labels: self.labels().to_string(),
                ip_label: self.remote_label().to_string(),
                window,
                aggregation,
                include_device_join: false,
            },
        }
    }
}

/// Whether a traffic panel breaks down by device or shows the internet link as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrafficScope {
    PerLocalIp,
    InternetTotal,
}

/// Byte counter aggregated per IP and relabelled to `ip_addr`.
///
/// No validation happens here: a malformed selector yields malformed PromQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrafficQuery {
    pub labels: String,
    pub ip_label: String,
    pub window: Window,
    pub aggregation: Aggregation,
    pub include_device_join: bool,
}

impl TrafficQuery {
    pub fn render(&self) -> String {
        let mut expr = format!(
            r#"
label_replace(
  sum by({ip}) (
    {func}(
      {metric}{{{labels},{instance}}}[{window}]
    ) > 0
  ),
  "ip_addr", "$1", "{ip}", "(.*)"
)"#,
            ip = self.ip_label,
            func = self.aggregation.as_str(),
            metric = BYTES_METRIC,
            labels = self.labels,
            instance = INSTANCE_FILTER,
            window = self.window.as_str(),
        );
        if self.include_device_join {
            expr.push_str(DEVICE_JOIN);
        }
        expr
    }
}

impl fmt::Display for TrafficQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_per_local_ip_download() {
        let query = Direction::Download.query(TrafficScope::PerLocalIp, Window::Range, Aggregation::Increase);
        let expected = r#"
label_replace(
  sum by(dst) (
    increase(
      router_monitor_bytes_total{dst=~"$localips",src=~"internet",instance=~"$instance"}[$__range]
    ) > 0
  ),
  "ip_addr", "$1", "dst", "(.*)"
)
+ on(ip_addr) group_left(hw_addr, device, flags) router_monitor_arp_devices
+ on(ip_addr) group_left(hostname) router_monitor_hostnames
"#;
        assert_eq!(query.render(), expected);
    }

    #[test]
    fn test_relabel_target_follows_direction() {
        for direction in Direction::ALL {
            let query = direction.query(TrafficScope::PerLocalIp, Window::Interval, Aggregation::Increase);
            let rendered = query.render();
            assert!(rendered.contains(&format!(r#""ip_addr", "$1", "{}", "(.*)""#, direction.local_label())));
            assert!(rendered.contains(&format!("sum by({})", direction.local_label())));
        }
        assert_eq!(Direction::Download.local_label(), "dst");
        assert_eq!(Direction::Upload.local_label(), "src");
    }

    #[test]
    fn test_internet_total_drops_device_join() {
        for direction in Direction::ALL {
            let total = direction.query(TrafficScope::InternetTotal, Window::RateInterval, Aggregation::Rate);
            let rendered = total.render();
            assert!(!rendered.contains("router_monitor_arp_devices"));
            assert!(!rendered.contains("router_monitor_hostnames"));
            assert!(rendered.contains(&format!("sum by({})", direction.remote_label())));
            assert!(rendered.ends_with(')'));
        }
    }

    #[test]
    fn test_window_and_aggregation_tokens() {
        let rate = Direction::Upload.query(TrafficScope::PerLocalIp, Window::RateInterval, Aggregation::Rate);
        let rendered = rate.to_string();
        assert!(rendered.contains("rate(\n"));
        assert!(rendered.contains("[$__rate_interval]"));
        assert!(rendered.contains(r#"src=~"$localips",dst=~"internet",instance=~"$instance""#));
        assert_eq!(rate.aggregation.unit(), Unit::BytesPerSecSi);

        let increase = Direction::Upload.query(TrafficScope::PerLocalIp, Window::Interval, Aggregation::Increase);
        assert!(increase.render().contains("[$__interval]"));
        assert_eq!(increase.aggregation.unit(), Unit::BytesSi);
    }

    #[test]
    fn test_template_tokens_left_unresolved() {
        let rendered = Direction::Download
            .query(TrafficScope::PerLocalIp, Window::Range, Aggregation::Increase)
            .render();
        assert!(rendered.contains("$localips"));
        assert!(rendered.contains("$instance"));
        assert!(!rendered.contains("192.168."));
    }
}
