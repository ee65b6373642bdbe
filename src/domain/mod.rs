// Domain layer - Grafana dashboard schema
pub mod dashboard;
pub mod layout;
pub mod panel;
pub mod unit;
