// Application layer - Dashboard composition and publishing use cases
pub mod dashboard_publisher;
pub mod dashboard_service;
pub mod panel_builder;
pub mod router_dashboard;
pub mod traffic_query;
