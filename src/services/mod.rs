pub mod burnup_chart;
pub mod burnup_forecast;
pub mod crossing;
pub mod histogram;
pub mod pdf_report;
pub mod percentiles;
pub mod rng;
pub mod scope_forecast;
pub mod settings;
pub mod simulation_types;
pub mod throughput_source;
pub mod throughput_yaml;
