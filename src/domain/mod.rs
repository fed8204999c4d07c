// Domain layer - Plain data shared by every other layer
pub mod chart;
pub mod chart_options;
pub mod error;
pub mod telemetry;
pub mod trial;
pub mod variant;
