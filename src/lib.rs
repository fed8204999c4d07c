//! Client-side analytics for simulation trials: a bounded cache of per-variant
//! telemetry, a registry of open trials and sources, and the smoothing and
//! chart-assembly pipeline that turns cached series into render-ready charts.
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
