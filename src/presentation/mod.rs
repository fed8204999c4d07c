// Presentation layer - State and payloads handed to the chart front end
pub mod app_state;
pub mod chart_payload;
