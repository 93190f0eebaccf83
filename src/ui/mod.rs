/// Rendering: controls, the share pie, the time series and the heatmap.
/// Every function here reads [`crate::state::AppState`] or a piece of it;
/// none of them aggregate data themselves.
pub mod heatmap;
pub mod panels;
pub mod pie;
pub mod plot;
