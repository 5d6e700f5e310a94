//! Charts module - Static PNG chart rendering

mod renderer;

pub use renderer::{
    Chart, ChartInputs, RenderError, StaticChartRenderer, HISTOGRAM_FILE, MAP_FILE,
    TOP_TOWNS_FILE, YEARS_FILE,
};
