mod engine;
mod format;
mod types;

pub use engine::project;
pub use format::CurrencyFormat;
pub use types::{
    ChartPoint, DEFAULT_REINVEST_THRESHOLD, MonthlyRecord, ProjectionError, ProjectionParameters,
    ProjectionResult, ProjectionSummary,
};
