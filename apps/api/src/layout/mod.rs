// Report layout engine: text measurement, row heights, fixed blocks, Block IV pagination.
// Pure and synchronous; callers on the async side run `render` inside
// tokio::task::spawn_blocking.

pub mod assembler;
pub mod blocks;
pub mod canvas;
pub mod display;
pub mod font_metrics;
pub mod geometry;
pub mod paginator;
pub mod row_height;
pub mod table;
pub mod wrap;

// Re-export the public API consumed by the HTTP handlers.
pub use assembler::{render, RenderedReport, ReportConfig};
pub use canvas::ReportTitles;
pub use paginator::OverflowPolicy;
