//! 运行集合处理模块
//!
//! 在单运行引擎之上组织多个运行：加载与失败隔离、排序与基线选择、
//! 逐运行对比分析以及绘图序列导出。

pub mod analysis;
pub mod collection;
pub mod series;

// 重新导出公共接口
pub use analysis::{AnalysisOutcome, RunAnalysis, analyze_collection};
pub use collection::{CalibrationRun, LoadFailure, LoadResult, RunCollection, select_baseline};
pub use series::{RadialPoint, RunSeries, SeriesExport};
