//! FT-Cal LED Calibration Run Comparison Tool
//!
//! 读取前向量能器（FT-Cal）LED标定运行文件，推导每个晶体的几何位置，
//! 并在一组运行之间计算幅度比值与按径向距离分组的统计量，供绘图检查。
//!
//! ## 核心流程
//! - 数据表解析：每个运行 332 个组件，9 个字段
//! - 几何推导：组件号 → 22×22 网格整数坐标 → 径向距离
//! - 径向分组：排序去重得到唯一距离（标准几何 39 个）
//! - 比值计算：运行 / 基线（最小运行号），除法异常单独标记
//! - 分组统计：两遍算法计算每组均值与总体标准差

pub mod core;
pub mod error;
pub mod processing;
pub mod tools;

// 重新导出核心类型
pub use crate::core::{
    BinStatistic, BinStatistics, ComponentRecord, Position, RadialBinSet, RadiusMatch, RatioValue,
    RatioVector, RunId, RunTable,
};
pub use error::{CalibrationError, CalibrationResult, ErrorCategory};
pub use processing::{CalibrationRun, RunAnalysis, RunCollection, RunSeries, SeriesExport};
