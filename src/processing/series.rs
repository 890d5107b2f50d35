//! 绘图数据序列模块
//!
//! 为外部绘图端准备每个运行的数值序列，本模块不做任何渲染：
//! - 幅度-组件号：`(component, amp_mean)`
//! - 比值-组件号：`(component, ratio)`，除法异常为 `None`
//! - 径向分布：`(distance, mean, std_dev)`

use super::analysis::RunAnalysis;
use super::collection::CalibrationRun;
use crate::tools::constants::plot_ranges;
use serde::Serialize;

/// 径向分布图中的一个点
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RadialPoint {
    pub distance: f64,
    pub mean: f64,
    pub std_dev: f64,
}

/// 单个运行的全部绘图序列
#[derive(Debug, Clone, Serialize)]
pub struct RunSeries {
    /// 运行号标签
    pub run: String,
    /// 比值图例标签（运行/基线）
    pub ratio_label: String,
    pub amplitude_vs_index: Vec<(u32, f64)>,
    pub ratio_vs_index: Vec<(u32, Option<f64>)>,
    pub radial_profile: Vec<RadialPoint>,
}

impl RunSeries {
    /// 由运行及其分析结果构造序列
    pub fn build(run: &CalibrationRun, analysis: &RunAnalysis) -> Self {
        let components: Vec<u32> = run
            .table()
            .records()
            .iter()
            .map(|r| r.component as u32)
            .collect();

        let amplitude_vs_index = components
            .iter()
            .copied()
            .zip(run.table().amplitudes())
            .collect();

        let ratio_vs_index = components
            .iter()
            .copied()
            .zip(analysis.ratios().values().iter().map(|v| v.value()))
            .collect();

        let radial_profile = analysis
            .statistics()
            .bins()
            .iter()
            .map(|b| RadialPoint {
                distance: b.distance,
                mean: b.mean,
                std_dev: b.std_dev,
            })
            .collect();

        Self {
            run: run.id().label().to_string(),
            ratio_label: analysis.ratio_label(),
            amplitude_vs_index,
            ratio_vs_index,
            radial_profile,
        }
    }
}

/// 整个集合的导出（附带建议的纵轴范围）
#[derive(Debug, Clone, Serialize)]
pub struct SeriesExport {
    pub generated_at: String,
    pub baseline: String,
    pub ratio_y_range: (f64, f64),
    pub radial_y_range: (f64, f64),
    pub runs: Vec<RunSeries>,
}

impl SeriesExport {
    pub fn new(baseline: &CalibrationRun, runs: Vec<RunSeries>) -> Self {
        Self {
            generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            baseline: baseline.id().label().to_string(),
            ratio_y_range: plot_ranges::RATIO_Y_RANGE,
            radial_y_range: plot_ranges::RADIAL_Y_RANGE,
            runs,
        }
    }
}
