//! 运行对比分析阶段
//!
//! 对一对（运行, 基线）计算比值向量与径向分组统计。
//! 每个阶段返回新的不可变值，而不是在运行对象上逐步写入字段。

use super::collection::{CalibrationRun, RunCollection};
use crate::core::{BinStatistics, RatioVector, RunId, RunTable};
use crate::error::{CalibrationError, CalibrationResult};

/// 单个运行相对基线的分析结果
#[derive(Debug, Clone)]
pub struct RunAnalysis {
    run: RunId,
    baseline: RunId,
    ratios: RatioVector,
    statistics: BinStatistics,
}

impl RunAnalysis {
    /// 计算运行相对基线的比值与径向分组统计
    pub fn compute(run: &CalibrationRun, baseline: &RunTable) -> CalibrationResult<Self> {
        let ratios = RatioVector::compute(run.table(), baseline)?;
        let statistics = BinStatistics::compute(run.bins(), &run.table().radii(), &ratios)?;

        let expected = run.table().records().len();
        if statistics.total_count() != expected {
            return Err(CalibrationError::GeometryInconsistency(format!(
                "运行 {} 分组成员总数 {} != 组件数 {expected}",
                run.id(),
                statistics.total_count()
            )));
        }

        Ok(Self {
            run: run.id().clone(),
            baseline: baseline.id().clone(),
            ratios,
            statistics,
        })
    }

    #[inline]
    pub fn run(&self) -> &RunId {
        &self.run
    }

    #[inline]
    pub fn baseline(&self) -> &RunId {
        &self.baseline
    }

    #[inline]
    pub fn ratios(&self) -> &RatioVector {
        &self.ratios
    }

    #[inline]
    pub fn statistics(&self) -> &BinStatistics {
        &self.statistics
    }

    /// 图例标签 "运行/基线"
    pub fn ratio_label(&self) -> String {
        format!("{}/{}", self.run, self.baseline)
    }
}

/// 集合中某个运行的分析结果（失败时保留错误，不影响其余运行）
#[derive(Debug)]
pub struct AnalysisOutcome<'a> {
    pub run: &'a CalibrationRun,
    pub result: CalibrationResult<RunAnalysis>,
}

/// 对集合中每个运行（含基线自身）做对比分析
pub fn analyze_collection<'a>(
    collection: &'a RunCollection,
    baseline: &CalibrationRun,
) -> Vec<AnalysisOutcome<'a>> {
    collection
        .runs()
        .iter()
        .map(|run| {
            let result = RunAnalysis::compute(run, baseline.table());
            if let Err(e) = &result {
                tracing::error!(run = %run.id(), error = %e, "run statistics aborted");
            }
            AnalysisOutcome { run, result }
        })
        .collect()
}
