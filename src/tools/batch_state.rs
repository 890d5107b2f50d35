//! 批处理台账模块
//!
//! 记录每个运行在加载与径向统计两个阶段的成败。台账只在主线程按输入顺序写入
//! （并行加载的结果先按输入顺序收集），因此报告中的失败列表与调度无关。

use crate::core::RunId;
use crate::error::{CalibrationError, ErrorCategory};
use std::collections::BTreeMap;
use std::path::Path;

use super::utils;

/// 失败发生的处理阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BatchStage {
    /// 文件读取、运行号提取与数据表解析
    Load,
    /// 比值与径向分组统计
    Statistics,
}

impl BatchStage {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Load => "加载 / load",
            Self::Statistics => "径向统计 / statistics",
        }
    }
}

/// 单个运行的失败记录
#[derive(Debug, Clone)]
pub struct RunFailure {
    pub stage: BatchStage,
    /// 数据文件名
    pub file: String,
    /// 运行号（文件名中能提取时）
    pub run: Option<RunId>,
    pub category: ErrorCategory,
    pub message: String,
}

/// 一次批处理的台账
#[derive(Debug, Clone, Default)]
pub struct BatchLedger {
    loaded: usize,
    analyzed: usize,
    failures: Vec<RunFailure>,
}

impl BatchLedger {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record_loaded(&mut self) {
        self.loaded += 1;
    }

    /// 记录加载失败（运行号从文件名尽力提取，例如文件缺失时仍可知道是哪个运行）
    pub fn record_load_failure(&mut self, path: &Path, error: &CalibrationError) {
        self.push_failure(BatchStage::Load, path, RunId::from_path(path).ok(), error);
    }

    #[inline]
    pub fn record_analyzed(&mut self) {
        self.analyzed += 1;
    }

    /// 记录径向统计失败
    pub fn record_analysis_failure(&mut self, run: &RunId, path: &Path, error: &CalibrationError) {
        self.push_failure(BatchStage::Statistics, path, Some(run.clone()), error);
    }

    fn push_failure(
        &mut self,
        stage: BatchStage,
        path: &Path,
        run: Option<RunId>,
        error: &CalibrationError,
    ) {
        self.failures.push(RunFailure {
            stage,
            file: utils::extract_filename_lossy(path),
            run,
            category: ErrorCategory::from_error(error),
            message: error.to_string(),
        });
    }

    /// 成功加载的运行数
    #[inline]
    pub fn loaded(&self) -> usize {
        self.loaded
    }

    /// 完成径向统计的运行数
    #[inline]
    pub fn analyzed(&self) -> usize {
        self.analyzed
    }

    #[inline]
    pub fn failures(&self) -> &[RunFailure] {
        &self.failures
    }

    pub fn failed_in(&self, stage: BatchStage) -> usize {
        self.failures.iter().filter(|f| f.stage == stage).count()
    }

    /// 尝试加载的文件数
    pub fn attempted(&self) -> usize {
        self.loaded + self.failed_in(BatchStage::Load)
    }

    /// 按错误类别分组的失败记录（类别有序，组内保持记录顺序）
    pub fn by_category(&self) -> BTreeMap<ErrorCategory, Vec<&RunFailure>> {
        let mut groups: BTreeMap<ErrorCategory, Vec<&RunFailure>> = BTreeMap::new();
        for failure in &self.failures {
            groups.entry(failure.category).or_default().push(failure);
        }
        groups
    }
}
