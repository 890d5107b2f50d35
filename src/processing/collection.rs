//! 运行集合模块
//!
//! 加载一组运行文件，隔离单个运行的失败，按运行号升序排列并选择基线。
//!
//! 每个运行的解析、几何推导与径向分组彼此独立，可以并行加载
//! （见 `tools::parallel_processor`）；集合按运行号稳定排序，输出顺序与调度无关。
//! 基线选择是对已完整加载的集合做的最小值归约，必须在全部运行加载之后进行。

use crate::core::{RadialBinSet, RadiusMatch, RunId, RunTable};
use crate::error::{CalibrationError, CalibrationResult};
use std::path::{Path, PathBuf};

/// 已加载的单个运行（数据表 + 派生的径向分组）
#[derive(Debug, Clone)]
pub struct CalibrationRun {
    path: PathBuf,
    table: RunTable,
    bins: RadialBinSet,
}

impl CalibrationRun {
    /// 读取文件并派生径向分组
    pub fn load(path: &Path, matcher: RadiusMatch) -> CalibrationResult<Self> {
        let table = RunTable::load(path)?;
        Ok(Self::from_table(path.to_path_buf(), table, matcher))
    }

    /// 由已有数据表构造
    pub fn from_table(path: PathBuf, table: RunTable, matcher: RadiusMatch) -> Self {
        let bins = RadialBinSet::from_radii(&table.radii(), matcher);
        tracing::debug!(
            run = %table.id(),
            bins = bins.len(),
            "radial bins derived"
        );
        Self { path, table, bins }
    }

    #[inline]
    pub fn id(&self) -> &RunId {
        self.table.id()
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn table(&self) -> &RunTable {
        &self.table
    }

    #[inline]
    pub fn bins(&self) -> &RadialBinSet {
        &self.bins
    }
}

/// 单个文件的加载结果
pub type LoadResult = (PathBuf, CalibrationResult<CalibrationRun>);

/// 加载失败的运行
#[derive(Debug)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub error: CalibrationError,
}

/// 运行集合（按运行号升序）
#[derive(Debug, Default)]
pub struct RunCollection {
    runs: Vec<CalibrationRun>,
    failures: Vec<LoadFailure>,
}

impl RunCollection {
    /// 串行加载全部文件
    pub fn load_serial(paths: &[PathBuf], matcher: RadiusMatch) -> Self {
        let results: Vec<_> = paths
            .iter()
            .map(|path| (path.clone(), CalibrationRun::load(path, matcher)))
            .collect();
        Self::from_results(results)
    }

    /// 由逐文件结果构造集合（失败的运行被隔离，不影响其余运行）
    pub fn from_results(results: Vec<LoadResult>) -> Self {
        let mut collection = Self::default();
        for (path, result) in results {
            match result {
                Ok(run) => collection.runs.push(run),
                Err(error) => {
                    tracing::warn!(path = %path.display(), error = %error, "run excluded");
                    collection.failures.push(LoadFailure { path, error });
                }
            }
        }
        collection.runs.sort_by(|a, b| a.id().cmp(b.id()));
        collection
    }

    /// 按运行号升序的运行
    #[inline]
    pub fn runs(&self) -> &[CalibrationRun] {
        &self.runs
    }

    #[inline]
    pub fn failures(&self) -> &[LoadFailure] {
        &self.failures
    }

    /// 取出全部加载失败（集合为空时用于报告具体原因）
    pub fn into_failures(self) -> Vec<LoadFailure> {
        self.failures
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// 运行号最小的运行作为基线
    pub fn baseline(&self) -> Option<&CalibrationRun> {
        select_baseline(&self.runs, CalibrationRun::id)
    }

    /// 按运行号数值查找
    pub fn find(&self, number: u32) -> Option<&CalibrationRun> {
        self.runs.iter().find(|run| run.id().number() == number)
    }
}

/// 选择运行号最小的元素
///
/// 运行号相同时返回集合中靠前的一个（未定义行为，任意选择）。
pub fn select_baseline<'a, T>(items: &'a [T], id: impl Fn(&T) -> &RunId) -> Option<&'a T> {
    items.iter().min_by_key(|&item| id(item).number())
}
