//! 多文件并行加载模块
//!
//! 使用rayon实现文件级并行加载，保证结果顺序与输入一致。
//! 工作线程只负责加载；进度输出与台账记录由调用方按输入顺序完成，
//! 因此并行与串行模式打印完全相同的行。

use crate::core::RadiusMatch;
use crate::error::{CalibrationError, CalibrationResult};
use crate::processing::{CalibrationRun, LoadResult};
use rayon::prelude::*;
use std::path::PathBuf;

/// 多文件并行加载
///
/// - 使用rayon线程池精确控制并发度
/// - 按输入顺序收集结果（集合内部再按运行号排序）
pub fn load_runs_parallel(
    run_files: &[PathBuf],
    matcher: RadiusMatch,
    parallel_degree: usize,
) -> CalibrationResult<Vec<LoadResult>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(parallel_degree)
        .thread_name(|i| format!("ledcal-worker-{i}"))
        .build()
        .map_err(|e| CalibrationError::ResourceError(format!("线程池创建失败: {e}")))?;

    println!("⚡ 启用多文件并行加载：{parallel_degree} 并发度");

    Ok(pool.install(|| {
        run_files
            .par_iter()
            .map(|run_file| (run_file.clone(), CalibrationRun::load(run_file, matcher)))
            .collect()
    }))
}
