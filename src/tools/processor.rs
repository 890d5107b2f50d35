//! 运行处理模块
//!
//! 负责加载运行集合、选择基线、逐运行计算比值与径向统计并输出结果。

use super::batch_state::{BatchLedger, BatchStage};
use super::cli::AppConfig;
use super::constants::defaults;
use super::{formatter, parallel_processor, utils};
use crate::core::RadiusMatch;
use crate::error::{CalibrationError, CalibrationResult, ErrorCategory};
use crate::processing::{
    CalibrationRun, LoadResult, RunCollection, RunSeries, SeriesExport, analyze_collection,
};
use std::path::PathBuf;

/// 完整处理结果（报告文本 + 绘图序列 + 台账）
#[derive(Debug)]
pub struct BatchOutput {
    pub report: String,
    pub export: SeriesExport,
    pub ledger: BatchLedger,
}

fn load_serial(run_files: &[PathBuf], matcher: RadiusMatch) -> Vec<LoadResult> {
    run_files
        .iter()
        .map(|run_file| (run_file.clone(), CalibrationRun::load(run_file, matcher)))
        .collect()
}

/// 输出单个文件的加载结果并记入台账（串行与并行共用）
fn report_load_result(
    index: usize,
    total: usize,
    (run_file, result): &LoadResult,
    config: &AppConfig,
    ledger: &mut BatchLedger,
) {
    let filename = utils::extract_filename_lossy(run_file);
    match result {
        Ok(run) => {
            ledger.record_loaded();
            if config.verbose {
                let preview: Vec<String> = run
                    .table()
                    .preview(defaults::PREVIEW_COUNT)
                    .iter()
                    .map(|r| format!("{}", r.amp_mean))
                    .collect();
                println!(
                    "[OK] [{}/{total}] {filename} (run {}) / 幅度预览: {}",
                    index + 1,
                    run.id(),
                    preview.join(" ")
                );
            }
        }
        Err(e) => {
            println!(
                "[FAIL] [{}/{total}] {filename} - [{}] {e} / 加载失败",
                index + 1,
                ErrorCategory::from_error(e).display_name()
            );
            if config.verbose
                && let Some(source) = std::error::Error::source(e)
            {
                println!("      原因 / Cause: {source}");
            }
            ledger.record_load_failure(run_file, e);
        }
    }
}

/// 加载运行文件（按配置串行或并行），并按输入顺序输出结果、记录台账
pub fn load_runs(run_files: &[PathBuf], config: &AppConfig) -> (RunCollection, BatchLedger) {
    let matcher = config.radius_match();
    let degree = config
        .parallel_files
        .map(|requested| utils::effective_parallel_degree(requested, Some(run_files.len())));

    let results = match degree {
        Some(degree) if degree > 1 => {
            // 尝试并行加载，失败则降级串行
            parallel_processor::load_runs_parallel(run_files, matcher, degree).unwrap_or_else(
                |e| {
                    eprintln!(
                        "[WARNING] 并行加载失败 / Parallel loading failed: {e}，回退到串行模式 / fallback to serial"
                    );
                    load_serial(run_files, matcher)
                },
            )
        }
        Some(_) => {
            if config.verbose {
                println!("[INFO] 并发度为1，使用串行模式 / Parallelism=1, using serial mode");
            }
            load_serial(run_files, matcher)
        }
        None => load_serial(run_files, matcher),
    };

    let mut ledger = BatchLedger::new();
    for (index, result) in results.iter().enumerate() {
        report_load_result(index, results.len(), result, config, &mut ledger);
    }

    (RunCollection::from_results(results), ledger)
}

/// 选择基线：指定运行号优先，否则取最小运行号
pub fn resolve_baseline<'a>(
    collection: &'a RunCollection,
    config: &AppConfig,
) -> CalibrationResult<&'a CalibrationRun> {
    match config.baseline {
        Some(number) => collection.find(number).ok_or_else(|| {
            CalibrationError::InvalidInput(format!("指定的基线运行 {number} 不在已加载的运行中"))
        }),
        None => collection.baseline().ok_or_else(|| {
            CalibrationError::InvalidInput("没有可用的运行数据 / no runs loaded".to_string())
        }),
    }
}

/// 对已加载的集合生成报告与绘图序列，统计失败记入台账
pub fn build_output(
    collection: &RunCollection,
    baseline: &CalibrationRun,
    config: &AppConfig,
    mut ledger: BatchLedger,
) -> BatchOutput {
    let mut report = formatter::create_report_header(config, &ledger, baseline);
    let mut series = Vec::with_capacity(collection.runs().len());

    for outcome in analyze_collection(collection, baseline) {
        match &outcome.result {
            Ok(analysis) => {
                ledger.record_analyzed();
                report.push_str(&formatter::format_run_section(outcome.run, analysis));
                series.push(RunSeries::build(outcome.run, analysis));
            }
            Err(e) => {
                eprintln!("[FAIL] run {} - {e} / 径向统计失败", outcome.run.id());
                ledger.record_analysis_failure(outcome.run.id(), outcome.run.path(), e);
                report.push_str(&formatter::format_failed_run(outcome.run, e));
            }
        }
    }

    report.push_str(&formatter::create_report_footer(&ledger));

    BatchOutput {
        report,
        export: SeriesExport::new(baseline, series),
        ledger,
    }
}

/// 处理一组运行文件（加载 → 选择基线 → 分析 → 输出）
///
/// 全部文件加载失败时：只有一个失败则原样返回其错误，否则返回汇总错误。
pub fn process_run_files(run_files: &[PathBuf], config: &AppConfig) -> CalibrationResult<BatchOutput> {
    let (collection, ledger) = load_runs(run_files, config);

    if collection.is_empty() {
        let mut failures = collection.into_failures();
        if failures.len() == 1 {
            return Err(failures.remove(0).error);
        }
        return Err(CalibrationError::InvalidInput(format!(
            "{} 个文件均加载失败 / all {} files failed to load",
            failures.len(),
            failures.len()
        )));
    }

    println!(
        "[INFO] 运行已按升序排列 / Runs in ascending order: {}",
        collection
            .runs()
            .iter()
            .map(|r| r.id().label())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let baseline = resolve_baseline(&collection, config)?;
    println!("[INFO] 基线运行 / Baseline run: {}", baseline.id());

    Ok(build_output(&collection, baseline, config, ledger))
}

/// 写出报告与绘图序列
pub fn write_batch_output(output: &BatchOutput, config: &AppConfig) -> CalibrationResult<()> {
    let report_path = super::scanner::generate_report_output_path(config, &output.export.baseline);
    formatter::write_output(&output.report, &report_path)?;

    if let Some(json_path) = &config.json_path {
        formatter::export_series_json(&output.export, json_path)
            .map_err(|e| CalibrationError::IoError(std::io::Error::other(format!("{e:#}"))))?;
    }

    let ledger = &output.ledger;
    println!();
    println!("📊 处理完成!");
    println!("   成功加载: {} / {} 个运行", ledger.loaded(), ledger.attempted());
    for stage in [BatchStage::Load, BatchStage::Statistics] {
        let failed = ledger.failed_in(stage);
        if failed > 0 {
            println!("   {}失败: {failed} 个", stage.display_name());
        }
    }

    Ok(())
}
