//! 输出格式化模块
//!
//! 负责运行对比结果的文本报告与绘图序列导出。

use super::batch_state::{BatchLedger, BatchStage};
use super::cli::AppConfig;
use super::constants::detector;
use super::utils;
use crate::error::{CalibrationError, CalibrationResult};
use crate::processing::{CalibrationRun, RunAnalysis, SeriesExport};
use anyhow::Context;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table, presets::UTF8_FULL};
use std::path::Path;

/// 应用程序版本信息
const VERSION: &str = env!("CARGO_PKG_VERSION");

const RULE: &str =
    "================================================================================\n";
const THIN_RULE: &str =
    "--------------------------------------------------------------------------------\n";

/// 创建报告头部信息
pub fn create_report_header(
    config: &AppConfig,
    ledger: &BatchLedger,
    baseline: &CalibrationRun,
) -> String {
    let mut output = String::new();

    output.push_str(RULE);
    output.push_str(&format!("   FT-Cal LED Ratio Report v{VERSION}\n"));
    output.push_str("   LED标定运行对比分析报告\n");
    output.push_str(RULE);

    let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    output.push_str(&format!("log date: {now}\n"));
    output.push_str(&format!("📁 输入 / Input: {}\n", config.input_path.display()));
    output.push_str(&format!("📄 运行文件数 / Run files: {}\n", ledger.attempted()));
    output.push_str(&format!("✅ 成功加载 / Loaded: {}\n", ledger.loaded()));
    output.push_str(&format!(
        "📏 基线运行 / Baseline run: {} ({})\n",
        baseline.id(),
        utils::extract_filename(baseline.path())
    ));
    output.push_str(&format!(
        "📐 径向分组匹配 / Radius matching: {}\n\n",
        baseline.bins().matcher().describe()
    ));

    output
}

/// 格式化单个运行的径向分布表
pub fn format_radial_table(analysis: &RunAnalysis) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Distance / 距离",
        "Count / 数量",
        "Mean Ratio / 平均比值",
        "StdDev / 标准差",
        "Anomalies / 异常",
    ]);

    for bin in analysis.statistics().bins() {
        table.add_row(vec![
            Cell::new(format!("{:.4}", bin.distance)).set_alignment(CellAlignment::Right),
            Cell::new(bin.count).set_alignment(CellAlignment::Right),
            Cell::new(utils::fixed_or_na(bin.mean, 5)).set_alignment(CellAlignment::Right),
            Cell::new(utils::fixed_or_na(bin.std_dev, 5)).set_alignment(CellAlignment::Right),
            Cell::new(bin.anomalies).set_alignment(CellAlignment::Right),
        ]);
    }

    table
}

/// 格式化单个运行的报告段落
pub fn format_run_section(run: &CalibrationRun, analysis: &RunAnalysis) -> String {
    let mut output = String::new();

    output.push_str(THIN_RULE);
    output.push_str(&format!(
        "Run {} ({})\n",
        analysis.ratio_label(),
        utils::extract_filename(run.path())
    ));
    output.push_str(THIN_RULE);

    let bins = analysis.statistics().len();
    output.push_str(&format!("径向分组数 / Radial bins: {bins}"));
    if bins != detector::REFERENCE_BIN_COUNT {
        output.push_str(&format!(
            " (标准几何为{} / standard geometry has {})",
            detector::REFERENCE_BIN_COUNT,
            detector::REFERENCE_BIN_COUNT
        ));
    }
    output.push('\n');

    let anomalies = analysis.ratios().anomaly_indices();
    if !anomalies.is_empty() {
        let components: Vec<String> = anomalies
            .iter()
            .map(|&i| format!("{}", run.table().records()[i].component))
            .collect();
        output.push_str(&format!(
            "⚠️  除法异常 / Division anomalies: {} (components {})\n",
            anomalies.len(),
            components.join(", ")
        ));
    }

    output.push_str(&format!("{}\n\n", format_radial_table(analysis)));

    output
}

/// 格式化统计失败的运行
pub fn format_failed_run(run: &CalibrationRun, error: &CalibrationError) -> String {
    format!(
        "{THIN_RULE}Run {} ({}) - 统计失败 / statistics failed: {error}\n\n",
        run.id(),
        utils::extract_filename(run.path())
    )
}

/// 生成报告尾部统计信息
pub fn create_report_footer(ledger: &BatchLedger) -> String {
    let mut output = String::new();
    let attempted = ledger.attempted();

    output.push_str(RULE);
    output.push_str("批量处理统计 / Batch statistics:\n");
    output.push_str(&format!("   总文件数: {attempted}\n"));
    output.push_str(&format!("   成功加载: {}\n", ledger.loaded()));
    output.push_str(&format!("   加载失败: {}\n", ledger.failed_in(BatchStage::Load)));
    output.push_str(&format!("   完成统计: {}\n", ledger.analyzed()));
    let analysis_failed = ledger.failed_in(BatchStage::Statistics);
    if analysis_failed > 0 {
        output.push_str(&format!("   统计失败: {analysis_failed}\n"));
    }
    output.push_str(&format!(
        "   加载成功率: {:.1}%\n",
        utils::percent(ledger.loaded(), attempted)
    ));

    for (category, failures) in ledger.by_category() {
        output.push_str(&format!("   [{}] {}:\n", category.display_name(), failures.len()));
        for failure in failures {
            let run = failure
                .run
                .as_ref()
                .map_or_else(|| "-".to_string(), |id| id.to_string());
            output.push_str(&format!(
                "      {} (run {run}, {}): {}\n",
                failure.file,
                failure.stage.display_name(),
                failure.message
            ));
        }
    }

    output.push('\n');
    output.push_str(&format!("生成工具: FT-Cal LED Tool v{VERSION}\n"));

    output
}

/// 写出文本报告
pub fn write_output(output: &str, path: &Path) -> CalibrationResult<()> {
    std::fs::write(path, output)?;
    println!("📄 结果已保存到: {}", path.display());
    Ok(())
}

/// 导出绘图序列（JSON）
pub fn export_series_json(export: &SeriesExport, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(export).context("序列化绘图序列失败")?;
    std::fs::write(path, json)
        .with_context(|| format!("写入绘图序列失败: {}", path.display()))?;
    println!("📈 绘图序列已导出: {}", path.display());
    Ok(())
}
