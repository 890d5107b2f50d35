//! 文件扫描模块
//!
//! 负责扫描目录中的LED运行数据文件（文件名含 `ftCalLed_-` 且扩展名为 `.txt`，
//! 不递归子目录）。自动保存的报告同为 `.txt`，但不含运行号标记，不会被当作运行。

use super::cli::AppConfig;
use super::constants::naming;
use super::utils;
use crate::error::{CalibrationError, CalibrationResult};
use std::path::{Path, PathBuf};

/// 扫描目录中的运行数据文件
pub fn scan_run_files(dir_path: &Path) -> CalibrationResult<Vec<PathBuf>> {
    let mut run_files = Vec::new();

    if !dir_path.exists() {
        return Err(CalibrationError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("目录不存在: {}", dir_path.display()),
        )));
    }

    if !dir_path.is_dir() {
        return Err(CalibrationError::InvalidInput(format!(
            "路径不是目录: {}",
            dir_path.display()
        )));
    }

    // 遍历目录（不递归子目录）
    let entries = std::fs::read_dir(dir_path)?;

    for entry in entries {
        let path = entry?.path();

        // 只处理文件，跳过目录
        if !path.is_file() {
            continue;
        }

        // 检查运行号标记与文件扩展名
        if let Some(name) = path.file_name().and_then(|n| n.to_str())
            && name.contains(naming::RUN_MARKER)
            && let Some(extension) = path.extension()
            && let Some(ext_str) = extension.to_str()
            && ext_str.eq_ignore_ascii_case(naming::DATA_EXTENSION)
        {
            run_files.push(path);
        }
    }

    // 按文件名排序（显示顺序最终由运行号决定）
    run_files.sort();

    Ok(run_files)
}

/// 显示文件扫描结果
pub fn show_scan_results(config: &AppConfig, run_files: &[PathBuf]) {
    if run_files.is_empty() {
        println!(
            "⚠️  在目录 {} 中没有找到运行数据文件",
            config.input_path.display()
        );
        println!(
            "   文件格式 / Expected: {}NNNNN*.{}",
            naming::RUN_MARKER,
            naming::DATA_EXTENSION
        );
        return;
    }

    println!("📁 扫描目录: {}", config.input_path.display());
    println!("📄 找到 {} 个运行文件", run_files.len());

    if config.verbose {
        for (i, file) in run_files.iter().enumerate() {
            println!("   {}. {}", i + 1, utils::extract_filename_lossy(file));
        }
    }
    println!();
}

/// 生成报告输出路径
pub fn generate_report_output_path(config: &AppConfig, baseline_label: &str) -> PathBuf {
    config.output_path.clone().unwrap_or_else(|| {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        let dir = if config.is_batch_mode() {
            config.input_path.as_path()
        } else {
            utils::get_parent_dir(&config.input_path)
        };

        dir.join(format!(
            "{baseline_label}_LED_Ratio_Report_{timestamp}.txt"
        ))
    })
}
