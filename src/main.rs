//! FT-Cal LED Tool - 主程序入口
//!
//! 纯流程控制器，负责协调各个工具模块完成运行对比分析任务。

use ftcal_led_tool::{
    error::{CalibrationError, ErrorCategory},
    tools::{self, AppConfig},
};
use std::process;
use tracing_subscriber::EnvFilter;

/// 错误退出码定义
mod exit_codes {
    /// 通用错误
    pub const GENERAL_ERROR: i32 = 1;
    /// 格式/输入错误
    pub const FORMAT_ERROR: i32 = 2;
    /// 几何一致性错误
    pub const GEOMETRY_ERROR: i32 = 4;
    /// 资源/并发错误
    pub const RESOURCE_ERROR: i32 = 5;
}

/// 获取错误建议文本
fn get_error_suggestion(error: &CalibrationError) -> &'static str {
    match error {
        CalibrationError::InvalidInput(_) => {
            "检查命令行参数是否正确，使用 --help 查看完整用法 / Check if command-line arguments are correct, use --help to see full usage"
        }
        CalibrationError::ResourceError(_) => {
            "资源不可用，请使用 --serial 串行模式重试 / Resource unavailable, retry with --serial"
        }
        _ => match ErrorCategory::from_error(error) {
            ErrorCategory::Io => {
                "检查目录路径是否正确，文件是否存在且可读 / Check if the path is correct and files are readable"
            }
            ErrorCategory::Format => {
                "确保文件名形如 ftCalLed_-NNNNN*.txt 且每行9个数值字段 / Ensure files are named ftCalLed_-NNNNN*.txt with 9 numeric fields per row"
            }
            ErrorCategory::Geometry => {
                "径向分组与组件半径不一致，请检查组件号字段 / Radial bins diverged from component radii, check the component column"
            }
            ErrorCategory::Other => {
                "请检查输入文件和参数设置 / Please check input files and parameter settings"
            }
        },
    }
}

/// 错误处理和建议
fn handle_error(error: CalibrationError) -> ! {
    eprintln!("[ERROR] 错误 / Error: {error}");
    eprintln!("[INFO] 建议 / Suggestion: {}", get_error_suggestion(&error));

    let exit_code = match &error {
        CalibrationError::InvalidInput(_) => exit_codes::FORMAT_ERROR,
        CalibrationError::ResourceError(_) => exit_codes::RESOURCE_ERROR,
        _ => match ErrorCategory::from_error(&error) {
            ErrorCategory::Format => exit_codes::FORMAT_ERROR,
            ErrorCategory::Geometry => exit_codes::GEOMETRY_ERROR,
            ErrorCategory::Io | ErrorCategory::Other => exit_codes::GENERAL_ERROR,
        },
    };

    process::exit(exit_code);
}

/// 批量处理目录中的运行文件
fn process_batch_mode(config: &AppConfig) -> Result<(), CalibrationError> {
    let run_files = tools::scan_run_files(&config.input_path)?;

    tools::show_scan_results(config, &run_files);

    if run_files.is_empty() {
        return Ok(());
    }

    let output = tools::process_run_files(&run_files, config)?;
    tools::write_batch_output(&output, config)
}

/// 单文件模式（运行自身作为基线）
fn process_single_mode(config: &AppConfig) -> Result<(), CalibrationError> {
    let output = tools::process_run_files(std::slice::from_ref(&config.input_path), config)?;
    tools::write_batch_output(&output, config)
}

/// 应用程序主逻辑（便于测试和复用）
fn run() -> Result<(), CalibrationError> {
    // 1. 解析命令行参数
    let config = tools::parse_args();

    // 2. 初始化诊断日志（RUST_LOG 优先）
    let default_level = if config.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // 3. 显示启动信息
    tools::show_startup_info(&config);

    // 4. 根据模式选择处理方式
    if config.is_batch_mode() {
        process_batch_mode(&config)?;
    } else {
        process_single_mode(&config)?;
    }

    tools::show_completion_info(&config);
    Ok(())
}

fn main() {
    if let Err(error) = run() {
        handle_error(error);
    }
}
