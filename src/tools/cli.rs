//! 命令行接口模块
//!
//! 负责命令行参数解析、配置管理和程序信息展示。

use super::constants::{defaults, parallel_limits};
use crate::core::RadiusMatch;
use clap::{Arg, Command};
use std::path::PathBuf;

/// 应用程序版本信息
const VERSION: &str = env!("CARGO_PKG_VERSION");
const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// 应用程序配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// 运行文件目录（批量模式）或单个运行文件
    pub input_path: PathBuf,

    /// 是否显示详细信息
    pub verbose: bool,

    /// 文本报告输出路径（可选，未指定时自动生成）
    pub output_path: Option<PathBuf>,

    /// 绘图序列JSON导出路径（可选）
    pub json_path: Option<PathBuf>,

    /// 指定基线运行号（默认取最小运行号）
    pub baseline: Option<u32>,

    /// 径向距离分组容差（None 表示精确相等）
    pub radius_tolerance: Option<f64>,

    /// 多文件并行加载并发度（None 表示串行）
    pub parallel_files: Option<usize>,
}

impl AppConfig {
    /// 智能判断是否为批量模式（基于路径类型）
    #[inline]
    pub fn is_batch_mode(&self) -> bool {
        self.input_path.is_dir()
    }

    /// 径向距离匹配策略
    #[inline]
    pub fn radius_match(&self) -> RadiusMatch {
        match self.radius_tolerance {
            Some(eps) if eps > 0.0 => RadiusMatch::Tolerance(eps),
            _ => RadiusMatch::Exact,
        }
    }
}

/// 构建命令行定义
pub fn build_command() -> Command {
    Command::new("ftcal-led")
        .version(VERSION)
        .about(DESCRIPTION)
        .author("FT-Cal Calibration Team")
        .arg(
            Arg::new("INPUT")
                .help("LED运行文件目录或单个文件 (ftCalLed_-NNNNN*.txt)。如果不指定，将扫描可执行文件所在目录")
                .required(false)
                .index(1),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("显示详细处理信息")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("输出文本报告到文件")
                .value_name("FILE"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("导出绘图序列 (JSON)")
                .value_name("FILE"),
        )
        .arg(
            Arg::new("baseline")
                .long("baseline")
                .short('b')
                .help("指定基线运行号（默认使用最小运行号）")
                .value_name("RUN")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new("radius-tolerance")
                .long("radius-tolerance")
                .help("径向距离分组容差（默认精确相等）")
                .value_name("EPS")
                .value_parser(parse_radius_tolerance),
        )
        .arg(
            Arg::new("parallel-files")
                .long("parallel-files")
                .help(format!(
                    "并行加载文件数 ({}-{}，默认{})",
                    parallel_limits::MIN_PARALLEL_DEGREE,
                    parallel_limits::MAX_PARALLEL_DEGREE,
                    defaults::PARALLEL_FILES_DEGREE
                ))
                .value_name("N")
                .value_parser(clap::value_parser!(usize))
                .conflicts_with("serial"),
        )
        .arg(
            Arg::new("serial")
                .long("serial")
                .help("串行加载（禁用多文件并行）")
                .action(clap::ArgAction::SetTrue),
        )
}

/// 径向距离容差：必须是有限正数
fn parse_radius_tolerance(value: &str) -> Result<f64, String> {
    let eps: f64 = value.parse().map_err(|e| format!("无效的容差 '{value}': {e}"))?;
    if eps.is_finite() && eps > 0.0 {
        Ok(eps)
    } else {
        Err(format!("容差必须是有限正数 / tolerance must be finite and positive: {value}"))
    }
}

/// 解析命令行参数并创建配置
pub fn parse_args() -> AppConfig {
    config_from_matches(&build_command().get_matches())
}

/// 从已解析参数创建配置（便于测试）
pub fn config_from_matches(matches: &clap::ArgMatches) -> AppConfig {
    // 确定输入路径（智能路径处理）
    let input_path = match matches.get_one::<String>("INPUT") {
        Some(input) => PathBuf::from(input),
        None => {
            // 双击启动模式：使用可执行文件所在目录
            let exe_path = std::env::current_exe().unwrap_or_else(|_| PathBuf::from("."));
            super::utils::get_parent_dir(&exe_path).to_path_buf()
        }
    };

    let parallel_files = if matches.get_flag("serial") {
        None
    } else {
        Some(
            matches
                .get_one::<usize>("parallel-files")
                .copied()
                .unwrap_or(defaults::PARALLEL_FILES_DEGREE),
        )
    };

    AppConfig {
        input_path,
        verbose: matches.get_flag("verbose"),
        output_path: matches.get_one::<String>("output").map(PathBuf::from),
        json_path: matches.get_one::<String>("json").map(PathBuf::from),
        baseline: matches.get_one::<u32>("baseline").copied(),
        radius_tolerance: matches.get_one::<f64>("radius-tolerance").copied(),
        parallel_files,
    }
}

/// 显示程序启动信息
pub fn show_startup_info(config: &AppConfig) {
    println!("🚀 FT-Cal LED Tool v{VERSION} 启动");
    println!("📝 {DESCRIPTION}");
    if config.verbose {
        println!(
            "📐 径向分组匹配 / Radius matching: {}",
            config.radius_match().describe()
        );
    }
    println!();
}

/// 显示程序完成信息
pub fn show_completion_info(config: &AppConfig) {
    if config.verbose {
        println!("✅ 所有任务处理完成！");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> AppConfig {
        let matches = build_command()
            .try_get_matches_from(args.iter().copied())
            .unwrap();
        config_from_matches(&matches)
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["ftcal-led", "data"]);
        assert_eq!(config.input_path, PathBuf::from("data"));
        assert!(!config.verbose);
        assert_eq!(config.parallel_files, Some(defaults::PARALLEL_FILES_DEGREE));
        assert_eq!(config.radius_match(), RadiusMatch::Exact);
        assert!(config.baseline.is_none());
    }

    #[test]
    fn test_all_options() {
        let config = parse(&[
            "ftcal-led",
            "data",
            "-v",
            "--output",
            "report.txt",
            "--json",
            "series.json",
            "--baseline",
            "4562",
            "--radius-tolerance",
            "1e-9",
            "--serial",
        ]);
        assert!(config.verbose);
        assert_eq!(config.output_path, Some(PathBuf::from("report.txt")));
        assert_eq!(config.json_path, Some(PathBuf::from("series.json")));
        assert_eq!(config.baseline, Some(4562));
        assert_eq!(config.radius_match(), RadiusMatch::Tolerance(1e-9));
        assert_eq!(config.parallel_files, None);
    }

    #[test]
    fn test_radius_tolerance_rejects_invalid() {
        for bad in [
            "--radius-tolerance=-1",
            "--radius-tolerance=0",
            "--radius-tolerance=NaN",
            "--radius-tolerance=inf",
            "--radius-tolerance=abc",
        ] {
            let result = build_command().try_get_matches_from(["ftcal-led", "data", bad]);
            assert!(result.is_err(), "{bad} 应该被拒绝");
        }
        let config = parse(&["ftcal-led", "data", "--radius-tolerance=0.001"]);
        assert_eq!(config.radius_match(), RadiusMatch::Tolerance(0.001));
    }

    #[test]
    fn test_serial_conflicts_with_parallel() {
        let result =
            build_command().try_get_matches_from(["ftcal-led", "--serial", "--parallel-files", "2"]);
        assert!(result.is_err());
    }
}
