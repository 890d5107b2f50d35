//! 工具模块集合
//!
//! 包含CLI、文件扫描、批处理统计、格式化等工具模块，支持main.rs的流程控制。

pub mod batch_state;
pub mod cli;
pub mod constants;
pub mod formatter;
pub mod parallel_processor;
pub mod processor;
pub mod scanner;
pub mod utils;

// 重新导出主要的公共接口
pub use batch_state::{BatchLedger, BatchStage, RunFailure};
pub use cli::{AppConfig, parse_args, show_completion_info, show_startup_info};
pub use formatter::{
    create_report_footer, create_report_header, export_series_json, format_run_section,
    write_output,
};
pub use parallel_processor::load_runs_parallel;
pub use processor::{
    BatchOutput, build_output, load_runs, process_run_files, resolve_baseline,
    write_batch_output,
};
pub use scanner::{generate_report_output_path, scan_run_files, show_scan_results};
