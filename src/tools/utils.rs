//! 工具函数模块
//!
//! 提供数值格式化、文件路径处理、并发度计算等通用工具函数。

/// 数值格式化工具函数
pub mod number {
    /// 将数值格式化为固定精度字符串（非有限值显示为 N/A，用于表格输出）
    #[inline]
    pub fn fixed_or_na(value: f64, precision: usize) -> String {
        if value.is_finite() {
            format!("{value:.precision$}")
        } else {
            "N/A".to_string()
        }
    }

    /// 成功率百分比（总数为零时为 0）
    #[inline]
    pub fn percent(part: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            part as f64 / total as f64 * 100.0
        }
    }
}

/// 文件路径处理工具函数
pub mod path {
    use std::path::Path;

    /// 提取文件名（统一处理路径提取逻辑）
    #[inline]
    pub fn extract_filename(path: &Path) -> &str {
        path.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("Unknown")
    }

    /// 提取文件名（返回String，用于日志显示）
    #[inline]
    pub fn extract_filename_lossy(path: &Path) -> String {
        path.file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }

    /// 获取父目录，如果不存在则返回当前目录
    #[inline]
    pub fn get_parent_dir(path: &Path) -> &Path {
        path.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// 计算实际并发度
///
/// 将请求的并发度限制在允许范围内，并且不超过任务数量。
pub fn effective_parallel_degree(requested: usize, task_count: Option<usize>) -> usize {
    use super::constants::parallel_limits::{MAX_PARALLEL_DEGREE, MIN_PARALLEL_DEGREE};

    let degree = requested.clamp(MIN_PARALLEL_DEGREE, MAX_PARALLEL_DEGREE);
    match task_count {
        Some(n) if n > 0 => degree.min(n),
        _ => degree,
    }
}

// 重新导出为平级函数，保持向后兼容
pub use number::{fixed_or_na, percent};
pub use path::{extract_filename, extract_filename_lossy, get_parent_dir};

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_fixed_or_na() {
        assert_eq!(fixed_or_na(1.23456, 3), "1.235");
        assert_eq!(fixed_or_na(f64::NAN, 3), "N/A");
        assert_eq!(fixed_or_na(f64::INFINITY, 2), "N/A");
    }

    #[test]
    fn test_effective_parallel_degree() {
        assert_eq!(effective_parallel_degree(0, None), 1);
        assert_eq!(effective_parallel_degree(64, None), 16);
        assert_eq!(effective_parallel_degree(8, Some(3)), 3);
        assert_eq!(effective_parallel_degree(4, Some(0)), 4);
    }

    #[test]
    fn test_path_helpers() {
        let p = Path::new("/data/ftCalLed_-00042_.txt");
        assert_eq!(extract_filename(p), "ftCalLed_-00042_.txt");
        assert_eq!(extract_filename_lossy(p), "ftCalLed_-00042_.txt");
        assert_eq!(get_parent_dir(p), Path::new("/data"));
        assert_eq!(percent(1, 4), 25.0);
        assert_eq!(percent(0, 0), 0.0);
    }
}
