//! 统一错误处理框架
//!
//! 标定运行处理过程中的错误类型定义。单个运行的失败只影响该运行，
//! 由批处理层统计并跳过，不会中断整个集合的处理。

use std::fmt;
use std::io;
use std::path::PathBuf;

/// 标定数据处理相关的统一错误类型
#[derive(Debug)]
pub enum CalibrationError {
    /// 输入文件无法打开或读取，该运行整体被丢弃
    SourceUnavailable { path: PathBuf, source: io::Error },

    /// 文件名中的运行号无法解析为整数
    MalformedIdentifier(String),

    /// 数据行字段数量或数值不合法
    MalformedRecord { line: usize, reason: String },

    /// 径向分组与组件半径不一致（内部一致性故障）
    GeometryInconsistency(String),

    /// 参数或调用方输入错误
    InvalidInput(String),

    /// 资源访问错误（线程池创建等）
    ResourceError(String),

    /// 其他文件I/O错误（扫描目录、写出报告）
    IoError(io::Error),
}

impl fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalibrationError::SourceUnavailable { path, source } => {
                write!(f, "无法读取数据文件 {}: {source}", path.display())
            }
            CalibrationError::MalformedIdentifier(msg) => write!(f, "运行号格式错误: {msg}"),
            CalibrationError::MalformedRecord { line, reason } => {
                write!(f, "数据行格式错误 (第{line}行): {reason}")
            }
            CalibrationError::GeometryInconsistency(msg) => {
                write!(f, "几何一致性故障: {msg}")
            }
            CalibrationError::InvalidInput(msg) => write!(f, "输入验证失败: {msg}"),
            CalibrationError::ResourceError(msg) => write!(f, "资源访问错误: {msg}"),
            CalibrationError::IoError(err) => write!(f, "文件I/O错误: {err}"),
        }
    }
}

impl std::error::Error for CalibrationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CalibrationError::SourceUnavailable { source, .. } => Some(source),
            CalibrationError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for CalibrationError {
    fn from(err: io::Error) -> Self {
        CalibrationError::IoError(err)
    }
}

/// 标定处理操作的标准Result类型
pub type CalibrationResult<T> = Result<T, CalibrationError>;

// ==================== 错误转换Helper函数 ====================

/// 创建数据行错误的helper函数
#[inline]
pub fn record_error<E: fmt::Display>(line: usize, context: &str, err: E) -> CalibrationError {
    CalibrationError::MalformedRecord {
        line,
        reason: format!("{context}: {err}"),
    }
}

/// 创建几何一致性错误的helper函数
#[inline]
pub fn geometry_error<E: fmt::Display>(context: &str, err: E) -> CalibrationError {
    CalibrationError::GeometryInconsistency(format!("{context}: {err}"))
}

// ==================== 错误分类系统 ====================
// 用于批量处理中的错误统计和退出码映射

/// 错误类别枚举（用于批量处理统计）
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub enum ErrorCategory {
    /// 文件无法打开或读取
    Io,
    /// 运行号或数据行格式错误
    Format,
    /// 几何一致性故障
    Geometry,
    /// 其他未分类错误
    Other,
}

impl ErrorCategory {
    /// 从CalibrationError提取错误类别
    pub fn from_error(e: &CalibrationError) -> Self {
        match e {
            CalibrationError::SourceUnavailable { .. } | CalibrationError::IoError(_) => Self::Io,
            CalibrationError::MalformedIdentifier(_) | CalibrationError::MalformedRecord { .. } => {
                Self::Format
            }
            CalibrationError::GeometryInconsistency(_) => Self::Geometry,
            CalibrationError::InvalidInput(_) | CalibrationError::ResourceError(_) => Self::Other,
        }
    }

    /// 获取错误类别的显示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Io => "I/O错误",
            Self::Format => "格式错误",
            Self::Geometry => "几何错误",
            Self::Other => "其他错误",
        }
    }
}
