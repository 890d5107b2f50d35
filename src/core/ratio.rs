//! 运行/基线比值计算模块
//!
//! 逐组件计算 `run.amp_mean[i] / baseline.amp_mean[i]`。
//! 基线幅度为零或结果非有限值时不会静默丢弃，而是记为
//! `RatioValue::DivisionAnomaly`，由下游统计与绘图自行决定排除或标记。

use super::record::RunTable;
use crate::error::{CalibrationError, CalibrationResult};
use serde::Serialize;

/// 单个组件的比值
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RatioValue {
    /// 有限比值
    Finite { value: f64 },

    /// 除法异常（基线为零或结果为 inf/NaN）
    DivisionAnomaly { amplitude: f64, baseline: f64 },
}

impl RatioValue {
    /// 计算单个比值
    #[inline]
    pub fn divide(amplitude: f64, baseline: f64) -> Self {
        let value = amplitude / baseline;
        if baseline == 0.0 || !value.is_finite() {
            Self::DivisionAnomaly {
                amplitude,
                baseline,
            }
        } else {
            Self::Finite { value }
        }
    }

    /// 有限比值（异常时为 None）
    #[inline]
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Finite { value } => Some(*value),
            Self::DivisionAnomaly { .. } => None,
        }
    }

    #[inline]
    pub fn is_anomaly(&self) -> bool {
        matches!(self, Self::DivisionAnomaly { .. })
    }
}

/// 一对（运行, 基线）的逐组件比值
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatioVector {
    values: Vec<RatioValue>,
}

impl RatioVector {
    /// 计算运行相对基线的比值
    ///
    /// 两张表必须按索引对齐（组件数相同）。
    pub fn compute(run: &RunTable, baseline: &RunTable) -> CalibrationResult<Self> {
        if run.records().len() != baseline.records().len() {
            return Err(CalibrationError::InvalidInput(format!(
                "运行 {} 有{}个组件，基线 {} 有{}个",
                run.id(),
                run.records().len(),
                baseline.id(),
                baseline.records().len()
            )));
        }

        let values: Vec<RatioValue> = run
            .amplitudes()
            .zip(baseline.amplitudes())
            .map(|(amp, base)| RatioValue::divide(amp, base))
            .collect();

        let anomalies = values.iter().filter(|v| v.is_anomaly()).count();
        if anomalies > 0 {
            tracing::warn!(
                run = %run.id(),
                baseline = %baseline.id(),
                anomalies,
                "division anomalies in ratio vector"
            );
        }

        Ok(Self { values })
    }

    /// 由已有比值构造（外部计算或测试数据）
    pub fn from_values(values: Vec<RatioValue>) -> Self {
        Self { values }
    }

    #[inline]
    pub fn values(&self) -> &[RatioValue] {
        &self.values
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 异常条目的组件索引
    pub fn anomaly_indices(&self) -> Vec<usize> {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_anomaly())
            .map(|(i, _)| i)
            .collect()
    }
}
