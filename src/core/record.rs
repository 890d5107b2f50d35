//! 运行数据表模块
//!
//! 负责从单个LED标定文本文件读取 332 条组件记录，并提取文件名中的运行号。
//!
//! ## 文件格式
//!
//! - 无表头，每行一个组件，9 个以空白分隔的数值字段
//! - 字段顺序：sector, layer, component, pedestal, noise, charge,
//!   chargeSigma, ampMean, ampSigma
//! - 行顺序即组件的规范索引
//!
//! 解析是严格的：字段数不足、数值不可解析、行数不为 332 都会返回
//! `MalformedRecord`，不会产生部分填充的表。

use super::geometry::Position;
use crate::error::{CalibrationError, CalibrationResult, record_error};
use crate::tools::constants::{detector, naming};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::path::Path;

/// 运行号（文件名中标记之后的固定宽度数字串）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RunId {
    /// 原始字符串（用于图例标签，保留前导零）
    label: String,
    /// 数值形式（用于排序和基线选择）
    number: u32,
}

impl RunId {
    /// 从数据源名称中提取运行号
    ///
    /// 定位 `ftCalLed_-` 标记并取其后 5 个字符。
    pub fn from_source_name(name: &str) -> CalibrationResult<Self> {
        let start = name.find(naming::RUN_MARKER).ok_or_else(|| {
            CalibrationError::MalformedIdentifier(format!(
                "名称中缺少标记 '{}': {name}",
                naming::RUN_MARKER
            ))
        })? + naming::RUN_MARKER.len();

        let label: String = name[start..].chars().take(naming::RUN_ID_WIDTH).collect();
        if label.chars().count() < naming::RUN_ID_WIDTH {
            return Err(CalibrationError::MalformedIdentifier(format!(
                "运行号不足{}位: '{label}'",
                naming::RUN_ID_WIDTH
            )));
        }
        if !label.chars().all(|c| c.is_ascii_digit()) {
            return Err(CalibrationError::MalformedIdentifier(format!(
                "运行号不是整数: '{label}'"
            )));
        }

        let number = label.parse::<u32>().map_err(|e| {
            CalibrationError::MalformedIdentifier(format!("运行号不是整数: '{label}' ({e})"))
        })?;

        Ok(Self { label, number })
    }

    /// 从路径的文件名部分提取运行号
    pub fn from_path(path: &Path) -> CalibrationResult<Self> {
        let name = path.file_name().and_then(|n| n.to_str()).ok_or_else(|| {
            CalibrationError::MalformedIdentifier(format!(
                "文件名不是有效UTF-8: {}",
                path.display()
            ))
        })?;
        Self::from_source_name(name)
    }

    #[inline]
    pub fn number(&self) -> u32 {
        self.number
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl Ord for RunId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.number
            .cmp(&other.number)
            .then_with(|| self.label.cmp(&other.label))
    }
}

impl PartialOrd for RunId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// 单个组件的一行测量记录
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ComponentRecord {
    pub sector: f64,
    pub layer: f64,
    pub component: f64,
    pub pedestal: f64,
    pub noise: f64,
    pub charge: f64,
    pub charge_sigma: f64,
    pub amp_mean: f64,
    pub amp_sigma: f64,
}

impl ComponentRecord {
    /// 解析一行数据（`line` 为 1 起始的行号，仅用于错误信息）
    pub fn parse_line(text: &str, line: usize) -> CalibrationResult<Self> {
        let mut values = [0.0f64; detector::FIELDS_PER_ROW];
        let mut fields = text.split_whitespace();

        for (slot, value) in values.iter_mut().enumerate() {
            let field = fields.next().ok_or_else(|| CalibrationError::MalformedRecord {
                line,
                reason: format!("字段数不足: 需要{}个，只有{slot}个", detector::FIELDS_PER_ROW),
            })?;
            *value = field
                .parse::<f64>()
                .map_err(|e| record_error(line, &format!("第{}个字段 '{field}'", slot + 1), e))?;
        }

        if fields.next().is_some() {
            return Err(CalibrationError::MalformedRecord {
                line,
                reason: format!("字段数超过{}个", detector::FIELDS_PER_ROW),
            });
        }

        let [
            sector,
            layer,
            component,
            pedestal,
            noise,
            charge,
            charge_sigma,
            amp_mean,
            amp_sigma,
        ] = values;

        Ok(Self {
            sector,
            layer,
            component,
            pedestal,
            noise,
            charge,
            charge_sigma,
            amp_mean,
            amp_sigma,
        })
    }

    /// 组件号（必须是网格范围内的非负整数）
    pub fn component_id(&self, line: usize) -> CalibrationResult<u32> {
        let grid_cells = (detector::GRID_WIDTH * detector::GRID_WIDTH) as f64;
        let c = self.component;
        if !c.is_finite() || c.fract() != 0.0 || c < 0.0 || c >= grid_cells {
            return Err(CalibrationError::MalformedRecord {
                line,
                reason: format!("组件号 {c} 不在网格范围 0..{grid_cells} 内"),
            });
        }
        Ok(c as u32)
    }
}

/// 一次运行的完整数据表（构造后不可变）
#[derive(Debug, Clone)]
pub struct RunTable {
    id: RunId,
    records: Vec<ComponentRecord>,
    positions: Vec<Position>,
}

impl RunTable {
    /// 读取数据文件并构造运行表
    ///
    /// 先从文件名提取运行号，再读取文件内容；任一步失败都不会返回部分数据。
    pub fn load(path: &Path) -> CalibrationResult<Self> {
        let id = RunId::from_path(path)?;
        let text =
            std::fs::read_to_string(path).map_err(|source| CalibrationError::SourceUnavailable {
                path: path.to_path_buf(),
                source,
            })?;
        Self::parse(id, &text)
    }

    /// 从文本内容构造运行表
    pub fn parse(id: RunId, text: &str) -> CalibrationResult<Self> {
        let mut records = Vec::with_capacity(detector::COMPONENT_COUNT);
        let mut positions = Vec::with_capacity(detector::COMPONENT_COUNT);

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            if raw.trim().is_empty() {
                continue;
            }
            if records.len() == detector::COMPONENT_COUNT {
                return Err(CalibrationError::MalformedRecord {
                    line,
                    reason: format!("数据行超过{}行", detector::COMPONENT_COUNT),
                });
            }

            let record = ComponentRecord::parse_line(raw, line)?;
            positions.push(Position::from_component(record.component_id(line)?));
            records.push(record);
        }

        if records.len() != detector::COMPONENT_COUNT {
            return Err(CalibrationError::MalformedRecord {
                line: text.lines().count(),
                reason: format!(
                    "数据行数为{}，需要{}",
                    records.len(),
                    detector::COMPONENT_COUNT
                ),
            });
        }

        Ok(Self {
            id,
            records,
            positions,
        })
    }

    #[inline]
    pub fn id(&self) -> &RunId {
        &self.id
    }

    #[inline]
    pub fn records(&self) -> &[ComponentRecord] {
        &self.records
    }

    /// 每个组件的缓存位置（与记录同序）
    #[inline]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// 每个组件的径向距离（与记录同序）
    pub fn radii(&self) -> Vec<f64> {
        self.positions.iter().map(|p| p.r).collect()
    }

    /// 每个组件的平均幅度（与记录同序）
    pub fn amplitudes(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.records.iter().map(|r| r.amp_mean)
    }

    /// 前 n 条记录（详细模式下打印其平均幅度，快速核对文件是否正确）
    pub fn preview(&self, n: usize) -> &[ComponentRecord] {
        &self.records[..n.min(self.records.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic_text(amp: impl Fn(usize) -> f64) -> String {
        (0..detector::COMPONENT_COUNT)
            .map(|i| format!("1 1 {i} 200.5 1.2 30.0 2.0 {} 3.5\n", amp(i)))
            .collect()
    }

    fn id(name: &str) -> RunId {
        RunId::from_source_name(name).unwrap()
    }

    #[test]
    fn test_run_id_extraction() {
        let run = id("/data/led/ftCalLed_-04562_2019.txt");
        assert_eq!(run.number(), 4562);
        assert_eq!(run.label(), "04562");
        assert_eq!(run.to_string(), "04562");
    }

    #[test]
    fn test_run_id_malformed() {
        for name in [
            "ledrun_04562.txt",
            "ftCalLed_-04a62_.txt",
            "ftCalLed_-045",
            "ftCalLed_- 4562.txt",
        ] {
            assert!(
                matches!(
                    RunId::from_source_name(name),
                    Err(CalibrationError::MalformedIdentifier(_))
                ),
                "{name} 应该被拒绝"
            );
        }
    }

    #[test]
    fn test_run_id_ordering_numeric() {
        let mut ids = vec![id("ftCalLed_-10000_"), id("ftCalLed_-09999_"), id("ftCalLed_-00042_")];
        ids.sort();
        let numbers: Vec<u32> = ids.iter().map(RunId::number).collect();
        assert_eq!(numbers, vec![42, 9999, 10000]);
    }

    #[test]
    fn test_parse_full_table() {
        let table = RunTable::parse(id("ftCalLed_-00001_"), &synthetic_text(|i| i as f64)).unwrap();
        assert_eq!(table.records().len(), 332);
        assert_eq!(table.positions().len(), 332);
        assert_eq!(table.records()[7].amp_mean, 7.0);
        assert_eq!(table.records()[7].component, 7.0);
        assert_eq!(table.records()[7].pedestal, 200.5);
        assert_eq!((table.positions()[0].x, table.positions()[0].y), (-11, -11));
        assert_eq!(table.preview(10).len(), 10);
        assert_eq!(table.preview(10)[9].amp_mean, 9.0);
        assert_eq!(table.preview(1000).len(), 332);
    }

    #[test]
    fn test_parse_deterministic() {
        let text = synthetic_text(|i| 100.0 + i as f64 * 0.25);
        let a = RunTable::parse(id("ftCalLed_-00001_"), &text).unwrap();
        let b = RunTable::parse(id("ftCalLed_-00001_"), &text).unwrap();
        assert_eq!(a.records(), b.records());
        assert_eq!(a.positions(), b.positions());
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let text = format!("\n{}\n\n", synthetic_text(|_| 1.0));
        assert!(RunTable::parse(id("ftCalLed_-00001_"), &text).is_ok());
    }

    #[test]
    fn test_parse_rejects_short_row() {
        let mut text = synthetic_text(|_| 1.0);
        text.push_str("1 1 5 200\n");
        let text = text.replacen("1 1 0 200.5 1.2 30.0 2.0 1 3.5\n", "", 1);
        let err = RunTable::parse(id("ftCalLed_-00001_"), &text).unwrap_err();
        assert!(matches!(err, CalibrationError::MalformedRecord { line: 332, .. }));
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        let text = synthetic_text(|_| 1.0).replacen("30.0", "abc", 1);
        let err = RunTable::parse(id("ftCalLed_-00001_"), &text).unwrap_err();
        assert!(matches!(err, CalibrationError::MalformedRecord { line: 1, .. }));
    }

    #[test]
    fn test_parse_rejects_wrong_row_count() {
        let text: String = synthetic_text(|_| 1.0).lines().take(331).map(|l| format!("{l}\n")).collect();
        assert!(matches!(
            RunTable::parse(id("ftCalLed_-00001_"), &text),
            Err(CalibrationError::MalformedRecord { .. })
        ));

        let text = format!("{}1 1 0 1 1 1 1 1 1\n", synthetic_text(|_| 1.0));
        assert!(matches!(
            RunTable::parse(id("ftCalLed_-00001_"), &text),
            Err(CalibrationError::MalformedRecord { line: 333, .. })
        ));
    }

    #[test]
    fn test_component_id_validation() {
        let mut record = ComponentRecord::default();
        record.component = 12.5;
        assert!(record.component_id(1).is_err());
        record.component = -1.0;
        assert!(record.component_id(1).is_err());
        record.component = 484.0;
        assert!(record.component_id(1).is_err());
        record.component = 483.0;
        assert_eq!(record.component_id(1).unwrap(), 483);
    }
}
