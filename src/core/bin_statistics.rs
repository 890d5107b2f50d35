//! 径向分组统计模块
//!
//! 按径向距离对比值分组，计算每组的均值与总体标准差（除以 n，而非 n-1）。
//!
//! ## 两遍算法
//!
//! 1. 将组件按半径稳定升序排序，比值随之重排
//! 2. 单次遍历：半径与当前分组距离匹配时累加；不匹配时关闭当前分组并前进到
//!    下一个距离；序列结束时显式关闭最后一组（与中途关闭走同一路径）
//!
//! 某个分组成员数为零，或有组件半径不属于任何分组，说明分组集合与半径
//! 并非来自同一几何，属于内部一致性故障，返回 `GeometryInconsistency`。
//!
//! 除法异常的条目计入 `count` 与 `anomalies`，但不参与均值和标准差。

use super::radial_bins::{RadialBinSet, RadiusMatch};
use super::ratio::{RatioValue, RatioVector};
use crate::error::{CalibrationResult, geometry_error};
use serde::Serialize;

/// 单个径向分组的统计结果
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BinStatistic {
    /// 分组径向距离
    pub distance: f64,
    /// 组内组件数（含异常条目）
    pub count: usize,
    /// 组内除法异常条目数
    pub anomalies: usize,
    /// 有限比值的均值（无有限比值时为 NaN）
    pub mean: f64,
    /// 有限比值的总体标准差（无有限比值时为 NaN）
    pub std_dev: f64,
}

impl BinStatistic {
    /// 参与均值计算的有效条目数
    #[inline]
    pub fn valid_count(&self) -> usize {
        self.count - self.anomalies
    }
}

/// 组内累加器
#[derive(Debug)]
struct GroupAccumulator {
    distance: f64,
    start: usize,
    sum: f64,
    valid: usize,
    count: usize,
}

impl GroupAccumulator {
    fn open(distance: f64, start: usize) -> Self {
        Self {
            distance,
            start,
            sum: 0.0,
            valid: 0,
            count: 0,
        }
    }

    #[inline]
    fn push(&mut self, ratio: &RatioValue) {
        self.count += 1;
        if let Some(value) = ratio.value() {
            self.sum += value;
            self.valid += 1;
        }
    }

    /// 关闭分组：`members` 为该组在排序后序列中的切片
    fn close(self, members: &[RatioValue]) -> CalibrationResult<BinStatistic> {
        if self.count == 0 {
            return Err(geometry_error(
                "分组成员为空",
                format!("distance {} (start {})", self.distance, self.start),
            ));
        }
        debug_assert_eq!(members.len(), self.count);

        let (mean, std_dev) = if self.valid == 0 {
            (f64::NAN, f64::NAN)
        } else {
            let n = self.valid as f64;
            let mean = self.sum / n;
            let var = members
                .iter()
                .filter_map(RatioValue::value)
                .map(|v| (v - mean) * (v - mean))
                .sum::<f64>()
                / n;
            (mean, var.sqrt())
        };

        Ok(BinStatistic {
            distance: self.distance,
            count: self.count,
            anomalies: self.count - self.valid,
            mean,
            std_dev,
        })
    }
}

/// 一次运行的全部径向分组统计
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinStatistics {
    bins: Vec<BinStatistic>,
}

impl BinStatistics {
    /// 计算径向分组统计
    ///
    /// # 参数
    /// * `bins` - 同一运行几何推导出的唯一距离集合
    /// * `radii` - 每个组件的半径（组件索引顺序，未去重）
    /// * `ratios` - 每个组件的比值（组件索引顺序）
    pub fn compute(
        bins: &RadialBinSet,
        radii: &[f64],
        ratios: &RatioVector,
    ) -> CalibrationResult<Self> {
        if radii.len() != ratios.len() {
            return Err(geometry_error(
                "半径与比值数量不一致",
                format!("{} != {}", radii.len(), ratios.len()),
            ));
        }

        // 第一遍：按半径稳定排序，比值随之重排
        let mut order: Vec<usize> = (0..radii.len()).collect();
        order.sort_by(|&a, &b| radii[a].total_cmp(&radii[b]));
        let sorted_radii: Vec<f64> = order.iter().map(|&i| radii[i]).collect();
        let sorted_ratios: Vec<RatioValue> = order.iter().map(|&i| ratios.values()[i]).collect();

        // 第二遍：单次遍历分组
        let grouped = walk_groups(
            bins.distances(),
            bins.matcher(),
            &sorted_radii,
            &sorted_ratios,
        );
        if let Err(e) = &grouped {
            tracing::error!(error = %e, "radial bin statistics aborted");
        }
        grouped.map(|bins| Self { bins })
    }

    #[inline]
    pub fn bins(&self) -> &[BinStatistic] {
        &self.bins
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// 各分组成员数之和（应等于组件总数）
    pub fn total_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }

    /// 各分组异常条目数之和
    pub fn total_anomalies(&self) -> usize {
        self.bins.iter().map(|b| b.anomalies).sum()
    }
}

fn walk_groups(
    distances: &[f64],
    matcher: RadiusMatch,
    sorted_radii: &[f64],
    sorted_ratios: &[RatioValue],
) -> CalibrationResult<Vec<BinStatistic>> {
    let mut out = Vec::with_capacity(distances.len());
    let Some(&first) = distances.first() else {
        if sorted_radii.is_empty() {
            return Ok(out);
        }
        return Err(geometry_error(
            "分组集合为空",
            format!("{} 个组件没有分组", sorted_radii.len()),
        ));
    };

    let mut cursor = 0;
    let mut acc = GroupAccumulator::open(first, 0);

    for (pos, (&r, ratio)) in sorted_radii.iter().zip(sorted_ratios).enumerate() {
        if !matcher.matches(acc.distance, r) {
            let members = &sorted_ratios[acc.start..pos];
            out.push(acc.close(members)?);

            cursor += 1;
            let next = distances.get(cursor).copied().ok_or_else(|| {
                geometry_error("半径超出全部分组", format!("radius {r} at sorted position {pos}"))
            })?;
            acc = GroupAccumulator::open(next, pos);
            if !matcher.matches(next, r) {
                // 下一个距离没有成员
                return Err(geometry_error(
                    "分组成员为空",
                    format!("distance {next}, next radius {r}"),
                ));
            }
        }
        acc.push(ratio);
    }

    let members = &sorted_ratios[acc.start..];
    out.push(acc.close(members)?);

    if out.len() != distances.len() {
        return Err(geometry_error(
            "存在没有成员的分组",
            format!("{} of {} bins closed", out.len(), distances.len()),
        ));
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finite(values: &[f64]) -> RatioVector {
        RatioVector::from_values(values.iter().map(|&value| RatioValue::Finite { value }).collect())
    }

    #[test]
    fn test_two_member_bin() {
        let r = 10f64.sqrt();
        assert_eq!(r, 3.1622776601683795);
        let radii = [r, r];
        let bins = RadialBinSet::from_radii(&radii, RadiusMatch::Exact);
        let stats = BinStatistics::compute(&bins, &radii, &finite(&[0.9, 1.1])).unwrap();

        assert_eq!(stats.len(), 1);
        let bin = stats.bins()[0];
        assert_eq!(bin.count, 2);
        assert!((bin.mean - 1.0).abs() < 1e-12);
        assert!((bin.std_dev - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_unsorted_input_grouping() {
        let radii = [2.0, 1.0, 2.0, 3.0, 1.0];
        let ratios = finite(&[1.2, 1.0, 1.4, 0.5, 2.0]);
        let bins = RadialBinSet::from_radii(&radii, RadiusMatch::Exact);
        let stats = BinStatistics::compute(&bins, &radii, &ratios).unwrap();

        let counts: Vec<usize> = stats.bins().iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 2, 1]);
        assert!((stats.bins()[0].mean - 1.5).abs() < 1e-12);
        assert!((stats.bins()[0].std_dev - 0.5).abs() < 1e-12);
        assert!((stats.bins()[1].mean - 1.3).abs() < 1e-12);
        // 单成员分组：标准差为零
        assert_eq!(stats.bins()[2].mean, 0.5);
        assert_eq!(stats.bins()[2].std_dev, 0.0);
        assert_eq!(stats.total_count(), 5);
    }

    #[test]
    fn test_last_group_closed_at_end() {
        let radii = [1.0, 5.0, 5.0, 5.0];
        let bins = RadialBinSet::from_radii(&radii, RadiusMatch::Exact);
        let stats = BinStatistics::compute(&bins, &radii, &finite(&[1.0, 2.0, 2.0, 2.0])).unwrap();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats.bins()[1].count, 3);
        assert_eq!(stats.bins()[1].mean, 2.0);
    }

    #[test]
    fn test_anomalies_excluded_from_mean() {
        let radii = [1.0, 1.0, 1.0];
        let ratios = RatioVector::from_values(vec![
            RatioValue::Finite { value: 1.0 },
            RatioValue::divide(5.0, 0.0),
            RatioValue::Finite { value: 3.0 },
        ]);
        let bins = RadialBinSet::from_radii(&radii, RadiusMatch::Exact);
        let stats = BinStatistics::compute(&bins, &radii, &ratios).unwrap();

        let bin = stats.bins()[0];
        assert_eq!(bin.count, 3);
        assert_eq!(bin.anomalies, 1);
        assert_eq!(bin.valid_count(), 2);
        assert_eq!(bin.mean, 2.0);
        assert_eq!(bin.std_dev, 1.0);
    }

    #[test]
    fn test_all_anomalies_gives_nan() {
        let radii = [1.0];
        let ratios = RatioVector::from_values(vec![RatioValue::divide(1.0, 0.0)]);
        let bins = RadialBinSet::from_radii(&radii, RadiusMatch::Exact);
        let bin = BinStatistics::compute(&bins, &radii, &ratios).unwrap().bins()[0];
        assert_eq!(bin.count, 1);
        assert!(bin.mean.is_nan());
        assert!(bin.std_dev.is_nan());
    }

    #[test]
    fn test_foreign_bin_set_is_inconsistent() {
        let radii = [1.0, 2.0];
        let ratios = finite(&[1.0, 1.0]);

        // 多出一个没有成员的距离
        let extra = RadialBinSet::from_radii(&[1.0, 1.5, 2.0], RadiusMatch::Exact);
        assert!(BinStatistics::compute(&extra, &radii, &ratios).is_err());

        // 缺少距离 2.0
        let missing = RadialBinSet::from_radii(&[1.0], RadiusMatch::Exact);
        assert!(BinStatistics::compute(&missing, &radii, &ratios).is_err());

        // 末尾多余的距离
        let trailing = RadialBinSet::from_radii(&[1.0, 2.0, 3.0], RadiusMatch::Exact);
        assert!(BinStatistics::compute(&trailing, &radii, &ratios).is_err());

        // 长度不一致
        let bins = RadialBinSet::from_radii(&radii, RadiusMatch::Exact);
        assert!(BinStatistics::compute(&bins, &radii, &finite(&[1.0])).is_err());
    }

    #[test]
    fn test_tolerance_groups_near_equal_radii() {
        let radii = [0.3, 0.1 + 0.2, 1.0];
        let ratios = finite(&[1.0, 3.0, 1.0]);

        let exact = RadialBinSet::from_radii(&radii, RadiusMatch::Exact);
        let stats = BinStatistics::compute(&exact, &radii, &ratios).unwrap();
        assert_eq!(stats.len(), 3);

        let tolerant = RadialBinSet::from_radii(&radii, RadiusMatch::Tolerance(1e-9));
        let stats = BinStatistics::compute(&tolerant, &radii, &ratios).unwrap();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats.bins()[0].count, 2);
        assert_eq!(stats.bins()[0].mean, 2.0);
    }

    #[test]
    fn test_empty_inputs() {
        let bins = RadialBinSet::from_radii(&[], RadiusMatch::Exact);
        let stats = BinStatistics::compute(&bins, &[], &finite(&[])).unwrap();
        assert!(stats.is_empty());
    }
}
