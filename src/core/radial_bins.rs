//! 径向距离分组模块
//!
//! 将一次运行全部组件的径向距离排序去重，得到升序的唯一距离集合。
//!
//! ## 比较策略
//!
//! 默认使用精确相等（`RadiusMatch::Exact`）：数学上相等但比特不同的浮点半径
//! 不会被合并。由整数坐标经同一路径计算的半径总是比特一致，标准几何下
//! 得到 39 个距离。`RadiusMatch::Tolerance` 是可选的放宽模式。

use serde::Serialize;

/// 半径匹配策略
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RadiusMatch {
    /// 精确浮点相等
    #[default]
    Exact,

    /// 绝对差不超过给定容差即视为同一距离
    Tolerance(f64),
}

impl RadiusMatch {
    /// 判断两个半径是否属于同一分组
    #[inline]
    pub fn matches(&self, a: f64, b: f64) -> bool {
        match self {
            Self::Exact => a == b,
            Self::Tolerance(eps) => (a - b).abs() <= *eps,
        }
    }

    /// 获取策略描述（用于日志输出）
    pub fn describe(&self) -> String {
        match self {
            Self::Exact => "exact".to_string(),
            Self::Tolerance(eps) => format!("tolerance {eps:e}"),
        }
    }
}

/// 升序、无重复的径向距离集合（构造后不可变）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadialBinSet {
    distances: Vec<f64>,
    #[serde(skip)]
    matcher: RadiusMatch,
}

impl RadialBinSet {
    /// 从组件半径构造分组集合
    pub fn from_radii(radii: &[f64], matcher: RadiusMatch) -> Self {
        let mut sorted = radii.to_vec();
        sorted.sort_by(f64::total_cmp);
        // 容差模式下与组内第一个值比较，避免链式合并
        sorted.dedup_by(|next, kept| matcher.matches(*kept, *next));

        Self {
            distances: sorted,
            matcher,
        }
    }

    #[inline]
    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    #[inline]
    pub fn matcher(&self) -> RadiusMatch {
        self.matcher
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }
}
