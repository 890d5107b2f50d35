//! 晶体几何推导模块
//!
//! 由组件号推导晶体在 22×22 网格中的整数坐标与径向距离。
//!
//! 行列号先按 `id / 22 + 1` 与 `id + 1 - (row - 1) * 22` 计算（1 起始），
//! 再平移到以原点为中心的坐标：≤ 11 的减 12，其余减 11。
//! 因此坐标取值为 -11..=-1 与 1..=11，网格中不存在 0 行/0 列。

use crate::tools::constants::detector::{GRID_HALF, GRID_WIDTH};
use serde::Serialize;

/// 晶体位置（由组件号推导，不从文件读取）
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    /// 列坐标
    pub x: i32,
    /// 行坐标
    pub y: i32,
    /// 径向距离 sqrt(x² + y²)
    pub r: f64,
}

impl Position {
    /// 由组件号计算位置（纯函数）
    pub fn from_component(component_id: u32) -> Self {
        let id = component_id as i32;
        let row = id / GRID_WIDTH + 1;
        let col = id + 1 - (row - 1) * GRID_WIDTH;

        let y = recenter(row);
        let x = recenter(col);

        Self {
            x,
            y,
            r: radius(x, y),
        }
    }
}

#[inline]
fn recenter(index: i32) -> i32 {
    if index <= GRID_HALF {
        index - (GRID_HALF + 1)
    } else {
        index - GRID_HALF
    }
}

/// 整数坐标的径向距离
#[inline]
pub fn radius(x: i32, y: i32) -> f64 {
    let (x, y) = (x as f64, y as f64);
    (x * x + y * y).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_component_corner() {
        let pos = Position::from_component(0);
        assert_eq!((pos.x, pos.y), (-11, -11));
        assert_eq!(pos.r, 242f64.sqrt());
        assert!((pos.r - 15.556).abs() < 1e-3);
    }

    #[test]
    fn test_row_wrap() {
        // 21 是第一行最后一列，22 开始第二行
        let last = Position::from_component(21);
        assert_eq!((last.x, last.y), (11, -11));

        let next = Position::from_component(22);
        assert_eq!((next.x, next.y), (-11, -10));
    }

    #[test]
    fn test_no_zero_coordinate() {
        for id in 0..484 {
            let pos = Position::from_component(id);
            assert_ne!(pos.x, 0, "component {id}");
            assert_ne!(pos.y, 0, "component {id}");
            assert!((1..=11).contains(&pos.x.abs()));
            assert!((1..=11).contains(&pos.y.abs()));
        }
    }

    #[test]
    fn test_pure_function() {
        for id in [0, 5, 137, 331, 483] {
            assert_eq!(Position::from_component(id), Position::from_component(id));
        }
    }

    #[test]
    fn test_point_symmetry() {
        // 组件 id 与 483 - id 关于原点对称
        for id in 0..484u32 {
            let a = Position::from_component(id);
            let b = Position::from_component(483 - id);
            assert_eq!((a.x, a.y), (-b.x, -b.y));
            assert_eq!(a.r, b.r);
        }
    }
}
