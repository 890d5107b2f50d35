//! 核心算法模块
//!
//! 单个运行的数据处理引擎：数据表解析、几何推导、径向分组、比值与分组统计。

pub mod bin_statistics;
pub mod geometry;
pub mod radial_bins;
pub mod ratio;
pub mod record;

// 重新导出公共接口
pub use bin_statistics::{BinStatistic, BinStatistics};
pub use geometry::Position;
pub use radial_bins::{RadialBinSet, RadiusMatch};
pub use ratio::{RatioValue, RatioVector};
pub use record::{ComponentRecord, RunId, RunTable};
