//! 常量和默认配置集中管理
//!
//! 将所有重要常量集中定义，避免"默认值漂移"和重复定义

/// FT-Cal 探测器几何与数据表常量
pub mod detector {
    /// 每个运行的组件（晶体）数量
    pub const COMPONENT_COUNT: usize = 332;

    /// 每行数据的字段数量
    ///
    /// sector, layer, component, pedestal, noise, charge, chargeSigma, ampMean, ampSigma
    pub const FIELDS_PER_ROW: usize = 9;

    /// 晶体网格边长（22×22）
    pub const GRID_WIDTH: i32 = 22;

    /// 网格中心偏移阈值
    ///
    /// 行列号 ≤ 11 时减 12，否则减 11，使坐标跳过 0
    pub const GRID_HALF: i32 = 11;

    /// 标准几何下的径向距离种类数
    ///
    /// 仅作为参考值用于诊断，算法本身不依赖它
    pub const REFERENCE_BIN_COUNT: usize = 39;
}

/// 运行文件命名约定
pub mod naming {
    /// 文件名中运行号前的固定标记
    pub const RUN_MARKER: &str = "ftCalLed_-";

    /// 运行号字符宽度
    pub const RUN_ID_WIDTH: usize = 5;

    /// 数据文件扩展名
    pub const DATA_EXTENSION: &str = "txt";
}

/// 绘图端建议的纵轴范围
pub mod plot_ranges {
    /// 比值-组件号图
    pub const RATIO_Y_RANGE: (f64, f64) = (0.8, 1.1);

    /// 径向平均比值图
    pub const RADIAL_Y_RANGE: (f64, f64) = (0.9, 1.1);
}

/// 默认配置值
pub mod defaults {
    /// 默认多文件并行并发度
    pub const PARALLEL_FILES_DEGREE: usize = 4;

    /// 详细模式下预览的幅度个数
    pub const PREVIEW_COUNT: usize = 10;
}

/// 并发度限制常量
pub mod parallel_limits {
    /// 最小并发度
    pub const MIN_PARALLEL_DEGREE: usize = 1;

    /// 最大并发度
    ///
    /// 运行文件很小，过高并发只会增加线程开销
    pub const MAX_PARALLEL_DEGREE: usize = 16;
}
