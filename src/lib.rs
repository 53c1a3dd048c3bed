// ==========================================
// DFS 阵容优化器 - 核心库
// ==========================================
// 系统定位: 决策支持子系统 (上游评分/下游导出均为外部协作方)
// 核心: 整数线性规划指派模型 + 多样性再优化循环
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 配置层 - 优化运行参数
pub mod config;

// 引擎层 - 业务规则
pub mod engine;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

pub use config::OptimizerConfig;
pub use domain::{GenerationReport, Lineup, LineupSlot, Player, Position, RosterRequirements};
pub use engine::{
    CorrelationEngine, LineupOrchestrator, LineupSolver, NameMatcher, OptimizerError, PoolFilter,
    StrategyMode,
};
