// ==========================================
// DFS 阵容优化器 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 求解前校验失败不得触达求解器;
//       求解失败不自动重试, 不产出降级阵容
// ==========================================

use crate::domain::types::Position;
use thiserror::Error;

/// 优化器错误类型
#[derive(Error, Debug)]
pub enum OptimizerError {
    // ===== 求解前校验错误 =====
    #[error("位置候选不足: position={position}, required={required}, available={available}")]
    InsufficientCandidatesForPosition {
        position: Position,
        required: u32,
        available: u32,
    },

    #[error("配置无效: {0}")]
    InvalidConfiguration(String),

    // ===== 求解阶段错误 =====
    #[error("无可行阵容: {reason}")]
    Infeasible { reason: String },

    #[error("求解超时: 超过 {seconds} 秒未得出结论")]
    TimedOut { seconds: u64 },

    #[error("求解器内部失败: {0}")]
    SolverFailure(String),
}
