// ==========================================
// DFS 阵容优化器 - 优化配置
// ==========================================
// 职责: 一次优化运行的全部可调参数
// 红线: 校验失败的配置不得进入求解阶段
// ==========================================

use crate::engine::strategy::StrategyMode;
use serde::{Deserialize, Serialize};

fn default_salary_cap() -> u32 {
    50_000
}

fn default_min_salary_usage() -> f64 {
    0.95
}

fn default_max_per_team() -> u32 {
    5
}

fn default_max_opposing_selections() -> u32 {
    0
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_use_correlation_bonus() -> bool {
    true
}

// ==========================================
// OptimizerConfig - 优化运行配置
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// 工资帽（薪资总和上限）
    #[serde(default = "default_salary_cap")]
    pub salary_cap: u32,

    /// 最低薪资使用率（0~1, 薪资总和下限 = salary_cap * 该值）
    #[serde(default = "default_min_salary_usage")]
    pub min_salary_usage: f64,

    /// 单队入选人数上限
    #[serde(default = "default_max_per_team")]
    pub max_per_team: u32,

    /// 投手被选中时, 对方球队最多可入选人数
    #[serde(default = "default_max_opposing_selections")]
    pub max_opposing_selections: u32,

    /// 求解墙钟超时（秒）
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// 是否启用相关性(打线)加成
    #[serde(default = "default_use_correlation_bonus")]
    pub use_correlation_bonus: bool,

    /// 候选池策略
    #[serde(default)]
    pub strategy_mode: StrategyMode,

    /// 手工选择名单原始文本（自由格式, 分隔符宽容）
    #[serde(default)]
    pub manual_selection_text: String,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            salary_cap: default_salary_cap(),
            min_salary_usage: default_min_salary_usage(),
            max_per_team: default_max_per_team(),
            max_opposing_selections: default_max_opposing_selections(),
            timeout_seconds: default_timeout_seconds(),
            use_correlation_bonus: default_use_correlation_bonus(),
            strategy_mode: StrategyMode::default(),
            manual_selection_text: String::new(),
        }
    }
}

impl OptimizerConfig {
    /// 校验配置
    ///
    /// # 返回
    /// Ok(()) 或第一条违规原因（由上层包装为 InvalidConfiguration）
    pub fn validate(&self) -> Result<(), String> {
        if self.salary_cap == 0 {
            return Err("salary_cap 必须为正整数".to_string());
        }
        if !self.min_salary_usage.is_finite()
            || self.min_salary_usage < 0.0
            || self.min_salary_usage > 1.0
        {
            return Err(format!(
                "min_salary_usage 必须在 [0,1] 区间: {}",
                self.min_salary_usage
            ));
        }
        if self.max_per_team == 0 {
            return Err("max_per_team 必须为正整数".to_string());
        }
        if self.timeout_seconds == 0 {
            return Err("timeout_seconds 必须为正整数".to_string());
        }
        Ok(())
    }
}
