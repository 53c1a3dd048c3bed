// ==========================================
// DFS 阵容优化器 - 策略定义
// ==========================================
// 用途:
// - 候选池过滤的策略化入口, 同一份球员名单在不同
//   策略下试算, 参数可复现;
// - 除 ManualOnly 外, 所有策略保证最小候选池规模。
// ==========================================

use serde::{Deserialize, Serialize};

/// 候选池策略（控制哪些球员进入优化候选池）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyMode {
    All,
    ConfirmedOnly,
    ConfirmedPlusManual,
    ManualOnly,
    Balanced,
    TopValue,
    HighCeiling,
}

impl StrategyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyMode::All => "all",
            StrategyMode::ConfirmedOnly => "confirmed_only",
            StrategyMode::ConfirmedPlusManual => "confirmed_plus_manual",
            StrategyMode::ManualOnly => "manual_only",
            StrategyMode::Balanced => "balanced",
            StrategyMode::TopValue => "top_value",
            StrategyMode::HighCeiling => "high_ceiling",
        }
    }

    pub fn title_cn(&self) -> &'static str {
        match self {
            StrategyMode::All => "全量候选",
            StrategyMode::ConfirmedOnly => "仅首发确认",
            StrategyMode::ConfirmedPlusManual => "首发确认+手工",
            StrategyMode::ManualOnly => "仅手工选择",
            StrategyMode::Balanced => "性价比均衡",
            StrategyMode::TopValue => "高分优先",
            StrategyMode::HighCeiling => "高上限",
        }
    }

    /// 该策略是否保证最小候选池规模（ManualOnly 例外:
    /// 不足即不足, 由求解阶段报错, 不做静默扩池）
    pub fn guarantees_min_pool(&self) -> bool {
        !matches!(self, StrategyMode::ManualOnly)
    }
}

impl Default for StrategyMode {
    fn default() -> Self {
        StrategyMode::All
    }
}

impl std::str::FromStr for StrategyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(StrategyMode::All),
            "confirmed_only" | "confirmed-only" => Ok(StrategyMode::ConfirmedOnly),
            "confirmed_plus_manual" | "confirmed-plus-manual" => {
                Ok(StrategyMode::ConfirmedPlusManual)
            }
            "manual_only" | "manual-only" => Ok(StrategyMode::ManualOnly),
            "balanced" => Ok(StrategyMode::Balanced),
            "top_value" | "top-value" => Ok(StrategyMode::TopValue),
            "high_ceiling" | "high-ceiling" => Ok(StrategyMode::HighCeiling),
            other => Err(format!("未知策略类型: {}", other)),
        }
    }
}

impl std::fmt::Display for StrategyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
