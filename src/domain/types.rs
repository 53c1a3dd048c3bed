// ==========================================
// DFS 阵容优化器 - 领域类型定义
// ==========================================
// 职责: 位置体系与共享枚举
// 红线: 位置是封闭枚举,不是自由字符串
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 场上位置 (Position)
// ==========================================
// 枚举声明顺序即花名册槽位的自然顺序
// (BTreeMap<Position, _> 依此迭代, 保证确定性)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "P")]
    Pitcher,
    #[serde(rename = "C")]
    Catcher,
    #[serde(rename = "1B")]
    FirstBase,
    #[serde(rename = "2B")]
    SecondBase,
    #[serde(rename = "3B")]
    ThirdBase,
    #[serde(rename = "SS")]
    Shortstop,
    #[serde(rename = "OF")]
    Outfield,
}

impl Position {
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Pitcher => "P",
            Position::Catcher => "C",
            Position::FirstBase => "1B",
            Position::SecondBase => "2B",
            Position::ThirdBase => "3B",
            Position::Shortstop => "SS",
            Position::Outfield => "OF",
        }
    }

    /// 是否为投手位（排他角色）
    ///
    /// 投手位承担两类特殊规则:
    /// - 对位排除约束（投手与对方打者互斥）
    /// - 相关性加成分组时被剔除（打线加成只作用于打者）
    pub fn is_pitcher(&self) -> bool {
        matches!(self, Position::Pitcher)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Position {
    type Err = String;

    /// 解析位置代码
    ///
    /// 兼容常见数据源别名: SP/RP → P, LF/CF/RF → OF
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "P" | "SP" | "RP" => Ok(Position::Pitcher),
            "C" => Ok(Position::Catcher),
            "1B" => Ok(Position::FirstBase),
            "2B" => Ok(Position::SecondBase),
            "3B" => Ok(Position::ThirdBase),
            "SS" => Ok(Position::Shortstop),
            "OF" | "LF" | "CF" | "RF" => Ok(Position::Outfield),
            other => Err(format!("未知位置代码: {}", other)),
        }
    }
}
