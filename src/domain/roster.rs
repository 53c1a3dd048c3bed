// ==========================================
// DFS 阵容优化器 - 花名册槽位需求
// ==========================================
// 职责: 位置 → 精确需求数量的映射
// 红线: 每个位置是"恰好等于", 不是上限
// ==========================================

use crate::domain::types::Position;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// RosterRequirements - 槽位需求
// ==========================================
// BTreeMap 保证按位置枚举顺序迭代, 阵容槽位顺序由此确定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRequirements {
    slots: BTreeMap<Position, u32>,
}

impl RosterRequirements {
    /// 从 (位置, 数量) 列表构造（数量为 0 的条目被丢弃）
    pub fn from_pairs(pairs: &[(Position, u32)]) -> Self {
        let mut slots = BTreeMap::new();
        for &(pos, count) in pairs {
            if count > 0 {
                *slots.entry(pos).or_insert(0) += count;
            }
        }
        Self { slots }
    }

    /// DraftKings 经典赛制: 2P / 1C / 1-1B / 1-2B / 1-3B / 1-SS / 3-OF, 共 10 人
    pub fn dk_classic() -> Self {
        Self::from_pairs(&[
            (Position::Pitcher, 2),
            (Position::Catcher, 1),
            (Position::FirstBase, 1),
            (Position::SecondBase, 1),
            (Position::ThirdBase, 1),
            (Position::Shortstop, 1),
            (Position::Outfield, 3),
        ])
    }

    /// 花名册总人数（所有槽位数量之和）
    pub fn roster_size(&self) -> u32 {
        self.slots.values().sum()
    }

    /// 指定位置的需求数量（未出现的位置为 0）
    pub fn required(&self, position: Position) -> u32 {
        self.slots.get(&position).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// 按位置枚举顺序迭代 (位置, 数量)
    pub fn iter(&self) -> impl Iterator<Item = (Position, u32)> + '_ {
        self.slots.iter().map(|(&pos, &count)| (pos, count))
    }
}
