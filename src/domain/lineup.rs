// ==========================================
// DFS 阵容优化器 - 阵容结果
// ==========================================
// 职责: 求解结果的输出记录
// 红线: total_value 按原始 value 汇总;
//       相关性加成只影响目标函数, 不进入对外结果
// ==========================================

use crate::domain::player::Player;
use crate::domain::types::Position;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 单个阵容槽位: 球员 + 被指派位置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineupSlot {
    pub position: Position,
    pub player: Player,
}

// ==========================================
// Lineup - 完整阵容
// ==========================================
// 槽位顺序 = 需求映射的位置顺序 (P, C, 1B, 2B, 3B, SS, OF)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lineup {
    pub slots: Vec<LineupSlot>,
    pub total_salary: u32,
    pub total_value: f64,
}

impl Lineup {
    /// 由已排序的槽位列表构造, 汇总字段在此统一计算
    pub fn from_slots(slots: Vec<LineupSlot>) -> Self {
        let total_salary = slots.iter().map(|s| s.player.salary).sum();
        let total_value = slots.iter().map(|s| s.player.value).sum();
        Self {
            slots,
            total_salary,
            total_value,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// 入选球员 ID 集合
    pub fn player_ids(&self) -> HashSet<String> {
        self.slots
            .iter()
            .map(|s| s.player.player_id.clone())
            .collect()
    }

    /// 指定位置的已指派人数
    pub fn count_for_position(&self, position: Position) -> usize {
        self.slots.iter().filter(|s| s.position == position).count()
    }

    /// 指定球队的入选人数
    pub fn count_for_team(&self, team: &str) -> usize {
        self.slots.iter().filter(|s| s.player.team == team).count()
    }
}

// ==========================================
// GenerationReport - 一次生成运行的汇总输出
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    /// 运行标识（uuid v4）
    pub run_id: String,

    /// 生成时刻
    pub generated_at: DateTime<Utc>,

    /// 按生成顺序排列的阵容列表
    pub lineups: Vec<Lineup>,

    /// 非致命告警（如手工选择名单中未匹配的条目）
    pub warnings: Vec<String>,
}
