// ==========================================
// DFS 阵容优化器 - 球员记录
// ==========================================
// 职责: 一次优化运行的不可变输入记录
// 红线: value 由外部评分协作方产出, 优化器只读不写;
//       运行期派生量(相关性加成/多样性惩罚)一律存放在
//       以 player_id 为键的运行本地映射, 不回写球员对象
// ==========================================

use crate::domain::types::Position;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 球员记录校验错误
#[derive(Error, Debug)]
pub enum PlayerValidationError {
    #[error("薪资必须为正整数: player_id={player_id}, salary={salary}")]
    NonPositiveSalary { player_id: String, salary: u32 },

    #[error("value 必须为非负有限数: player_id={player_id}, value={value}")]
    InvalidValue { player_id: String, value: f64 },

    #[error("球员 ID 不能为空")]
    EmptyPlayerId,
}

// ==========================================
// Player - 球员记录
// ==========================================
// 可选字段在构造时一次性解析为声明缺省值,
// 下游引擎不再做任何"字段可能缺失"的兜底
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// 唯一稳定标识（来自上游数据源）
    pub player_id: String,

    /// 展示名（手工选择名单按此匹配）
    pub name: String,

    /// 所属球队代码
    pub team: String,

    /// 薪资（成本单位, 正整数）
    pub salary: u32,

    /// 可上场位置集合（非空, 去重, 恒包含 primary_position）
    pub eligible_positions: Vec<Position>,

    /// 主位置
    pub primary_position: Position,

    /// 最终评分值（优化目标系数, 非负; 由外部评分流水线产出）
    pub value: f64,

    /// 打击顺位（仅相关性加成使用; 缺省 None = 不参与打线分组）
    #[serde(default)]
    pub batting_order: Option<u8>,

    /// 是否首发确认（仅策略过滤使用; 缺省 false）
    #[serde(default)]
    pub is_confirmed: bool,

    /// 是否手工锁定（仅策略过滤使用; 缺省 false）
    #[serde(default)]
    pub is_manually_selected: bool,

    /// 对方球队代码（仅对位排除约束使用; 缺省 None = 不施加排除）
    #[serde(default)]
    pub opponent_team: Option<String>,
}

impl Player {
    /// 构造球员记录
    ///
    /// 所有可选字段在此处落到声明缺省值, 之后通过 `with_*` 覆写。
    ///
    /// # 参数
    /// - `player_id`: 唯一稳定标识
    /// - `name`: 展示名
    /// - `team`: 球队代码
    /// - `salary`: 薪资（必须 >= 1）
    /// - `primary_position`: 主位置（自动并入可上场集合）
    /// - `value`: 最终评分值（必须非负有限）
    ///
    /// # 返回
    /// 校验通过的 Player, 否则 PlayerValidationError
    pub fn new(
        player_id: impl Into<String>,
        name: impl Into<String>,
        team: impl Into<String>,
        salary: u32,
        primary_position: Position,
        value: f64,
    ) -> Result<Self, PlayerValidationError> {
        let player_id = player_id.into();
        if player_id.trim().is_empty() {
            return Err(PlayerValidationError::EmptyPlayerId);
        }
        if salary == 0 {
            return Err(PlayerValidationError::NonPositiveSalary { player_id, salary });
        }
        if !value.is_finite() || value < 0.0 {
            return Err(PlayerValidationError::InvalidValue { player_id, value });
        }

        Ok(Self {
            player_id,
            name: name.into(),
            team: team.into(),
            salary,
            eligible_positions: vec![primary_position],
            primary_position,
            value,
            batting_order: None,
            is_confirmed: false,
            is_manually_selected: false,
            opponent_team: None,
        })
    }

    /// 覆写可上场位置集合（去重, 并强制包含主位置）
    pub fn with_eligible_positions(mut self, positions: &[Position]) -> Self {
        let mut eligible = Vec::with_capacity(positions.len() + 1);
        for pos in positions {
            if !eligible.contains(pos) {
                eligible.push(*pos);
            }
        }
        if !eligible.contains(&self.primary_position) {
            eligible.push(self.primary_position);
        }
        self.eligible_positions = eligible;
        self
    }

    pub fn with_batting_order(mut self, order: u8) -> Self {
        self.batting_order = Some(order);
        self
    }

    pub fn with_confirmed(mut self, confirmed: bool) -> Self {
        self.is_confirmed = confirmed;
        self
    }

    pub fn with_manually_selected(mut self, selected: bool) -> Self {
        self.is_manually_selected = selected;
        self
    }

    pub fn with_opponent_team(mut self, opponent: impl Into<String>) -> Self {
        self.opponent_team = Some(opponent.into());
        self
    }

    /// 是否可上场于指定位置
    pub fn is_eligible_for(&self, position: Position) -> bool {
        self.eligible_positions.contains(&position)
    }

    /// 是否为投手（任一可上场位置为投手位即算）
    pub fn is_pitcher(&self) -> bool {
        self.eligible_positions.iter().any(|p| p.is_pitcher())
    }

    /// 每千元薪资评分值（Balanced 策略使用）
    pub fn value_per_1k(&self) -> f64 {
        self.value / (self.salary as f64 / 1000.0)
    }
}
