// ==========================================
// DFS 阵容优化器 - 相关性加成预计算引擎
// ==========================================
// 职责: 求解前为同队打线相邻的打者派生目标系数加成
// 红线: 目标函数保持严格线性 —— 禁止任何
//       "选中 A 且选中 B" 的变量乘积项;
//       加成只进运行本地映射, 不回写球员 value
// ==========================================
// 背景: 两名打者同时入选的相关性奖励本质上是二次项,
// 线性整数规划无法表达。此处改为单边的求解前估计:
// 打线靠前的可叠加槽位直接放大派生系数, 让求解器
// 在不破坏线性的前提下偏向历史上共同得分的组合。
// ==========================================

use crate::domain::player::Player;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument};

/// 可叠加槽位的派生系数乘数
pub const STACK_BONUS: f64 = 1.05;

/// 可叠加的打击顺位集合
pub const STACKABLE_SLOTS: [u8; 3] = [1, 3, 5];

/// 参与打线分组的球队最少打者数
pub const MIN_STACK_GROUP: usize = 3;

/// 每队最多纳入打线分组的打者数
pub const MAX_STACK_GROUP: usize = 5;

// ==========================================
// CorrelationEngine - 相关性加成引擎
// ==========================================
pub struct CorrelationEngine {
    // 无状态引擎,不需要注入依赖
}

impl CorrelationEngine {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 计算候选池的派生目标系数
    ///
    /// # 规则
    /// 1) 非投手且有打击顺位的球员按球队分组
    /// 2) 组内人数 >= MIN_STACK_GROUP 的球队:
    ///    取打击顺位最小的前 MAX_STACK_GROUP 人
    ///    (顺位并列按 value 降序, 再按 ID 升序)
    /// 3) 其中顺位落在 STACKABLE_SLOTS 者, 派生系数 = value * STACK_BONUS
    /// 4) 其余球员派生系数 = value
    ///
    /// # 参数
    /// - `pool`: 候选池
    /// - `enabled`: 关闭时返回恒等映射
    ///
    /// # 返回
    /// player_id → 派生目标系数（运行本地, 用后即弃）
    #[instrument(skip(self, pool), fields(pool_size = pool.len(), enabled))]
    pub fn adjusted_values(&self, pool: &[Player], enabled: bool) -> HashMap<String, f64> {
        let mut adjusted: HashMap<String, f64> =
            pool.iter().map(|p| (p.player_id.clone(), p.value)).collect();

        if !enabled {
            return adjusted;
        }

        // BTreeMap 保证球队遍历顺序确定
        let mut by_team: BTreeMap<&str, Vec<&Player>> = BTreeMap::new();
        for player in pool {
            if player.is_pitcher() || player.batting_order.is_none() {
                continue;
            }
            by_team.entry(player.team.as_str()).or_default().push(player);
        }

        let mut bonus_count = 0usize;
        for (team, mut batters) in by_team {
            if batters.len() < MIN_STACK_GROUP {
                continue;
            }

            batters.sort_by(|a, b| {
                a.batting_order
                    .cmp(&b.batting_order)
                    .then_with(|| b.value.total_cmp(&a.value))
                    .then_with(|| a.player_id.cmp(&b.player_id))
            });
            batters.truncate(MAX_STACK_GROUP);

            for batter in batters {
                // 分组阶段已滤掉无顺位球员
                let Some(order) = batter.batting_order else {
                    continue;
                };
                if STACKABLE_SLOTS.contains(&order) {
                    if let Some(coeff) = adjusted.get_mut(&batter.player_id) {
                        *coeff *= STACK_BONUS;
                        bonus_count += 1;
                    }
                }
            }
            debug!(team = %team, "打线分组加成已应用");
        }

        debug!(bonus_count, "相关性加成预计算完成");
        adjusted
    }
}

impl Default for CorrelationEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Position;

    fn batter(id: &str, team: &str, value: f64, order: Option<u8>) -> Player {
        let p = Player::new(id, id, team, 4500, Position::Outfield, value).unwrap();
        match order {
            Some(o) => p.with_batting_order(o),
            None => p,
        }
    }

    fn pitcher(id: &str, team: &str, value: f64) -> Player {
        Player::new(id, id, team, 8500, Position::Pitcher, value).unwrap()
    }

    #[test]
    fn test_stackable_slots_get_bonus() {
        let pool = vec![
            batter("b1", "NYY", 10.0, Some(1)),
            batter("b2", "NYY", 9.0, Some(2)),
            batter("b3", "NYY", 8.0, Some(3)),
            batter("b4", "NYY", 7.0, Some(5)),
        ];
        let engine = CorrelationEngine::new();
        let adjusted = engine.adjusted_values(&pool, true);

        assert!((adjusted["b1"] - 10.0 * STACK_BONUS).abs() < 1e-9);
        assert!((adjusted["b2"] - 9.0).abs() < 1e-9);
        assert!((adjusted["b3"] - 8.0 * STACK_BONUS).abs() < 1e-9);
        assert!((adjusted["b4"] - 7.0 * STACK_BONUS).abs() < 1e-9);
        // 原始 value 不被触碰
        assert!((pool[0].value - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_small_team_group_gets_no_bonus() {
        let pool = vec![
            batter("b1", "BOS", 10.0, Some(1)),
            batter("b2", "BOS", 9.0, Some(3)),
        ];
        let adjusted = CorrelationEngine::new().adjusted_values(&pool, true);
        assert!((adjusted["b1"] - 10.0).abs() < 1e-9);
        assert!((adjusted["b2"] - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_pitchers_and_missing_order_excluded() {
        let pool = vec![
            pitcher("p1", "NYY", 20.0),
            batter("b1", "NYY", 10.0, Some(1)),
            batter("b2", "NYY", 9.0, Some(3)),
            batter("b3", "NYY", 8.0, None),
        ];
        // 有顺位的打者只有 2 人, 不足 MIN_STACK_GROUP
        let adjusted = CorrelationEngine::new().adjusted_values(&pool, true);
        assert!((adjusted["p1"] - 20.0).abs() < 1e-9);
        assert!((adjusted["b1"] - 10.0).abs() < 1e-9);
        assert!((adjusted["b3"] - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_group_caps_at_five_lowest_orders() {
        let pool: Vec<Player> = (1..=7)
            .map(|o| batter(&format!("b{}", o), "LAD", 10.0 - o as f64 * 0.1, Some(o)))
            .collect();
        let adjusted = CorrelationEngine::new().adjusted_values(&pool, true);
        // 顺位 1..=5 进组, 其中 {1,3,5} 获加成; 顺位 6、7 出组
        assert!((adjusted["b1"] - pool[0].value * STACK_BONUS).abs() < 1e-9);
        assert!((adjusted["b3"] - pool[2].value * STACK_BONUS).abs() < 1e-9);
        assert!((adjusted["b5"] - pool[4].value * STACK_BONUS).abs() < 1e-9);
        assert!((adjusted["b2"] - pool[1].value).abs() < 1e-9);
        assert!((adjusted["b6"] - pool[5].value).abs() < 1e-9);
        assert!((adjusted["b7"] - pool[6].value).abs() < 1e-9);
    }

    #[test]
    fn test_disabled_returns_identity() {
        let pool = vec![
            batter("b1", "NYY", 10.0, Some(1)),
            batter("b2", "NYY", 9.0, Some(3)),
            batter("b3", "NYY", 8.0, Some(5)),
        ];
        let adjusted = CorrelationEngine::new().adjusted_values(&pool, false);
        for p in &pool {
            assert!((adjusted[&p.player_id] - p.value).abs() < 1e-9);
        }
    }
}
