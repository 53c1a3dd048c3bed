// ==========================================
// DFS 阵容优化器 - 候选池过滤引擎
// ==========================================
// 职责: 按策略把全量球员名单缩减为优化候选池
// 红线: 除 ManualOnly 外保证最小候选池规模,
//       防止求解器在个别位置上断粮;
//       相同输入必须产出相同顺序的候选池（稳定排序键）
// ==========================================

use crate::domain::player::Player;
use crate::engine::name_match::NameMatcher;
use crate::engine::strategy::StrategyMode;
use tracing::{debug, info, instrument, warn};

/// 最小候选池规模（ManualOnly 之外的策略经回填保证）
pub const MIN_POOL_SIZE: usize = 30;

/// 择优型策略（Balanced / TopValue / HighCeiling）保留的候选数
pub const POOL_TARGET: usize = 40;

/// Balanced 策略中总分值信号的权重, 其余权重给性价比信号
const BALANCED_VALUE_WEIGHT: f64 = 0.5;

/// HighCeiling: 打击顺位进入前四的上限加成
const CEILING_TOP_ORDER_BONUS: f64 = 1.10;

/// HighCeiling: 首发确认的上限加成
const CEILING_CONFIRMED_BONUS: f64 = 1.05;

/// 过滤结果: 候选池 + 未匹配的手工选择条目（非致命告警）
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    pub pool: Vec<Player>,
    pub unmatched_tokens: Vec<String>,
}

// ==========================================
// PoolFilter - 候选池过滤引擎
// ==========================================
pub struct PoolFilter {
    // 无状态引擎,不需要注入依赖
}

impl PoolFilter {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 按策略过滤候选池
    ///
    /// # 参数
    /// - `players`: 全量球员名单（value 已由外部评分流水线定稿）
    /// - `mode`: 候选池策略
    /// - `manual_text`: 手工选择名单原始文本（可为空）
    ///
    /// # 返回
    /// FilterOutcome: 确定性排序的候选池 + 未匹配条目
    #[instrument(skip(self, players, manual_text), fields(mode = %mode, players_count = players.len()))]
    pub fn filter(&self, players: &[Player], mode: StrategyMode, manual_text: &str) -> FilterOutcome {
        let (manual_indices, unmatched_tokens) = self.match_manual(players, manual_text);

        let mut selected: Vec<usize> = match mode {
            StrategyMode::All => (0..players.len()).collect(),
            StrategyMode::ConfirmedOnly => (0..players.len())
                .filter(|&i| players[i].is_confirmed)
                .collect(),
            StrategyMode::ConfirmedPlusManual => {
                let mut indices: Vec<usize> = (0..players.len())
                    .filter(|&i| players[i].is_confirmed)
                    .collect();
                for &idx in &manual_indices {
                    if !indices.contains(&idx) {
                        indices.push(idx);
                    }
                }
                indices
            }
            StrategyMode::ManualOnly => manual_indices.clone(),
            StrategyMode::Balanced => self.top_by_score(players, POOL_TARGET, |p| {
                Self::balanced_score(p, players)
            }),
            StrategyMode::TopValue => self.top_by_score(players, POOL_TARGET, |p| p.value),
            StrategyMode::HighCeiling => {
                self.top_by_score(players, POOL_TARGET, |p| Self::ceiling_score(p))
            }
        };

        // 手工锁定的球员在任何保证性策略下都不应被挤出候选池
        if mode.guarantees_min_pool() {
            for (idx, player) in players.iter().enumerate() {
                if player.is_manually_selected && !selected.contains(&idx) {
                    selected.push(idx);
                }
            }
            self.backfill_to_min_pool(players, &mut selected);
        }

        let mut pool: Vec<Player> = selected.iter().map(|&i| players[i].clone()).collect();
        // 统一输出顺序: 分值降序, 同分按 ID 升序（幂等性依赖于此）
        pool.sort_by(|a, b| {
            b.value
                .total_cmp(&a.value)
                .then_with(|| a.player_id.cmp(&b.player_id))
        });

        info!(
            mode = mode.as_str(),
            pool_size = pool.len(),
            unmatched = unmatched_tokens.len(),
            "候选池过滤完成"
        );

        FilterOutcome {
            pool,
            unmatched_tokens,
        }
    }

    // ==========================================
    // 手工选择名单匹配
    // ==========================================

    /// 解析并匹配手工选择名单
    ///
    /// # 返回
    /// (命中的球员下标（按名单出现顺序, 去重）, 未匹配条目)
    fn match_manual(&self, players: &[Player], manual_text: &str) -> (Vec<usize>, Vec<String>) {
        if manual_text.trim().is_empty() {
            return (Vec::new(), Vec::new());
        }

        let names: Vec<String> = players.iter().map(|p| p.name.clone()).collect();
        let mut matched = Vec::new();
        let mut unmatched = Vec::new();

        for token in NameMatcher::split_tokens(manual_text) {
            match NameMatcher::find_best(&token, &names) {
                Some(idx) => {
                    if !matched.contains(&idx) {
                        matched.push(idx);
                    }
                }
                None => {
                    warn!(token = %token, "手工选择条目未匹配到任何球员");
                    unmatched.push(token);
                }
            }
        }

        debug!(
            matched = matched.len(),
            unmatched = unmatched.len(),
            "手工选择名单匹配完成"
        );
        (matched, unmatched)
    }

    // ==========================================
    // 策略评分
    // ==========================================

    /// Balanced: 总分值与性价比的归一化加权混合
    fn balanced_score(player: &Player, slate: &[Player]) -> f64 {
        let norm_value = Self::min_max_normalize(player.value, slate.iter().map(|p| p.value));
        let norm_vp1k =
            Self::min_max_normalize(player.value_per_1k(), slate.iter().map(|p| p.value_per_1k()));
        BALANCED_VALUE_WEIGHT * norm_value + (1.0 - BALANCED_VALUE_WEIGHT) * norm_vp1k
    }

    /// HighCeiling: 以打击顺位与首发确认作为上限信号的启发式评分
    fn ceiling_score(player: &Player) -> f64 {
        let mut score = player.value;
        if matches!(player.batting_order, Some(order) if order <= 4) {
            score *= CEILING_TOP_ORDER_BONUS;
        }
        if player.is_confirmed {
            score *= CEILING_CONFIRMED_BONUS;
        }
        score
    }

    fn min_max_normalize(x: f64, values: impl Iterator<Item = f64>) -> f64 {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values {
            min = min.min(v);
            max = max.max(v);
        }
        if !(max - min).is_normal() {
            // 全员同分（或空名单）时两个信号不可区分
            return 0.5;
        }
        (x - min) / (max - min)
    }

    /// 按评分取前 n 名（稳定: 同分按 ID 升序）
    fn top_by_score<F>(&self, players: &[Player], n: usize, score: F) -> Vec<usize>
    where
        F: Fn(&Player) -> f64,
    {
        // 预计算 score, 避免 sort_by 中重复计算
        let scores: Vec<f64> = players.iter().map(score).collect();
        let mut indices: Vec<usize> = (0..players.len()).collect();
        indices.sort_by(|&a, &b| {
            scores[b]
                .total_cmp(&scores[a])
                .then_with(|| players[a].player_id.cmp(&players[b].player_id))
        });
        indices.truncate(n);
        indices
    }

    /// 回填至最小候选池规模
    ///
    /// 从未入选球员中按分值降序补齐, 直到达到 MIN_POOL_SIZE
    /// 或球员耗尽
    fn backfill_to_min_pool(&self, players: &[Player], selected: &mut Vec<usize>) {
        if selected.len() >= MIN_POOL_SIZE {
            return;
        }

        let mut remaining: Vec<usize> = (0..players.len())
            .filter(|i| !selected.contains(i))
            .collect();
        remaining.sort_by(|&a, &b| {
            players[b]
                .value
                .total_cmp(&players[a].value)
                .then_with(|| players[a].player_id.cmp(&players[b].player_id))
        });

        let shortfall = MIN_POOL_SIZE - selected.len();
        let filled = remaining.len().min(shortfall);
        selected.extend(remaining.into_iter().take(shortfall));

        debug!(filled, pool_size = selected.len(), "候选池回填完成");
    }
}

impl Default for PoolFilter {
    fn default() -> Self {
        Self::new()
    }
}
