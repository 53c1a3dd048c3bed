// ==========================================
// DFS 阵容优化器 - 引擎编排器
// ==========================================
// 用途: 协调过滤 → 相关性加成 → 多样性求解循环
// 红线: 多样性惩罚只作用于运行本地系数映射,
//       每次求解前从净版映射重建（共享球员对象零改写,
//       并发运行互不可见）
// ==========================================

use crate::config::OptimizerConfig;
use crate::domain::lineup::{GenerationReport, Lineup};
use crate::domain::player::Player;
use crate::domain::roster::RosterRequirements;
use crate::engine::correlation::CorrelationEngine;
use crate::engine::error::OptimizerError;
use crate::engine::pool_filter::PoolFilter;
use crate::engine::solver::LineupSolver;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// 出现在任一已接受阵容中的球员, 下一次求解的派生系数乘数
pub const DIVERSITY_PENALTY: f64 = 0.8;

// ==========================================
// LineupOrchestrator - 引擎编排器
// ==========================================
pub struct LineupOrchestrator {
    filter: PoolFilter,
    correlation: CorrelationEngine,
    solver: LineupSolver,
}

impl LineupOrchestrator {
    /// 构造函数
    pub fn new() -> Self {
        Self {
            filter: PoolFilter::new(),
            correlation: CorrelationEngine::new(),
            solver: LineupSolver::new(),
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 生成 n 个阵容
    ///
    /// 多样性循环是贪心再优化: 每轮对已用过的球员施加
    /// 软性系数惩罚后重解同一问题实例。候选池相对花名册
    /// 偏小时, 阵容间高重叠是预期行为, 不保证唯一性。
    ///
    /// # 参数
    /// - `players`: 全量球员名单（value 已定稿, 运行期间不可变）
    /// - `requirements`: 槽位需求
    /// - `config`: 优化配置
    /// - `n`: 阵容数量（>= 1）
    ///
    /// # 返回
    /// GenerationReport, 或第一条带类型的失败
    /// （求解阶段失败不重试, 不返回部分结果）
    #[instrument(skip(self, players, requirements, config), fields(players_count = players.len(), lineup_count = n))]
    pub fn generate(
        &self,
        players: &[Player],
        requirements: &RosterRequirements,
        config: &OptimizerConfig,
        n: usize,
    ) -> Result<GenerationReport, OptimizerError> {
        if n == 0 {
            return Err(OptimizerError::InvalidConfiguration(
                "阵容数量必须 >= 1".to_string(),
            ));
        }
        config
            .validate()
            .map_err(OptimizerError::InvalidConfiguration)?;

        info!(
            strategy = config.strategy_mode.as_str(),
            lineup_count = n,
            "开始阵容生成运行"
        );

        debug!("步骤1: 执行候选池过滤");
        let outcome = self.filter.filter(
            players,
            config.strategy_mode,
            &config.manual_selection_text,
        );

        debug!("步骤2: 计算相关性加成");
        let adjusted = self
            .correlation
            .adjusted_values(&outcome.pool, config.use_correlation_bonus);

        debug!("步骤3: 多样性求解循环");
        let mut lineups: Vec<Lineup> = Vec::with_capacity(n);
        let mut used_ids: HashSet<String> = HashSet::new();

        for round in 0..n {
            // 每轮从净版映射重建, 不在共享状态上做应用/回滚
            let coefficients = Self::penalized(&adjusted, &used_ids);
            let lineup = self
                .solver
                .solve(&outcome.pool, &coefficients, requirements, config)?;

            used_ids.extend(lineup.player_ids());
            info!(
                round = round + 1,
                total_salary = lineup.total_salary,
                total_value = lineup.total_value,
                "阵容已接受"
            );
            lineups.push(lineup);
        }

        Ok(GenerationReport {
            run_id: Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            lineups,
            warnings: outcome
                .unmatched_tokens
                .iter()
                .map(|t| format!("手工选择条目未匹配: {}", t))
                .collect(),
        })
    }

    /// 对已用球员施加多样性惩罚后的系数映射
    fn penalized(
        adjusted: &HashMap<String, f64>,
        used_ids: &HashSet<String>,
    ) -> HashMap<String, f64> {
        if used_ids.is_empty() {
            return adjusted.clone();
        }
        adjusted
            .iter()
            .map(|(id, &coeff)| {
                let factor = if used_ids.contains(id) {
                    DIVERSITY_PENALTY
                } else {
                    1.0
                };
                (id.clone(), coeff * factor)
            })
            .collect()
    }
}

impl Default for LineupOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}
