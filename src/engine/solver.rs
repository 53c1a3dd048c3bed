// ==========================================
// DFS 阵容优化器 - 约束模型与求解引擎
// ==========================================
// 职责: 构建指派问题的整数线性规划模型并调用外部求解器
// 红线: 目标函数严格线性（相关性加成已烘焙进派生系数,
//       模型中不允许出现任何变量乘积项）;
//       求解前校验失败不得触达求解器;
//       求解失败不产出降级阵容
// ==========================================
// 决策变量:
// - select[i]      二元, 球员 i 是否入选
// - assign[i][pos] 二元, 球员 i 是否被指派到位置 pos
//                  （仅对需求映射中出现且 i 可上场的位置建变量）
// ==========================================

use crate::config::OptimizerConfig;
use crate::domain::lineup::{Lineup, LineupSlot};
use crate::domain::player::Player;
use crate::domain::roster::RosterRequirements;
use crate::domain::types::Position;
use crate::engine::error::OptimizerError;
use good_lp::{
    default_solver, variable, variables, Expression, ResolutionError, Solution, SolverModel,
    Variable,
};
use std::collections::{BTreeMap, HashMap};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// 求解任务（整体移交给求解线程）
struct SolveJob {
    players: Vec<Player>,
    /// 与 players 对齐的派生目标系数
    coefficients: Vec<f64>,
    requirements: RosterRequirements,
    salary_cap: u32,
    min_salary_usage: f64,
    max_per_team: u32,
    max_opposing_selections: u32,
}

// ==========================================
// LineupSolver - 求解引擎
// ==========================================
pub struct LineupSolver {
    // 无状态引擎,不需要注入依赖
}

impl LineupSolver {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 求解单个阵容
    ///
    /// # 参数
    /// - `pool`: 候选池（已过滤）
    /// - `adjusted_values`: player_id → 派生目标系数
    ///   （相关性加成/多样性惩罚已在其中, 缺省回落到原始 value）
    /// - `requirements`: 槽位需求
    /// - `config`: 优化配置
    ///
    /// # 返回
    /// 最优阵容, 或带类型的失败（Infeasible / TimedOut / ...）
    #[instrument(skip_all, fields(pool_size = pool.len(), timeout_s = config.timeout_seconds))]
    pub fn solve(
        &self,
        pool: &[Player],
        adjusted_values: &HashMap<String, f64>,
        requirements: &RosterRequirements,
        config: &OptimizerConfig,
    ) -> Result<Lineup, OptimizerError> {
        config
            .validate()
            .map_err(OptimizerError::InvalidConfiguration)?;
        if requirements.is_empty() {
            return Err(OptimizerError::InvalidConfiguration(
                "槽位需求映射为空".to_string(),
            ));
        }

        // value == 0 的球员不进可选集: 目标函数不会奖励它,
        // 约束也绝不能强迫它入选
        let players: Vec<Player> = pool.iter().filter(|p| p.value > 0.0).cloned().collect();
        let dropped = pool.len() - players.len();
        if dropped > 0 {
            debug!(dropped, "零分值球员已从可选集剔除");
        }

        self.validate_position_coverage(&players, requirements)?;

        let roster_size = requirements.roster_size() as usize;
        if players.len() < roster_size {
            return Err(OptimizerError::Infeasible {
                reason: format!(
                    "候选池仅 {} 人, 不足花名册 {} 人",
                    players.len(),
                    roster_size
                ),
            });
        }

        let coefficients: Vec<f64> = players
            .iter()
            .map(|p| adjusted_values.get(&p.player_id).copied().unwrap_or(p.value))
            .collect();

        let job = SolveJob {
            players,
            coefficients,
            requirements: requirements.clone(),
            salary_cap: config.salary_cap,
            min_salary_usage: config.min_salary_usage,
            max_per_team: config.max_per_team,
            max_opposing_selections: config.max_opposing_selections,
        };

        self.solve_with_deadline(job, config.timeout_seconds)
    }

    // ==========================================
    // 求解前校验
    // ==========================================

    /// 逐位置检查候选覆盖, 不足立即失败（不触达求解器）
    fn validate_position_coverage(
        &self,
        players: &[Player],
        requirements: &RosterRequirements,
    ) -> Result<(), OptimizerError> {
        for (position, required) in requirements.iter() {
            let available = players
                .iter()
                .filter(|p| p.is_eligible_for(position))
                .count() as u32;
            if available < required {
                return Err(OptimizerError::InsufficientCandidatesForPosition {
                    position,
                    required,
                    available,
                });
            }
        }
        Ok(())
    }

    // ==========================================
    // 超时隔离
    // ==========================================

    /// 在专用线程上求解, 主调线程以墙钟超时等待
    ///
    /// 超时后工作线程被放弃, 其最终结果直接丢弃
    /// （求解器本身不支持协作取消）
    fn solve_with_deadline(
        &self,
        job: SolveJob,
        timeout_seconds: u64,
    ) -> Result<Lineup, OptimizerError> {
        let (tx, rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("lineup-solver".into())
            .spawn(move || {
                let outcome = match catch_unwind(AssertUnwindSafe(|| Self::run_model(&job))) {
                    Ok(result) => result,
                    Err(_) => Err(OptimizerError::SolverFailure(
                        "求解线程发生 panic".to_string(),
                    )),
                };
                let _ = tx.send(outcome);
            })
            .map_err(|e| OptimizerError::SolverFailure(format!("无法启动求解线程: {}", e)))?;

        match rx.recv_timeout(Duration::from_secs(timeout_seconds)) {
            Ok(outcome) => {
                let _ = handle.join();
                outcome
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                warn!(timeout_seconds, "求解超时, 放弃工作线程");
                Err(OptimizerError::TimedOut {
                    seconds: timeout_seconds,
                })
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(OptimizerError::SolverFailure(
                "求解线程未返回结果即退出".to_string(),
            )),
        }
    }

    // ==========================================
    // 模型构建与求解（在工作线程上执行）
    // ==========================================

    fn run_model(job: &SolveJob) -> Result<Lineup, OptimizerError> {
        let n = job.players.len();
        let roster_size = job.requirements.roster_size() as f64;

        let mut vars = variables!();

        // 入选变量
        let select: Vec<Variable> = (0..n)
            .map(|i| vars.add(variable().binary().name(format!("sel_{}", i))))
            .collect();

        // 指派变量: 仅为 (可上场 ∩ 有需求) 的位置建变量
        let mut assign: Vec<Vec<(Position, Variable)>> = Vec::with_capacity(n);
        for (i, player) in job.players.iter().enumerate() {
            let mut per_player = Vec::new();
            for (position, _) in job.requirements.iter() {
                if player.is_eligible_for(position) {
                    let var = vars.add(
                        variable()
                            .binary()
                            .name(format!("asg_{}_{}", i, position.as_str())),
                    );
                    per_player.push((position, var));
                }
            }
            assign.push(per_player);
        }

        // 目标: 最大化派生系数加权的入选变量和（严格线性）
        let mut objective = Expression::with_capacity(n);
        for (i, &sel) in select.iter().enumerate() {
            objective.add_mul(job.coefficients[i], sel);
        }

        let mut problem = vars.maximise(objective).using(default_solver);

        // 约束 1: 入选总人数 = 花名册人数
        let mut total_selected = Expression::with_capacity(n);
        for &sel in &select {
            total_selected.add_mul(1.0, sel);
        }
        problem.add_constraint(total_selected.eq(roster_size));

        // 约束 2/3: 薪资总和落在 [cap * min_usage, cap]
        let mut total_salary = Expression::with_capacity(n);
        for (i, &sel) in select.iter().enumerate() {
            total_salary.add_mul(job.players[i].salary as f64, sel);
        }
        let cap = job.salary_cap as f64;
        problem.add_constraint(total_salary.clone().leq(cap));
        problem.add_constraint(total_salary.geq(cap * job.min_salary_usage));

        // 约束 4: 每个位置的指派数恰好等于需求数
        for (position, required) in job.requirements.iter() {
            let mut assigned = Expression::default();
            for per_player in &assign {
                for &(pos, var) in per_player {
                    if pos == position {
                        assigned.add_mul(1.0, var);
                    }
                }
            }
            problem.add_constraint(assigned.eq(required as f64));
        }

        // 约束 5: 球员的指派数不超过其入选变量
        // （与约束 1/4 联立后, 入选者恰好落到一个可上场位置）
        for (i, per_player) in assign.iter().enumerate() {
            let mut assigned = Expression::default();
            for &(_, var) in per_player {
                assigned.add_mul(1.0, var);
            }
            assigned.add_mul(-1.0, select[i]);
            problem.add_constraint(assigned.leq(0.0));
        }

        // 约束 6: 单队入选人数上限
        let mut by_team: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (i, player) in job.players.iter().enumerate() {
            by_team.entry(player.team.as_str()).or_default().push(i);
        }
        for (_, members) in by_team.iter() {
            if members.len() as u32 <= job.max_per_team {
                continue;
            }
            let mut team_selected = Expression::default();
            for &i in members {
                team_selected.add_mul(1.0, select[i]);
            }
            problem.add_constraint(team_selected.leq(job.max_per_team as f64));
        }

        // 约束 7: 对位排除（big-M 形式, 仅当投手入选时生效）
        //   Σ 对方球队入选 + M * select[投手] <= max_opposing + M
        let big_m = roster_size;
        for (e, player) in job.players.iter().enumerate() {
            if !player.is_pitcher() {
                continue;
            }
            let Some(opponent) = player.opponent_team.as_deref() else {
                continue;
            };
            let opposing: Vec<usize> = (0..n)
                .filter(|&j| j != e && job.players[j].team == opponent)
                .collect();
            if opposing.is_empty() {
                continue;
            }
            let mut expr = Expression::default();
            for &j in &opposing {
                expr.add_mul(1.0, select[j]);
            }
            expr.add_mul(big_m, select[e]);
            problem.add_constraint(expr.leq(job.max_opposing_selections as f64 + big_m));
        }

        debug!(
            players = n,
            variables = n + assign.iter().map(|a| a.len()).sum::<usize>(),
            "约束模型构建完成, 开始求解"
        );

        let solution = match problem.solve() {
            Ok(solution) => solution,
            Err(ResolutionError::Infeasible) => {
                return Err(OptimizerError::Infeasible {
                    reason: "约束系统无可行解".to_string(),
                })
            }
            Err(other) => return Err(OptimizerError::SolverFailure(other.to_string())),
        };

        Self::extract_lineup(job, &select, &assign, &solution)
    }

    /// 从求解结果提取阵容
    ///
    /// 槽位顺序 = 需求映射的位置顺序; 同一位置内按
    /// (value 降序, ID 升序) 排列, 保证输出确定性
    fn extract_lineup(
        job: &SolveJob,
        select: &[Variable],
        assign: &[Vec<(Position, Variable)>],
        solution: &impl Solution,
    ) -> Result<Lineup, OptimizerError> {
        let mut by_position: HashMap<Position, Vec<&Player>> = HashMap::new();

        for (i, player) in job.players.iter().enumerate() {
            if solution.value(select[i]) < 0.5 {
                continue;
            }
            let assigned = assign[i]
                .iter()
                .find(|&&(_, var)| solution.value(var) >= 0.5)
                .map(|&(pos, _)| pos);
            match assigned {
                Some(pos) => by_position.entry(pos).or_default().push(player),
                None => {
                    return Err(OptimizerError::SolverFailure(format!(
                        "入选球员缺少位置指派: {}",
                        player.player_id
                    )))
                }
            }
        }

        let mut slots = Vec::with_capacity(job.requirements.roster_size() as usize);
        for (position, required) in job.requirements.iter() {
            let mut assigned = by_position.remove(&position).unwrap_or_default();
            if assigned.len() as u32 != required {
                return Err(OptimizerError::SolverFailure(format!(
                    "位置 {} 指派数 {} 与需求 {} 不一致",
                    position,
                    assigned.len(),
                    required
                )));
            }
            assigned.sort_by(|a, b| {
                b.value
                    .total_cmp(&a.value)
                    .then_with(|| a.player_id.cmp(&b.player_id))
            });
            for player in assigned {
                slots.push(LineupSlot {
                    position,
                    player: player.clone(),
                });
            }
        }

        let lineup = Lineup::from_slots(slots);
        info!(
            total_salary = lineup.total_salary,
            total_value = lineup.total_value,
            "求解完成"
        );
        Ok(lineup)
    }
}

impl Default for LineupSolver {
    fn default() -> Self {
        Self::new()
    }
}
