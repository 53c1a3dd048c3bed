// ==========================================
// LineupOrchestrator 引擎集成测试
// ==========================================
// 测试目标: 验证过滤 → 加成 → 多样性循环的端到端编排
// 覆盖范围: 多阵容生成、退化多样性、ManualOnly 不可行传播、
//           告警透传、运行本地惩罚不残留
// ==========================================

use dfs_lineup_optimizer::config::OptimizerConfig;
use dfs_lineup_optimizer::domain::types::Position;
use dfs_lineup_optimizer::domain::{Player, RosterRequirements};
use dfs_lineup_optimizer::engine::{LineupOrchestrator, OptimizerError, StrategyMode};

// ==========================================
// 测试辅助函数
// ==========================================

fn create_test_player(
    id: &str,
    name: &str,
    team: &str,
    salary: u32,
    position: Position,
    value: f64,
) -> Player {
    Player::new(id, name, team, salary, position, value).unwrap()
}

/// 宽裕名单: 各位置候选充足
fn create_wide_slate() -> Vec<Player> {
    let mut slate = Vec::new();
    for i in 0..6u32 {
        slate.push(create_test_player(
            &format!("P{}", i),
            &format!("Pitcher Ace{}", i),
            &format!("TP{}", i),
            7_500 + i * 100,
            Position::Pitcher,
            15.0 + i as f64 * 0.4,
        ));
    }
    let batter_positions = [
        Position::Catcher,
        Position::FirstBase,
        Position::SecondBase,
        Position::ThirdBase,
        Position::Shortstop,
        Position::Outfield,
        Position::Outfield,
        Position::Outfield,
    ];
    let mut counter = 0u32;
    for (i, &pos) in batter_positions.iter().enumerate() {
        for k in 0..4u32 {
            slate.push(create_test_player(
                &format!("B{:02}", counter),
                &format!("Batter Name{:02}", counter),
                &format!("TB{}", counter % 8),
                3_800 + counter * 15,
                pos,
                7.0 + i as f64 * 0.3 + k as f64 * 0.7,
            ));
            counter += 1;
        }
    }
    slate
}

/// 场景 C 名单: 候选池仅为花名册的 1.2 倍
fn create_tight_slate() -> Vec<Player> {
    let mut slate = Vec::new();
    for i in 0..3u32 {
        slate.push(create_test_player(
            &format!("P{}", i),
            &format!("Tight Pitcher{}", i),
            &format!("TP{}", i),
            7_000,
            Position::Pitcher,
            12.0 + i as f64 * 0.5,
        ));
    }
    let singles = [
        Position::Catcher,
        Position::FirstBase,
        Position::SecondBase,
        Position::ThirdBase,
        Position::Shortstop,
    ];
    for (i, &pos) in singles.iter().enumerate() {
        slate.push(create_test_player(
            &format!("S{}", i),
            &format!("Tight Single{}", i),
            &format!("TS{}", i),
            4_200,
            pos,
            8.0 + i as f64 * 0.2,
        ));
    }
    for k in 0..4u32 {
        slate.push(create_test_player(
            &format!("O{}", k),
            &format!("Tight Outfield{}", k),
            &format!("TO{}", k),
            4_100,
            Position::Outfield,
            7.5 + k as f64 * 0.3,
        ));
    }
    slate
}

fn relaxed_config() -> OptimizerConfig {
    OptimizerConfig {
        min_salary_usage: 0.0,
        use_correlation_bonus: false,
        ..OptimizerConfig::default()
    }
}

// ==========================================
// 多阵容生成
// ==========================================

#[test]
fn test_generate_multiple_lineups() {
    let slate = create_wide_slate();
    let requirements = RosterRequirements::dk_classic();
    let config = relaxed_config();

    let report = LineupOrchestrator::new()
        .generate(&slate, &requirements, &config, 3)
        .expect("宽裕名单应能生成 3 个阵容");

    assert_eq!(report.lineups.len(), 3);
    assert!(!report.run_id.is_empty());
    assert!(report.warnings.is_empty());
    for lineup in &report.lineups {
        assert_eq!(lineup.len() as u32, requirements.roster_size());
        assert_eq!(lineup.player_ids().len(), lineup.len());
        assert!(lineup.total_salary <= config.salary_cap);
    }

    // 多样性惩罚应促使后续阵容换人（宽裕名单下首两个阵容不应完全一致）
    let first = report.lineups[0].player_ids();
    let second = report.lineups[1].player_ids();
    assert_ne!(first, second);
}

#[test]
fn test_scenario_c_degenerate_diversity_never_crashes() {
    let slate = create_tight_slate();
    let requirements = RosterRequirements::dk_classic();
    let config = relaxed_config();

    let report = LineupOrchestrator::new()
        .generate(&slate, &requirements, &config, 5)
        .expect("退化多样性下 5 次求解必须全部成功");

    assert_eq!(report.lineups.len(), 5);
    // 候选池只有 12 人, 阵容间高重叠是预期行为
    for lineup in &report.lineups {
        assert_eq!(lineup.len(), 10);
    }
}

#[test]
fn test_diversity_penalty_is_run_local() {
    let slate = create_wide_slate();
    let requirements = RosterRequirements::dk_classic();
    let config = relaxed_config();
    let orchestrator = LineupOrchestrator::new();

    // 单阵容运行两次: 惩罚不得在运行之间残留
    let a = orchestrator
        .generate(&slate, &requirements, &config, 1)
        .unwrap();
    let b = orchestrator
        .generate(&slate, &requirements, &config, 1)
        .unwrap();
    assert_eq!(a.lineups[0].player_ids(), b.lineups[0].player_ids());

    // 多阵容运行的第一个阵容 = 无惩罚最优解
    let c = orchestrator
        .generate(&slate, &requirements, &config, 3)
        .unwrap();
    assert_eq!(a.lineups[0].player_ids(), c.lineups[0].player_ids());

    // 原始 value 从未被改写
    for p in &slate {
        assert!(p.value > 0.0);
    }
}

// ==========================================
// ManualOnly 不可行传播 (场景 B)
// ==========================================

#[test]
fn test_manual_only_with_too_few_names_fails_typed() {
    let slate = create_wide_slate();
    let requirements = RosterRequirements::dk_classic();
    let config = OptimizerConfig {
        strategy_mode: StrategyMode::ManualOnly,
        manual_selection_text: "Pitcher Ace0, Batter Name00; Batter Name05".to_string(),
        ..relaxed_config()
    };

    let result = LineupOrchestrator::new().generate(&slate, &requirements, &config, 1);

    // 不足额名单绝不产出部分阵容
    match result {
        Err(OptimizerError::InsufficientCandidatesForPosition { .. })
        | Err(OptimizerError::Infeasible { .. }) => {}
        other => panic!("预期类型化失败, 实得 {:?}", other.map(|r| r.lineups.len())),
    }
}

// ==========================================
// 告警透传
// ==========================================

#[test]
fn test_unmatched_manual_tokens_surface_as_warnings() {
    let slate = create_wide_slate();
    let requirements = RosterRequirements::dk_classic();
    let config = OptimizerConfig {
        strategy_mode: StrategyMode::ConfirmedPlusManual,
        manual_selection_text: "Batter Name01\nTotally Unknown Guy".to_string(),
        ..relaxed_config()
    };

    let report = LineupOrchestrator::new()
        .generate(&slate, &requirements, &config, 1)
        .expect("未匹配条目是告警而不是失败");

    assert_eq!(report.lineups.len(), 1);
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("Totally Unknown Guy"));
}

// ==========================================
// 参数校验
// ==========================================

#[test]
fn test_zero_lineup_count_rejected() {
    let slate = create_wide_slate();
    let result = LineupOrchestrator::new().generate(
        &slate,
        &RosterRequirements::dk_classic(),
        &relaxed_config(),
        0,
    );
    assert!(matches!(
        result,
        Err(OptimizerError::InvalidConfiguration(_))
    ));
}
