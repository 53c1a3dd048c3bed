// ==========================================
// DFS 阵容优化器 - 领域层
// ==========================================
// 职责: 实体与值类型, 无业务规则, 无 I/O
// ==========================================

pub mod lineup;
pub mod player;
pub mod roster;
pub mod types;

pub use lineup::{GenerationReport, Lineup, LineupSlot};
pub use player::{Player, PlayerValidationError};
pub use roster::RosterRequirements;
pub use types::Position;
