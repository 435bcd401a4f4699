//! Stage Pipeline - 单章多角色轮转会话
//!
//! 主流程与回退流程共用同一个执行器，只有参与者列表和轮次上限不同

mod executor;
mod prompts;

pub use executor::{
    Participant, PipelineParams, SessionOutput, StagePipelineExecutor, FALLBACK_MAX_ROUNDS,
    PRIMARY_MAX_ROUNDS,
};
pub use prompts::{build_seed, SeedContext};
