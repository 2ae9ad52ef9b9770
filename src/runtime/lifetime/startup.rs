use crate::errors::Result;
use crate::evaluation::EvaluationSequencer;
use crate::storage::Storage;
use std::sync::Arc;
use tracing::{info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub sequencer: Arc<EvaluationSequencer>,
}

impl StartupContext {
    /// 基于已有存储构造上下文（测试也通过这里组装）
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let sequencer = Arc::new(EvaluationSequencer::new(storage.clone()));
        Self { storage, sequencer }
    }
}

/// 打印当前课程结构概况
async fn log_curriculum_summary(storage: &Arc<dyn Storage>) {
    match storage.list_blocks().await {
        Ok(blocks) if blocks.is_empty() => {
            warn!("No blocks defined yet; evaluations cannot be recorded until blocks and exams exist");
        }
        Ok(blocks) => {
            info!("{} block(s) loaded", blocks.len());
        }
        Err(e) => {
            warn!("Failed to list blocks: {}", e);
        }
    }
}

/// 准备服务器启动的上下文
/// 包括存储与评估引擎
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    log_curriculum_summary(&storage).await;

    let context = StartupContext::new(storage);
    warn!("Evaluation sequencer initialized");

    Ok(context)
}
