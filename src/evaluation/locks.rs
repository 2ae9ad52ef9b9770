//! 按 (学生, 考试) 加锁，保证同一键上的“计数-写入-降级”串行执行

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

type AttemptKey = (i64, i64);

#[derive(Default)]
pub struct AttemptLocks {
    locks: Arc<DashMap<AttemptKey, Arc<Mutex<()>>>>,
}

impl AttemptLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取 (student_id, exam_id) 上的锁，持有期间其他同键请求等待
    pub async fn acquire(&self, student_id: i64, exam_id: i64) -> AttemptGuard {
        let key = (student_id, exam_id);
        let mutex = self
            .locks
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = mutex.lock_owned().await;

        AttemptGuard {
            key,
            guard: Some(guard),
            locks: self.locks.clone(),
        }
    }

    /// 当前登记在册的键数量
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

pub struct AttemptGuard {
    key: AttemptKey,
    guard: Option<OwnedMutexGuard<()>>,
    locks: Arc<DashMap<AttemptKey, Arc<Mutex<()>>>>,
}

impl Drop for AttemptGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        // 无人等待时移除条目，避免表无限增长
        self.locks
            .remove_if(&self.key, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}
