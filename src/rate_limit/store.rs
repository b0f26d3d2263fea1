//! # 限流计数存储

use crate::error::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::time::Duration;
use tokio::time::Instant;

/// 自增后的窗口状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowCount {
    /// 当前窗口内的请求数（含本次）
    pub count: u64,
    /// 距离窗口重置的剩余时间
    pub reset_after: Duration,
}

/// 限流计数存储
///
/// `increment` 必须是原子的：并发请求不能读到同一个旧值。
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// 为 `key` 自增，窗口不存在或已过期时以 `window` 开启新窗口
    async fn increment(&self, key: &str, window: Duration) -> Result<WindowCount>;

    /// 删除已过期的窗口，返回删除数量
    async fn purge_expired(&self) -> Result<usize>;
}

#[derive(Debug, Clone, Copy)]
struct WindowEntry {
    count: u64,
    expires_at: Instant,
}

/// 进程内计数存储，重启后不保留
#[derive(Debug, Default)]
pub struct MemoryCounterStore {
    entries: DashMap<String, WindowEntry>,
}

impl MemoryCounterStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前跟踪的键数量
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn increment(&self, key: &str, window: Duration) -> Result<WindowCount> {
        let now = Instant::now();
        // entry 持有分片写锁，读-改-写在锁内完成
        let mut entry = self.entries.entry(key.to_string()).or_insert(WindowEntry {
            count: 0,
            expires_at: now + window,
        });
        if entry.expires_at <= now {
            *entry = WindowEntry {
                count: 0,
                expires_at: now + window,
            };
        }
        entry.count += 1;

        Ok(WindowCount {
            count: entry.count,
            reset_after: entry.expires_at.saturating_duration_since(now),
        })
    }

    async fn purge_expired(&self) -> Result<usize> {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        Ok(before.saturating_sub(self.entries.len()))
    }
}
