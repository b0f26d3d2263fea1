//! # 来源IP限流
//!
//! 固定窗口计数：每个键（来源IP）的窗口在首个请求时开启，窗口到期后独立重置。
//! 计数存储抽象为 [`CounterStore`]，默认使用进程内 [`MemoryCounterStore`]。

mod store;

pub use store::{CounterStore, MemoryCounterStore, WindowCount};

use crate::config::RateLimitConfig;
use crate::error::Result;
use crate::logging::{LogComponent, LogStage};
use crate::{ldebug, lwarn};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// 超限时返回的固定纯文本消息
pub const RATE_LIMIT_MESSAGE: &str = "Too many requests from this IP, please try again later.";

/// 一次限流检查的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitOutcome {
    pub allowed: bool,
    pub current: u64,
    pub limit: u64,
    pub remaining: u64,
    pub reset_after: Duration,
}

/// 限流器
pub struct RateLimiter {
    store: Arc<dyn CounterStore>,
    limit: u64,
    window: Duration,
}

impl RateLimiter {
    /// 使用进程内存储创建限流器
    #[must_use]
    pub fn new(config: &RateLimitConfig) -> Self {
        Self::with_store(config, Arc::new(MemoryCounterStore::new()))
    }

    /// 使用自定义存储创建限流器（多实例部署时可接入外部存储）
    #[must_use]
    pub fn with_store(config: &RateLimitConfig, store: Arc<dyn CounterStore>) -> Self {
        Self {
            store,
            limit: config.max_requests,
            window: config.window(),
        }
    }

    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// 为 `key` 计数一次并判断是否放行（自增与判断为同一原子步骤）
    pub async fn check(&self, key: &str) -> Result<RateLimitOutcome> {
        let WindowCount {
            count,
            reset_after,
        } = self.store.increment(key, self.window).await?;

        let allowed = count <= self.limit;
        if !allowed {
            ldebug!(
                "system",
                LogStage::RateLimit,
                LogComponent::RateLimiter,
                "limit_exceeded",
                &format!("{key} exceeded {} requests ({count})", self.limit)
            );
        }

        Ok(RateLimitOutcome {
            allowed,
            current: count,
            limit: self.limit,
            remaining: self.limit.saturating_sub(count),
            reset_after,
        })
    }

    /// 启动后台清理任务，每个窗口长度清理一次过期计数
    pub fn spawn_sweeper(self: &Arc<Self>, shutdown: CancellationToken) -> tokio::task::JoinHandle<()> {
        let limiter = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(limiter.window);
            // 第一次 tick 立即完成
            ticker.tick().await;
            loop {
                tokio::select! {
                    () = shutdown.cancelled() => break,
                    _ = ticker.tick() => {
                        match limiter.store.purge_expired().await {
                            Ok(removed) if removed > 0 => ldebug!(
                                "system",
                                LogStage::RateLimit,
                                LogComponent::RateLimiter,
                                "sweep",
                                &format!("Purged {removed} expired rate-limit windows")
                            ),
                            Ok(_) => {}
                            Err(e) => lwarn!(
                                "system",
                                LogStage::RateLimit,
                                LogComponent::RateLimiter,
                                "sweep_failed",
                                &format!("Failed to purge rate-limit windows: {e}")
                            ),
                        }
                    }
                }
            }
        })
    }
}
