//! # 上游生成模型特征定义
//!
//! 处理器只依赖该特征，测试中可替换为桩实现

use super::types::{GenerateContentRequest, GenerationResult};
use crate::error::ProviderResult;
use async_trait::async_trait;

/// 生成式语言模型客户端
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// 提供方名称（用于日志）
    fn name(&self) -> &str;

    /// 调用上游生成内容
    ///
    /// 单轮文本生成与多轮结构化生成共用此入口，区别仅在于 `contents` 的构造方式。
    async fn generate_content(
        &self,
        request: GenerateContentRequest,
    ) -> ProviderResult<GenerationResult>;
}
