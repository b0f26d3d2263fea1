//! # Generation Proxy 主程序
//!
//! 在服务端持有上游凭证，对浏览器客户端暴露两个生成接口

use generation_proxy::{
    GenerationServer, Result,
    config::{self, ENV_API_KEY},
    lerror, linfo,
    logging::{self, LogComponent, LogStage},
    providers::GeminiClient,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // .env 文件可选
    dotenv::dotenv().ok();
    logging::init_optimized_logging(None);

    // 缺少凭证时在绑定端口之前退出
    let config = match config::load_config() {
        Ok(config) => config,
        Err(e) => {
            lerror!(
                "system",
                LogStage::Startup,
                LogComponent::Config,
                "config_invalid",
                &format!("Failed to load configuration: {e}")
            );
            if e.is_config() {
                lerror!(
                    "system",
                    LogStage::Startup,
                    LogComponent::Config,
                    "config_hint",
                    &format!("Set {ENV_API_KEY} in the environment or a .env file")
                );
            }
            std::process::exit(1);
        }
    };

    linfo!(
        "system",
        LogStage::Startup,
        LogComponent::Main,
        "service_starting",
        &format!("Starting with {config:?}")
    );

    let model = GeminiClient::new(&config.upstream, config.api_key.clone())?;
    let server = GenerationServer::new(config, Arc::new(model))?;

    if let Err(e) = server.serve().await {
        lerror!(
            "system",
            LogStage::Startup,
            LogComponent::Main,
            "service_start_failed",
            &format!("服务启动失败: {e:?}")
        );
        std::process::exit(1);
    }

    linfo!(
        "system",
        LogStage::Shutdown,
        LogComponent::Main,
        "service_shutdown",
        "服务正常关闭"
    );
    Ok(())
}
