//! Gateway Agent - Demo Entry Point
//!
//! Runs a set of demo conversations against a local chat gateway,
//! exercising the tool-call loop.

use gateway_agent::{agent::Agent, config::Config};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEMO_QUERIES: [&str; 5] = [
    "计算 123 * 456 + 789",
    "北京和上海的天气怎么样？",
    "搜索 '机器学习' 相关信息",
    "如果我每月存5000元，年利率3%，复利计算，3年后有多少钱？",
    "帮我计算圆的面积，半径是 5.5",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gateway_agent=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Loaded configuration: gateway={} model={}",
        config.base_url, config.model
    );

    let agent = Agent::new(config);

    for (i, query) in DEMO_QUERIES.iter().enumerate() {
        println!("\n--- Demo {} ---", i + 1);
        println!("User: {}", query);

        // A failed turn is reported and the remaining demos still run.
        match agent.run(query).await {
            Ok(answer) => println!("Assistant: {}", answer),
            Err(e) => error!("turn failed: {}", e),
        }

        tokio::time::sleep(std::time::Duration::from_secs(1)).await;
    }

    Ok(())
}
