use std::sync::Arc;

use pulse_api::agents::wait::FixedDelay;
use pulse_api::agents::{WorkflowController, WorkflowOrchestrator};
use pulse_api::api;
use pulse_api::config::Config;
use pulse_api::domain::team::Roster;
use pulse_api::infrastructure::repositories::InMemoryRosterRepository;
use pulse_api::infrastructure::HttpAgentInvoker;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    if let Err(e) = run().await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    let invoker = HttpAgentInvoker::new(
        config.agent_api_url.clone(),
        config.agent_api_key.clone(),
        config.agent_timeout,
    )?;

    tracing::info!(
        endpoint = %invoker.endpoint(),
        dashboard_agent = config.agents.dashboard.is_some(),
        reply_wait_ms = config.reply_wait.as_millis() as u64,
        "Configuring agent workflow"
    );
    let orchestrator = WorkflowOrchestrator::new(
        Arc::new(invoker),
        Arc::new(FixedDelay::new(config.reply_wait)),
        config.agents.clone(),
    );

    let roster = InMemoryRosterRepository::new(Roster::with_defaults(config.member_email_domain.clone()));
    let controller = Arc::new(WorkflowController::new(Arc::new(roster), orchestrator));

    let app = api::router(controller);

    // Start server
    tracing::info!("Server listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
