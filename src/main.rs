use autodca::cli::commands::{parse_plan, Cli, Commands};
use autodca::domain::entities::token::Token;
use autodca::domain::entities::user::User;
use autodca::domain::ports::plan_store::ExecutionFilter;
use autodca::{DcaEngine, EngineConfig};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    let config = match EngineConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    let engine = match DcaEngine::new(&config) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Error initializing engine: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_command(engine, cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_command(engine: DcaEngine, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Run { skip_prices } => {
            if !skip_prices {
                let prices = engine.update_prices().await?;
                println!("{}", serde_json::to_string_pretty(&prices)?);
            }
            let now = chrono::Utc::now().timestamp();
            let report = engine.run_batch(now).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Prices => {
            let report = engine.update_prices().await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Portfolio { date } => {
            let date = match date {
                Some(d) => d.parse()?,
                None => chrono::Utc::now().date_naive(),
            };
            let report = engine.update_portfolios(date).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Plans => {
            let plans = engine.list_active_plans()?;
            println!("{}", serde_json::to_string_pretty(&plans)?);
        }
        Commands::History { plan, limit } => {
            let executions = engine.executions(&ExecutionFilter {
                plan_id: plan,
                limit: Some(limit),
            })?;
            println!("{}", serde_json::to_string_pretty(&executions)?);
        }
        Commands::PlanAdd { json } => {
            let plan = parse_plan(&engine, &json)?;
            engine.add_plan(&plan)?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        Commands::TokenAdd { json } => {
            let token: Token = serde_json::from_str(&json)?;
            engine.add_token(&token)?;
            println!("{}", serde_json::to_string_pretty(&token)?);
        }
        Commands::UserAdd { json } => {
            let user: User = serde_json::from_str(&json)?;
            engine.add_user(&user)?;
            println!("{}", serde_json::to_string_pretty(&user)?);
        }
    }
    Ok(())
}
