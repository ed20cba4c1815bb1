use clap::{Parser, Subcommand};

use plugbot::application::errors::BotError;
use plugbot::domain::traits::Gateway;
use plugbot::infrastructure::adapters::ConsoleAdapter;
use plugbot::infrastructure::config::Config;
use plugbot::infrastructure::storage::JsonFileStore;
use plugbot::plugins::EchoPlugin;
use plugbot::MessageDispatcher;

#[derive(Parser)]
#[command(name = "plugbot")]
#[command(about = "A plugin-driven chat command router", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Gateway token (overrides config)
    #[arg(short, long)]
    token: Option<String>,

    /// Command prefix (overrides config)
    #[arg(short, long)]
    prefix: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot on the console gateway
    Run,
    /// Show version
    Version,
    /// Print a default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run => run_bot(&cli.config, cli.token, cli.prefix),
        Commands::Version => {
            println!("plugbot v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => Config::default()
            .to_yaml()
            .map(|yaml| print!("{}", yaml))
            .map_err(BotError::from),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn load_config(path: &str, token: Option<String>, prefix: Option<String>) -> Result<Config, BotError> {
    let mut config = if std::path::Path::new(path).exists() {
        Config::load(path)?
    } else {
        tracing::info!("No config at {}, using defaults", path);
        Config::default()
    };
    config.apply_env();

    if token.is_some() {
        config.bot.token = token;
    }
    if let Some(prefix) = prefix {
        config.bot.prefix = prefix;
    }
    config.validate()?;
    Ok(config)
}

fn run_bot(config_path: &str, token: Option<String>, prefix: Option<String>) -> Result<(), BotError> {
    let config = load_config(config_path, token, prefix)?;
    tracing::info!("Starting {} with prefix {:?}", config.bot.name, config.bot.prefix);

    let dispatcher = MessageDispatcher::new(config.dispatcher_options())?;
    dispatcher.load_plugin(&EchoPlugin::new(config.bot.prefix.as_str()))?;

    let store = config.persistence.path.clone().map(JsonFileStore::new);
    if let (Some(store), true) = (&store, config.persistence.restore_on_start) {
        dispatcher.restore_persistent(store)?;
    }

    let rt = tokio::runtime::Runtime::new().map_err(|e| BotError::Internal(e.to_string()))?;
    rt.block_on(async {
        let mut gateway = ConsoleAdapter::new();
        gateway
            .connect(config.bot.token.as_deref().unwrap_or_default())
            .await?;
        dispatcher.set_own_identity(gateway.own_identity());

        while let Some(message) = gateway.next_message().await {
            for reply in dispatcher.on_message(&message) {
                if let Err(e) = gateway.send_message(&message.chat_id, &reply).await {
                    tracing::warn!("Failed to send reply: {}", e);
                }
            }
        }
        Ok::<(), BotError>(())
    })?;

    if let Some(store) = &store {
        dispatcher.save_persistent(store)?;
    }
    tracing::info!("Bye");
    Ok(())
}
