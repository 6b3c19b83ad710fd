//! CLI entrypoint for tripvote
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod interactive;

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tripvote_application::{
    ActivityLogger, ChangeFeed, ContentGenerator, CreateTripInput, CreateTripUseCase,
    GenerateItemsInput, GenerateTripItemsUseCase, JoinTripInput, JoinTripUseCase,
    NoActivityLogger, ParticipantRegistry, Preferences, StageAggregator, TripRepository,
    TripResultsUseCase, TripStore,
};
use tripvote_domain::{AccountId, Participant, ShareLink, Stage, TripId};
use tripvote_infrastructure::{
    BuiltinContentGenerator, ConfigLoader, FileConfig, FileGeneratorConfig, GeneratorProvider,
    JsonFileTripStore, JsonlActivityLogger,
};
use tripvote_presentation::{
    Cli, Command, ConsoleFormatter, CreateArgs, GenerateArgs, JoinArgs, OutputFormat,
};

/// Wired-up adapters shared by every command
pub(crate) struct App {
    pub config: FileConfig,
    pub store: Arc<JsonFileTripStore>,
    pub activity_logger: Arc<dyn ActivityLogger>,
    pub quiet: bool,
}

impl App {
    fn new(config: FileConfig, store_override: Option<PathBuf>, quiet: bool) -> Self {
        let store_path = store_override.unwrap_or_else(|| config.store.resolve_path());
        info!("Using trip store {}", store_path.display());

        let activity_logger: Arc<dyn ActivityLogger> = match config
            .log
            .activity_log_path()
            .and_then(JsonlActivityLogger::new)
        {
            Some(logger) => {
                info!("Activity log: {}", logger.path().display());
                Arc::new(logger)
            }
            None => Arc::new(NoActivityLogger),
        };

        Self {
            store: Arc::new(JsonFileTripStore::open(store_path)),
            config,
            activity_logger,
            quiet,
        }
    }

    pub fn trip_store(&self) -> Arc<dyn TripStore> {
        self.store.clone()
    }

    pub fn change_feed(&self) -> Arc<dyn ChangeFeed> {
        self.store.clone()
    }

    pub fn share_link(&self, trip_id: &TripId) -> ShareLink {
        ShareLink::new(&self.config.share.base_url, trip_id.clone())
    }

    /// Resolve a participant of the trip by id or display name.
    pub async fn resolve_participant(&self, trip_id: &TripId, who: &str) -> Result<Participant> {
        let participants = self.store.participants(trip_id).await?;
        participants
            .iter()
            .find(|p| p.id.as_str() == who.trim())
            .or_else(|| participants.iter().find(|p| p.name.eq_ignore_ascii_case(who.trim())))
            .cloned()
            .with_context(|| format!("'{}' has not joined trip {}", who, trip_id))
    }
}

fn parse_trip(input: &str) -> Result<TripId> {
    Ok(ShareLink::parse(input)?.trip_id().clone())
}

fn build_generator(config: &FileGeneratorConfig, force_builtin: bool) -> Arc<dyn ContentGenerator> {
    if force_builtin {
        return Arc::new(BuiltinContentGenerator::new());
    }
    match config.parse_provider() {
        Ok(GeneratorProvider::OpenAi) => openai_generator(config),
        Ok(GeneratorProvider::Builtin) => Arc::new(BuiltinContentGenerator::new()),
        Err(e) => {
            warn!("{}; using the built-in catalog", e);
            Arc::new(BuiltinContentGenerator::new())
        }
    }
}

#[cfg(feature = "openai")]
fn openai_generator(config: &FileGeneratorConfig) -> Arc<dyn ContentGenerator> {
    use tripvote_infrastructure::OpenAiContentGenerator;

    let Some(api_key) = config.resolve_api_key() else {
        warn!("{} is not set; using the built-in catalog", config.api_key_env);
        return Arc::new(BuiltinContentGenerator::new());
    };
    match OpenAiContentGenerator::new(api_key, &config.model) {
        Ok(generator) => Arc::new(
            generator
                .with_api_base(&config.api_base)
                .with_timeout(config.timeout()),
        ),
        Err(e) => {
            warn!("{}; using the built-in catalog", e);
            Arc::new(BuiltinContentGenerator::new())
        }
    }
}

#[cfg(not(feature = "openai"))]
fn openai_generator(_config: &FileGeneratorConfig) -> Arc<dyn ContentGenerator> {
    warn!("Built without the openai feature; using the built-in catalog");
    Arc::new(BuiltinContentGenerator::new())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting tripvote");

    if let Command::Config = cli.command {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?
    };
    for issue in config.validate() {
        warn!("Config: {}", issue);
    }

    let app = App::new(config, cli.store, cli.quiet);

    match cli.command {
        Command::Create(args) => create(&app, args).await,
        Command::Generate(args) => generate(&app, args).await,
        Command::Join(args) => join(&app, args).await,
        Command::Share { trip } => share(&app, &trip).await,
        Command::Vote(args) => interactive::vote(&app, args).await,
        Command::Status { trip } => status(&app, &trip).await,
        Command::Watch { trip } => interactive::watch(&app, &trip).await,
        Command::Results { trip, output } => results(&app, &trip, output).await,
        Command::Config => Ok(()),
    }
}

async fn create(app: &App, args: CreateArgs) -> Result<()> {
    let mut input = CreateTripInput::new(args.name, args.start, args.end, args.budget).with_creator(
        args.creator.unwrap_or_default(),
        args.account.map(AccountId::new),
    );
    if let Some(departure) = args.departure {
        input = input.with_departure_location(departure);
    }

    let output = CreateTripUseCase::new(app.trip_store())
        .with_activity_logger(app.activity_logger.clone())
        .execute(input)
        .await?;

    let link = app.share_link(&output.trip.id);
    println!("{}", ConsoleFormatter::trip_created(&output, &link));
    Ok(())
}

async fn generate(app: &App, args: GenerateArgs) -> Result<()> {
    let trip_id = parse_trip(&args.trip)?;
    let preferences = Preferences {
        destinations: args.destinations,
        accommodations: args.accommodations,
        transportation: args.transportation,
        activities: args.activities,
        dietary: args.dietary,
        accessibility: args.accessibility,
    };
    let mut input = GenerateItemsInput::new(trip_id, preferences);
    if !args.stage.is_empty() {
        input = input.with_stages(args.stage);
    }

    let generator = build_generator(&app.config.generator, args.builtin);
    if !app.quiet {
        println!("Generating items with {}...", generator.name());
    }
    let output = GenerateTripItemsUseCase::new(app.trip_store(), generator)
        .with_params(app.config.generator.to_params())
        .with_activity_logger(app.activity_logger.clone())
        .execute(input)
        .await?;

    println!("{}", ConsoleFormatter::generation(&output));
    Ok(())
}

async fn join(app: &App, args: JoinArgs) -> Result<()> {
    let mut input = JoinTripInput::new(args.link, args.name);
    if let Some(account) = args.account {
        input = input.with_account(AccountId::new(account));
    }

    let output = JoinTripUseCase::new(app.trip_store())
        .with_activity_logger(app.activity_logger.clone())
        .execute(input)
        .await?;

    let link = app.share_link(&output.trip.id);
    println!("{}", ConsoleFormatter::joined(&output, &link));
    Ok(())
}

async fn share(app: &App, trip: &str) -> Result<()> {
    let trip_id = parse_trip(trip)?;
    if app.store.get_trip(&trip_id).await?.is_none() {
        bail!("Trip not found: {}", trip_id);
    }
    println!("{}", app.share_link(&trip_id));
    Ok(())
}

async fn status(app: &App, trip: &str) -> Result<()> {
    let trip_id = parse_trip(trip)?;
    let snapshot = StageAggregator::new(app.trip_store())
        .snapshot(&trip_id)
        .await?;
    print!("{}", ConsoleFormatter::snapshot(&snapshot));
    if snapshot.stage == Stage::Completed {
        println!("Run `tripvote results {}` to see what the group chose.", trip_id);
    }
    Ok(())
}

async fn results(app: &App, trip: &str, output: OutputFormat) -> Result<()> {
    let trip_id = parse_trip(trip)?;
    let results = TripResultsUseCase::new(app.trip_store())
        .execute(&trip_id)
        .await?;

    let rendered = match output {
        OutputFormat::Text => ConsoleFormatter::format(&results),
        OutputFormat::Json => ConsoleFormatter::format_json(&results),
    };
    println!("{}", rendered);
    Ok(())
}
