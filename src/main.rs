use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use i18n_manager::commands::{self, AddArgs, ConfigArgs};
use i18n_manager::config::{Config, API_KEY_ENV};
use i18n_manager::confirm::{AutoConfirm, Confirm, PromptConfirm};
use i18n_manager::provider::TranslationProvider;
use i18n_manager::store::TranslationStore;
use std::io;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(
    name = "i18n-manager",
    version,
    about = "Manage multilingual .properties files for Java project internationalization"
)]
struct Cli {
    /// Directory containing the properties files
    #[arg(long, global = true)]
    path: Option<PathBuf>,

    /// Translation API key (takes precedence over the config file)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Answer yes to every confirmation
    #[arg(short, long, global = true)]
    yes: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate text with the AI provider and add the result
    #[command(visible_alias = "t")]
    Translate {
        /// Text to translate
        text: String,
        /// Use this key instead of the generated one
        #[arg(short, long)]
        key: Option<String>,
    },
    /// Add or update translations by hand
    #[command(visible_alias = "a")]
    Add {
        /// Translation key
        key: String,
        /// English translation
        #[arg(long)]
        en: Option<String>,
        /// Simplified Chinese translation (also written to zh_CN)
        #[arg(long)]
        zh: Option<String>,
        /// Traditional Chinese translation
        #[arg(long = "zh_TW", alias = "zh-tw")]
        zh_tw: Option<String>,
    },
    /// List all translation keys, or one key's translations
    #[command(visible_alias = "l")]
    List {
        /// Show translations for this key
        #[arg(short, long)]
        key: Option<String>,
    },
    /// Check for missing translations
    #[command(visible_alias = "c")]
    Check,
    /// Manage configuration
    Config {
        #[arg(long)]
        set_api_key: Option<String>,
        /// One of the configured providers (deepseek, qwen, openai)
        #[arg(long)]
        set_provider: Option<String>,
        #[arg(long)]
        set_model: Option<String>,
        /// OpenAI-compatible base URL, e.g. https://api.deepseek.com
        #[arg(long)]
        set_base_url: Option<String>,
        #[arg(long)]
        set_default_path: Option<String>,
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("i18n_manager={}", level).parse()?),
        )
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (optional, may hold I18N_MANAGER_API_KEY)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let mut config = Config::load()?;
    let store = TranslationStore::new(config.resolve_base_path(cli.path.as_deref()));
    debug!("Using properties directory {}", store.base_path().display());

    let mut confirm: Box<dyn Confirm> = if cli.yes {
        Box::new(AutoConfirm(true))
    } else {
        Box::new(PromptConfirm::stdio())
    };
    let mut stdout = io::stdout();

    match cli.command {
        Commands::Translate { text, key } => {
            let Some(api_key) = config.resolve_api_key(cli.api_key.as_deref()) else {
                bail!(
                    "No API key configured. Set one with:\n  i18n-manager config --set-api-key YOUR_API_KEY\n\
                     or pass it for one run with:\n  i18n-manager --api-key YOUR_API_KEY <command>\n\
                     or export {}",
                    API_KEY_ENV
                );
            };
            let provider = TranslationProvider::new(
                config.provider()?,
                &api_key,
                config.request_timeout(),
            )?;
            info!("Translating with provider '{}'", config.ai_provider);
            commands::run_translate(
                &provider,
                &store,
                confirm.as_mut(),
                &text,
                key.as_deref(),
                &mut stdout,
            )
            .await?;
        }
        Commands::Add { key, en, zh, zh_tw } => {
            let args = AddArgs { key, en, zh, zh_tw };
            commands::run_add(&store, confirm.as_mut(), &args, &mut stdout)?;
        }
        Commands::List { key } => {
            commands::run_list(&store, key.as_deref(), &mut stdout)?;
        }
        Commands::Check => {
            commands::run_check(&store, &mut stdout)?;
        }
        Commands::Config {
            set_api_key,
            set_provider,
            set_model,
            set_base_url,
            set_default_path,
            show,
        } => {
            let args = ConfigArgs {
                set_api_key,
                set_provider,
                set_model,
                set_base_url,
                set_default_path,
                show,
            };
            if commands::run_config(&mut config, &args, &mut stdout)? {
                config.save()?;
            }
        }
    }

    Ok(())
}
