use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use wocabot::config::Config;
use wocabot::engine::{ExerciseContext, Supervisor};
use wocabot::logging;
use wocabot::notify::{Notifier, NtfyNotifier};
use wocabot::page::Page;
use wocabot::page::chromium::ChromiumPage;
use wocabot::prompt::{ConsolePrompter, NoPrompter, TermPrompter};
use wocabot::store::lexicon::Lexicon;
use wocabot::store::pictures::PictureIndex;

#[derive(Parser)]
#[command(name = "wocabot", version, about = "Completes vocabulary exercises in an open browser tab")]
struct Cli {
    #[arg(short, long, help = "Path to config.toml")]
    config: Option<PathBuf>,

    #[arg(short, long, help = "Base URL of the app tab to attach to")]
    url: Option<String>,

    #[arg(short, long, help = "DevTools endpoint or bare port")]
    debug_port: Option<String>,

    #[arg(short, long, help = "Points to earn before stopping")]
    addon_points: Option<u64>,

    #[arg(long, help = "Lexicon JSON file")]
    wordlist: Option<String>,

    #[arg(long, help = "Picture index JSON file")]
    picture_list: Option<String>,

    #[arg(long, help = "Never ask the operator for unknown words")]
    no_prompt: bool,

    #[arg(short, long, help = "Debug logging")]
    verbose: bool,
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_env(|key| std::env::var(key).ok());

    if let Some(url) = &cli.url {
        config.urlbase = url.clone();
    }
    if let Some(port) = &cli.debug_port {
        config.debug_port = port.clone();
    }
    if let Some(points) = cli.addon_points {
        config.addon_points = points;
    }
    if let Some(path) = &cli.wordlist {
        config.wordlist_file = path.clone();
    }
    if let Some(path) = &cli.picture_list {
        config.picture_file = path.clone();
    }
    config.validate();
    Ok(config)
}

fn open_context(config: &Config, no_prompt: bool) -> Result<ExerciseContext> {
    let lexicon = Lexicon::open(&config.wordlist_file)?;
    let pictures = PictureIndex::open(&config.picture_file)?;
    let prompter: Box<dyn TermPrompter> = if no_prompt {
        Box::new(NoPrompter)
    } else {
        Box::new(ConsolePrompter::new()?)
    };
    Ok(ExerciseContext::new(
        lexicon,
        pictures,
        prompter,
        config.session_settings().placeholders,
    ))
}

fn startup_failed(notifier: &dyn Notifier, err: &anyhow::Error) -> ExitCode {
    tracing::error!("startup failed: {err:?}");
    notifier.notify("Wocabee Bot Startup Error", &format!("{err:?}"));
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("invalid configuration: {err:?}");
            return ExitCode::FAILURE;
        }
    };
    let notifier = NtfyNotifier::from_config(&config);
    notifier.notify(
        "Wocabee Bot Started",
        &format!(
            "The bot has been started and is connecting into the browser, estimated time until finished = {} seconds",
            config.estimated_seconds()
        ),
    );

    let ctx = match open_context(&config, cli.no_prompt) {
        Ok(ctx) => ctx,
        Err(err) => return startup_failed(&notifier, &err),
    };
    let mut page = match ChromiumPage::attach_or_launch(&config.debug_port, &config.urlbase) {
        Ok(page) => page,
        Err(err) => return startup_failed(&notifier, &err),
    };
    if !page.wait_for_load_state(Duration::from_secs(15)).unwrap_or(false) {
        tracing::warn!("page did not finish loading, continuing");
    }

    let mut supervisor = Supervisor::new(page, ctx, notifier, &config.session_settings());
    if let Err(err) = supervisor.attach() {
        return startup_failed(supervisor.notifier(), &err);
    }
    supervisor.run();
    ExitCode::SUCCESS
}
