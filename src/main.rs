use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use tokio::sync::broadcast;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use noticeboard::application::services::{
    AnnouncementRepository, RefreshScheduler, SchedulerConfig, SessionIdentity, UnreadService,
};
use noticeboard::application::use_cases::{
    ResolveIdentityUseCase, SignInUseCase, SignOutUseCase,
};
use noticeboard::domain::entities::UnreadCount;
use noticeboard::domain::ports::{AnnouncementSourcePort, KeyValueStorePort};
use noticeboard::infrastructure::{
    AppConfig, CliArgs, Command, FileKeyValueStore, HttpAnnouncementSource, StorageManager,
};
use noticeboard::presentation::{BadgePresenter, LogNavigator};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

fn load_config() -> Result<(AppConfig, Command, Option<String>)> {
    let mut args = CliArgs::parse();
    let command = args.command.take().unwrap_or_default();
    let cli_student_id = args.student_id.take();

    let storage = StorageManager::new().wrap_err("Failed to locate config directory")?;
    let mut config = storage.load_config(args.config.as_deref())?;
    config.merge_with_args(args);

    Ok((config, command, cli_student_id))
}

fn open_store(config: &AppConfig) -> Result<Arc<FileKeyValueStore>> {
    let store = match &config.data_dir {
        Some(dir) => FileKeyValueStore::new(dir.clone()),
        None => FileKeyValueStore::default_location()
            .ok_or_else(|| eyre!("Failed to locate data directory"))?,
    };
    info!(dir = %store.dir().display(), "Using announcement store");
    Ok(Arc::new(store))
}

fn open_remote(config: &AppConfig) -> Result<Option<Arc<dyn AnnouncementSourcePort>>> {
    let Some(base_url) = &config.api.base_url else {
        return Ok(None);
    };

    let source = HttpAnnouncementSource::with_timeout(base_url.clone(), config.api.timeout())
        .wrap_err("Failed to create HTTP client")?;
    info!(base_url = source.base_url(), "Using remote announcement source");
    Ok(Some(Arc::new(source)))
}

async fn watch(scheduler: Arc<RefreshScheduler>, presenter: &BadgePresenter) -> Result<()> {
    let (lifecycle_tx, lifecycle_rx) = broadcast::channel(16);
    let mut counts = presenter.subscribe();

    scheduler.start(lifecycle_rx);
    info!("Watching unread announcements, press Ctrl-C to stop");

    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result.wrap_err("Failed to listen for Ctrl-C")?;
                break;
            }
            changed = counts.changed() => {
                if changed.is_err() {
                    break;
                }
                let count = *counts.borrow_and_update();
                match presenter.label_for(count) {
                    Some(label) => info!(count = count.get(), badge = %label, "Unread announcements"),
                    None => info!("No unread announcements"),
                }
            }
        }
    }

    scheduler.stop();
    drop(lifecycle_tx);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let (config, command, cli_student_id) = load_config()?;
    init_logging(&config)?;

    info!(version = noticeboard::VERSION, mode = %config.sync.mode, "Starting Noticeboard");

    let store = open_store(&config)?;
    let store_port: Arc<dyn KeyValueStorePort> = store;
    let repository = AnnouncementRepository::new(store_port.clone());
    let session = Arc::new(SessionIdentity::new(None));

    let resolved = ResolveIdentityUseCase::new(store_port.clone())
        .execute(cli_student_id, config.student_id.clone())
        .await;
    match resolved {
        Some(resolved) => {
            info!(identity = %resolved.identity, source = %resolved.source, "Identity resolved");
            SignInUseCase::new(session.clone(), repository.clone(), store_port.clone())
                .execute(resolved.identity)
                .await
                .wrap_err("Failed to persist session")?;
        }
        None => warn!("No student identity, badge will stay empty"),
    }

    let service = Arc::new(UnreadService::new(
        session.clone(),
        repository.clone(),
        open_remote(&config)?,
        config.sync.mode,
    ));
    let scheduler = Arc::new(RefreshScheduler::new(
        service.clone(),
        SchedulerConfig {
            poll_interval: config.sync.poll_interval(),
            refresh_on_foreground: config.sync.refresh_on_foreground,
            refresh_on_focus: config.sync.refresh_on_focus,
            pause_in_background: config.sync.pause_in_background,
        },
    ));
    let presenter = BadgePresenter::new(scheduler.clone(), service.clone(), Arc::new(LogNavigator))
        .with_overflow_threshold(config.badge.overflow_threshold);

    match command {
        Command::Watch => watch(scheduler, &presenter).await?,
        Command::Count => {
            let result = service.refresh(UnreadCount::ZERO).await;
            info!(count = result.count.get(), source = ?result.source, "Reconciled");
            println!("{}", result.count);
        }
        Command::MarkRead => {
            presenter.on_activate().await;
            let result = service.refresh(UnreadCount::ZERO).await;
            println!("{}", result.count);
        }
        Command::SignOut => {
            let signed_out = SignOutUseCase::new(session, repository, store_port)
                .execute()
                .await
                .wrap_err("Failed to sign out")?;
            match signed_out {
                Some(identity) => println!("Signed out {identity}"),
                None => println!("Not signed in"),
            }
        }
    }

    Ok(())
}
