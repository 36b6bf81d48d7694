use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::oneshot;
use tracing::{error, info, warn};
mod config;
mod error;
mod events;
mod mappings;
mod services;
mod utils;

use config::{CliOverrides, Config};
use services::{create_display, LoginDispatcher};

#[derive(Parser, Debug)]
#[command(name = "pulse-autologin")]
#[command(about = "Автоматический вход в Ivanti / Pulse Secure под X11")]
struct Args {
    /// Логин
    login: Option<String>,

    /// Команда, печатающая пароль в stdout
    password_cmd: Option<String>,

    /// Команда, печатающая одноразовый код в stdout
    otp_cmd: Option<String>,

    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "pulse-autologin.toml")]
    config: String,

    /// X-дисплей (по умолчанию $DISPLAY)
    #[arg(long)]
    display: Option<String>,

    /// Режим сухого запуска (окна отслеживаются, клавиши не отправляются)
    #[arg(long)]
    dry_run: bool,

    /// Подробный вывод (эквивалент --log-level debug)
    #[arg(short, long)]
    verbose: bool,

    /// Уровень логирования
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let overrides = CliOverrides {
        login: args.login.clone(),
        password_cmd: args.password_cmd.clone(),
        otp_cmd: args.otp_cmd.clone(),
        log_level: if args.verbose {
            Some("debug".to_string())
        } else {
            args.log_level.clone()
        },
    };

    // Загрузка конфигурации
    let config = Arc::new(Config::load(&args.config, overrides)?);

    // Инициализация системы логирования
    init_tracing(&config.logging.level)?;

    info!("Запуск pulse-autologin v{}", env!("CARGO_PKG_VERSION"));
    info!("Конфигурация загружена из: {}", args.config);

    if args.dry_run {
        warn!("Режим сухого запуска - нажатия клавиш не отправляются");
    }

    // Проверка графической сессии
    utils::session_env::check_session(args.display.as_deref())?;

    // Наблюдатель блокируется на X-соединении, поэтому живёт в отдельном потоке
    let (done_tx, done_rx) = oneshot::channel();
    let watcher_config = config.clone();
    let display_name = args.display.clone();
    let dry_run = args.dry_run;
    std::thread::Builder::new()
        .name("x11-watcher".to_string())
        .spawn(move || {
            let result = run_watcher(watcher_config, display_name.as_deref(), dry_run);
            let _ = done_tx.send(result);
        })
        .context("Не удалось запустить поток наблюдателя")?;

    info!("Наблюдатель окон запущен");

    // Ожидание сигнала завершения или фатальной ошибки наблюдателя
    tokio::select! {
        result = signal::ctrl_c() => match result {
            Ok(()) => info!("Получен сигнал завершения (Ctrl+C)"),
            Err(err) => error!("Ошибка при ожидании сигнала завершения: {}", err),
        },
        result = done_rx => match result {
            Ok(Ok(())) => info!("Наблюдатель завершил работу"),
            Ok(Err(e)) => {
                error!("Ошибка в наблюдателе окон: {}", e);
                return Err(e.into());
            }
            Err(_) => anyhow::bail!("Поток наблюдателя завершился аварийно"),
        },
    }

    info!("pulse-autologin завершил работу");
    Ok(())
}

fn run_watcher(config: Arc<Config>, display_name: Option<&str>, dry_run: bool) -> error::Result<()> {
    let display = create_display(display_name, dry_run)?;
    let dispatcher = LoginDispatcher::new(config);
    dispatcher.run(&*display)
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().compact())
        .init();

    Ok(())
}
