use crate::config::Config;
use crate::error::Result;
use crate::events::TrackerState;
use crate::services::credentials::CredentialCommand;
use crate::services::display::DisplayConnection;
use crate::services::input_synthesizer::InputSynthesizer;
use crate::services::window_watcher::WindowWatcher;
use std::cell::RefCell;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Что сделал диспетчер со снимком состояния
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Ignored,
    /// Заголовок остался от прежнего окна: новое исчезло раньше, чем его прочитали
    StaleTitle,
    Connected,
    LoggedIn,
}

/// Решает по заголовку окна, нужно ли вводить учётные данные, и вводит их
pub struct LoginDispatcher {
    config: Arc<Config>,
    password: CredentialCommand,
    otp: CredentialCommand,
    last_seen: RefCell<Option<TrackerState>>,
}

impl LoginDispatcher {
    pub fn new(config: Arc<Config>) -> Self {
        let password = CredentialCommand::new("пароля", config.session.password_cmd.clone());
        let otp = CredentialCommand::new("OTP", config.session.otp_cmd.clone());
        Self {
            config,
            password,
            otp,
            last_seen: RefCell::new(None),
        }
    }

    /// Основной цикл: обработать начальное окно, затем каждое изменение.
    /// Возвращается только с фатальной ошибкой соединения.
    pub fn run<C: DisplayConnection + ?Sized>(&self, conn: &C) -> Result<()> {
        let mut watcher = WindowWatcher::new(conn)?;
        let keyboard = InputSynthesizer::new(conn);

        self.handle(watcher.state(), &keyboard)?;
        for state in &mut watcher {
            self.handle(&state?, &keyboard)?;
        }
        Ok(())
    }

    pub fn dispatch<C: DisplayConnection + ?Sized>(
        &self,
        state: &TrackerState,
        keyboard: &InputSynthesizer<C>,
    ) -> Result<DispatchOutcome> {
        info!("Смена окна: {}", state);

        let previous = self.last_seen.replace(Some(state.clone()));
        if is_stale_title(previous.as_ref(), state) {
            warn!("Заголовок {} перешёл к окну без собственного заголовка, пропуск", state);
            return Ok(DispatchOutcome::StaleTitle);
        }

        let titles = &self.config.titles;
        match state.title_str() {
            Some(title) if title == titles.main_window => {
                info!("Открыто главное окно клиента");
                Ok(DispatchOutcome::Connected)
            }
            Some(title) if title == titles.login_prompt => {
                self.login(keyboard)?;
                Ok(DispatchOutcome::LoggedIn)
            }
            _ => Ok(DispatchOutcome::Ignored),
        }
    }

    fn handle<C: DisplayConnection + ?Sized>(
        &self,
        state: &TrackerState,
        keyboard: &InputSynthesizer<C>,
    ) -> Result<()> {
        match self.dispatch(state, keyboard) {
            Ok(outcome) => debug!("Окно обработано: {:?}", outcome),
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => error!("Не удалось выполнить вход: {}", e),
        }
        Ok(())
    }

    fn login<C: DisplayConnection + ?Sized>(&self, keyboard: &InputSynthesizer<C>) -> Result<()> {
        let timing = &self.config.timing;
        info!("Обнаружено окно входа, ввод учётных данных");

        pause(timing.settle_delay());
        keyboard.type_text(&self.config.session.login)?;
        keyboard.type_special("Tab")?;
        pause(timing.after_login());

        let password = self.password.fetch()?;
        keyboard.type_text(password.expose())?;
        keyboard.type_special("Return")?;
        pause(timing.after_password());

        let otp = self.otp.fetch()?;
        keyboard.type_text(otp.expose())?;
        keyboard.type_special("Return")?;
        pause(timing.after_otp());

        info!("Ввод учётных данных завершён");
        Ok(())
    }
}

/// Окно сменилось, а заголовок тот же: трекер оставил заголовок исчезнувшего окна
fn is_stale_title(previous: Option<&TrackerState>, current: &TrackerState) -> bool {
    let Some(previous) = previous else {
        return false;
    };
    current.title.is_some()
        && current.title == previous.title
        && current.active_window != previous.active_window
}

fn pause(delay: Duration) {
    if !delay.is_zero() {
        thread::sleep(delay);
    }
}
