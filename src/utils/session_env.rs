use crate::error::{AutologinError, Result};
use tracing::{info, warn};

/// Тип графической сессии пользователя
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    X11,
    /// Под Wayland события XTEST доходят только до клиентов XWayland
    XWayland,
}

/// Проверить, что есть X-дисплей, к которому можно подключиться
pub fn check_session(display_override: Option<&str>) -> Result<SessionKind> {
    info!("Проверка графической сессии...");

    let display = std::env::var("DISPLAY").ok();
    let session_type = std::env::var("XDG_SESSION_TYPE").ok();
    let kind = inspect(
        display_override.or(display.as_deref()),
        session_type.as_deref(),
    )?;

    if kind == SessionKind::XWayland {
        warn!("⚠️  Сессия Wayland: ввод будет работать только для окон XWayland");
        warn!("   Клиент Pulse Secure должен быть запущен как X11-приложение");
    }

    info!("Графическая сессия: {:?}", kind);
    Ok(kind)
}

fn inspect(display: Option<&str>, session_type: Option<&str>) -> Result<SessionKind> {
    match display {
        Some(name) if !name.is_empty() => {}
        _ => {
            return Err(AutologinError::Internal(
                "Переменная DISPLAY не задана и --display не указан".to_string(),
            ))
        }
    }

    Ok(match session_type {
        Some("wayland") => SessionKind::XWayland,
        _ => SessionKind::X11,
    })
}
