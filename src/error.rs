use crate::events::WindowId;
use thiserror::Error;
use x11rb::errors::{ConnectError, ConnectionError, ReplyError};

#[derive(Error, Debug)]
pub enum AutologinError {
    #[error("Не удалось подключиться к X-серверу: {0}")]
    Connect(#[from] ConnectError),

    #[error("Соединение с X-сервером потеряно: {0}")]
    Connection(#[from] ConnectionError),

    /// Окно исчезло между получением его XID и запросом к нему
    #[error("Окно {0} больше не существует")]
    WindowGone(WindowId),

    #[error("Расширение X-сервера недоступно: {0}")]
    MissingExtension(String),

    #[error("Клавиша не найдена в раскладке: {0}")]
    UnmappedKey(String),

    #[error("Ошибка получения учётных данных: {0}")]
    Credential(String),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

impl AutologinError {
    pub fn is_window_gone(&self) -> bool {
        matches!(self, AutologinError::WindowGone(_))
    }

    /// Ошибки, после которых продолжать работу бессмысленно: соединение с сервером
    /// мертво либо не может быть установлено.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AutologinError::Connect(_)
                | AutologinError::Connection(_)
                | AutologinError::MissingExtension(_)
        )
    }
}

impl From<ReplyError> for AutologinError {
    fn from(err: ReplyError) -> Self {
        match err {
            ReplyError::ConnectionError(e) => AutologinError::Connection(e),
            ReplyError::X11Error(e) => {
                AutologinError::Internal(format!("X-сервер вернул ошибку: {:?}", e))
            }
        }
    }
}

impl AutologinError {
    /// Ошибка запроса к конкретному окну: ответ сервера с ошибкой означает,
    /// что окна уже нет, разрыв соединения остаётся фатальным.
    pub fn for_window(window: WindowId, err: ReplyError) -> Self {
        match err {
            ReplyError::ConnectionError(e) => AutologinError::Connection(e),
            ReplyError::X11Error(e) => {
                tracing::debug!("Запрос к окну {} отклонён сервером: {:?}", window, e.error_kind);
                AutologinError::WindowGone(window)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AutologinError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! autologin_error {
    (unmapped_key, $($arg:tt)*) => {
        $crate::error::AutologinError::UnmappedKey(format!($($arg)*))
    };
    (credential, $($arg:tt)*) => {
        $crate::error::AutologinError::Credential(format!($($arg)*))
    };
    (internal, $($arg:tt)*) => {
        $crate::error::AutologinError::Internal(format!($($arg)*))
    };
}
