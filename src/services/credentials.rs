use crate::autologin_error;
use crate::error::Result;
use std::fmt;
use std::process::Command;
use tracing::debug;

/// Секрет (пароль, OTP). Debug и Display никогда не печатают содержимое.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret(<{} символов>)", self.0.chars().count())
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

/// Внешняя команда, stdout которой является секретом
pub struct CredentialCommand {
    label: &'static str,
    command: String,
}

impl CredentialCommand {
    pub fn new(label: &'static str, command: impl Into<String>) -> Self {
        Self {
            label,
            command: command.into(),
        }
    }

    /// Выполнить команду через `sh -c` и вернуть её вывод без завершающего перевода строки
    pub fn fetch(&self) -> Result<Secret> {
        debug!("Получение {}: запуск команды", self.label);

        let output = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .output()
            .map_err(|e| autologin_error!(credential, "не удалось запустить команду для {}: {}", self.label, e))?;

        if !output.status.success() {
            return Err(autologin_error!(
                credential,
                "команда для {} завершилась с ошибкой ({})",
                self.label,
                output.status
            ));
        }

        let text = String::from_utf8_lossy(&output.stdout);
        let value = text.trim_end_matches(['\r', '\n']);
        if value.is_empty() {
            return Err(autologin_error!(credential, "команда для {} ничего не вывела", self.label));
        }

        debug!("Получение {}: готово", self.label);
        Ok(Secret::new(value))
    }
}

impl fmt::Debug for CredentialCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialCommand")
            .field("label", &self.label)
            .field("command", &self.command)
            .finish()
    }
}
