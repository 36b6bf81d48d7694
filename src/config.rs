use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub session: SessionConfig,
    pub titles: TitlesConfig,
    pub timing: TimingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// Логин и команды получения секретов. Сами секреты в конфигурации не хранятся.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub password_cmd: String,
    #[serde(default)]
    pub otp_cmd: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TitlesConfig {
    /// Заголовок окна ввода учётных данных
    pub login_prompt: String,
    /// Заголовок главного окна клиента (уже подключены)
    pub main_window: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimingConfig {
    pub settle_delay_ms: u64,
    pub after_login_ms: u64,
    pub after_password_ms: u64,
    pub after_otp_ms: u64,
}

impl TimingConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn after_login(&self) -> Duration {
        Duration::from_millis(self.after_login_ms)
    }

    pub fn after_password(&self) -> Duration {
        Duration::from_millis(self.after_password_ms)
    }

    pub fn after_otp(&self) -> Duration {
        Duration::from_millis(self.after_otp_ms)
    }
}

/// Значения из командной строки, перекрывающие файл и окружение
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub login: Option<String>,
    pub password_cmd: Option<String>,
    pub otp_cmd: Option<String>,
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            session: SessionConfig::default(),
            titles: TitlesConfig {
                login_prompt: "pulseUI".to_string(),
                main_window: "Pulse Secure".to_string(),
            },
            timing: TimingConfig {
                settle_delay_ms: 3000,
                after_login_ms: 500,
                after_password_ms: 3000,
                after_otp_ms: 1000,
            },
        }
    }
}

impl Config {
    /// Слои: значения по умолчанию -> TOML-файл (если есть) -> PULSE_AUTOLOGIN_* -> CLI
    pub fn load<P: AsRef<Path>>(config_path: P, overrides: CliOverrides) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("PULSE_AUTOLOGIN_").split("__"));

        let mut config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.apply_overrides(overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn apply_overrides(&mut self, overrides: CliOverrides) {
        if let Some(login) = overrides.login {
            self.session.login = login;
        }
        if let Some(password_cmd) = overrides.password_cmd {
            self.session.password_cmd = password_cmd;
        }
        if let Some(otp_cmd) = overrides.otp_cmd {
            self.session.otp_cmd = otp_cmd;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<()> {
        // Валидация настроек логирования
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        // Валидация сессии
        if self.session.login.is_empty() {
            anyhow::bail!("Не указан логин (аргумент LOGIN или session.login)");
        }
        if self.session.password_cmd.trim().is_empty() {
            anyhow::bail!("Не указана команда получения пароля (session.password_cmd)");
        }
        if self.session.otp_cmd.trim().is_empty() {
            anyhow::bail!("Не указана команда получения OTP (session.otp_cmd)");
        }

        // Валидация заголовков окон
        if self.titles.login_prompt.is_empty() || self.titles.main_window.is_empty() {
            anyhow::bail!("Заголовки окон не могут быть пустыми");
        }
        if self.titles.login_prompt == self.titles.main_window {
            anyhow::bail!(
                "Заголовки окна входа и главного окна совпадают: {}",
                self.titles.login_prompt
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> CliOverrides {
        CliOverrides {
            login: Some("jdoe".to_string()),
            password_cmd: Some("pass show vpn".to_string()),
            otp_cmd: Some("oathtool --totp -b KEY".to_string()),
            log_level: None,
        }
    }

    #[test]
    fn test_default_config_needs_session() {
        let config = Config::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides_complete_default_config() {
        let mut config = Config::default();
        config.apply_overrides(session());
        assert!(config.validate().is_ok());
        assert_eq!(config.session.login, "jdoe");
        assert_eq!(config.titles.login_prompt, "pulseUI");
        assert_eq!(config.timing.settle_delay(), Duration::from_secs(3));
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = Config::default();
        config.apply_overrides(CliOverrides {
            log_level: Some("verbose".to_string()),
            ..session()
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_layer_merges_over_defaults() {
        let config: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::string(
                r#"
                [session]
                login = "alice"

                [timing]
                settle_delay_ms = 100
                "#,
            ))
            .extract()
            .unwrap();

        assert_eq!(config.session.login, "alice");
        assert_eq!(config.timing.settle_delay_ms, 100);
        assert_eq!(config.timing.after_otp_ms, 1000);
        assert_eq!(config.titles.main_window, "Pulse Secure");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::load("/nonexistent/pulse-autologin.toml", session()).unwrap();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.session.otp_cmd, "oathtool --totp -b KEY");
    }

    #[test]
    fn test_identical_titles_rejected() {
        let mut config = Config::default();
        config.apply_overrides(session());
        config.titles.main_window = config.titles.login_prompt.clone();
        assert!(config.validate().is_err());
    }
}
