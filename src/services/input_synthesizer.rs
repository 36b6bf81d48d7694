use crate::autologin_error;
use crate::debug_if_enabled;
use crate::error::Result;
use crate::events::{KeyCode, KeyCommand, KeyStroke};
use crate::mappings::{CharToKeyName, KeyNameToKeysym};
use crate::services::display::DisplayConnection;
use tracing::debug;

const SHIFT_KEY: &str = "Shift_L";

/// Синтез нажатий клавиш через соединение с сервером.
///
/// Каждый символ отправляется отдельно и подтверждается `sync()`: после возврата
/// из `type_text`/`type_special` сервер уже обработал все события.
pub struct InputSynthesizer<'a, C: DisplayConnection + ?Sized> {
    conn: &'a C,
}

impl<'a, C: DisplayConnection + ?Sized> InputSynthesizer<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Набрать текст посимвольно, строго по порядку.
    /// Содержимое текста не логируется: это может быть пароль.
    pub fn type_text(&self, text: &str) -> Result<()> {
        debug!("Набор текста: {} символов", text.chars().count());

        for (position, c) in text.chars().enumerate() {
            let stroke = self.stroke(&KeyCommand::Char(c)).ok_or_else(|| {
                autologin_error!(unmapped_key, "символ на позиции {} не найден в раскладке", position)
            })?;
            self.send(&stroke)?;
        }
        Ok(())
    }

    /// Нажать и отпустить именованную клавишу ("Tab", "Return", ...)
    pub fn type_special(&self, name: &str) -> Result<()> {
        debug!("Нажатие клавиши {}", name);

        let command = KeyCommand::Special(name.to_string());
        let stroke = self
            .stroke(&command)
            .ok_or_else(|| autologin_error!(unmapped_key, "{}", command))?;
        self.send(&stroke)
    }

    fn stroke(&self, command: &KeyCommand) -> Option<KeyStroke> {
        match command {
            KeyCommand::Char(c) => {
                let key_code = self.keycode(&CharToKeyName::translate(*c))?;
                let shift = if CharToKeyName::needs_shift(*c) {
                    Some(self.keycode(SHIFT_KEY)?)
                } else {
                    None
                };
                Some(KeyStroke::tap(key_code, shift))
            }
            KeyCommand::Special(name) => Some(KeyStroke::tap(self.keycode(name)?, None)),
        }
    }

    fn keycode(&self, name: &str) -> Option<KeyCode> {
        let keysym = KeyNameToKeysym::translate(name)?;
        self.conn.keycode_for(keysym)
    }

    fn send(&self, stroke: &KeyStroke) -> Result<()> {
        for action in stroke.actions() {
            debug_if_enabled!("Событие {:?} {}", action.state, action.key_code);
            self.conn.fake_key(action.key_code, action.state)?;
        }
        self.conn.sync()
    }
}
