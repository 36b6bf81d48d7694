use smallvec::SmallVec;
use std::fmt;

/// Состояние клавиши
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Физический код клавиши X11 (зависит от раскладки сервера)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCode(pub u8);

impl KeyCode {
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "keycode {}", self.0)
    }
}

/// Символьное значение клавиши (keysym) из X11/keysymdef.h
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Keysym(pub u32);

impl fmt::Display for Keysym {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04x}", self.0)
    }
}

/// Команда для синтезатора ввода: печатный символ или именованная клавиша
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyCommand {
    Char(char),
    Special(String),
}

impl fmt::Display for KeyCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyCommand::Char(_) => write!(f, "<символ>"),
            KeyCommand::Special(name) => write!(f, "{}", name),
        }
    }
}

/// Одно нажатие или отпускание
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyAction {
    pub key_code: KeyCode,
    pub state: KeyState,
}

impl KeyAction {
    pub fn press(key_code: KeyCode) -> Self {
        Self { key_code, state: KeyState::Pressed }
    }

    pub fn release(key_code: KeyCode) -> Self {
        Self { key_code, state: KeyState::Released }
    }
}

/// Последовательность событий для одной команды.
/// Максимум четыре: Shift, клавиша, клавиша, Shift.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyStroke {
    actions: SmallVec<[KeyAction; 4]>,
}

impl KeyStroke {
    /// Нажатие и отпускание, при необходимости обёрнутые в Shift
    pub fn tap(key_code: KeyCode, shift: Option<KeyCode>) -> Self {
        let mut actions = SmallVec::new();
        if let Some(shift) = shift {
            actions.push(KeyAction::press(shift));
        }
        actions.push(KeyAction::press(key_code));
        actions.push(KeyAction::release(key_code));
        if let Some(shift) = shift {
            actions.push(KeyAction::release(shift));
        }
        Self { actions }
    }

    pub fn actions(&self) -> &[KeyAction] {
        &self.actions
    }
}
