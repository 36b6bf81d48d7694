use crate::events::Keysym;

/// Преобразование имён клавиш в keysym X11
/// Имена чувствительны к регистру, как в XStringToKeysym
pub struct KeyNameToKeysym;

impl KeyNameToKeysym {
    /// Получить keysym по имени
    pub fn translate(name: &str) -> Option<Keysym> {
        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Self::from_char(c);
        }

        let value = match name {
            // Пунктуация (значения совпадают с ASCII)
            "space" => 0x0020,
            "exclam" => 0x0021,
            "quotedbl" => 0x0022,
            "numbersign" => 0x0023,
            "dollar" => 0x0024,
            "percent" => 0x0025,
            "ampersand" => 0x0026,
            "apostrophe" => 0x0027,
            "parenleft" => 0x0028,
            "parenright" => 0x0029,
            "asterisk" => 0x002a,
            "plus" => 0x002b,
            "comma" => 0x002c,
            "minus" => 0x002d,
            "period" => 0x002e,
            "slash" => 0x002f,
            "colon" => 0x003a,
            "semicolon" => 0x003b,
            "less" => 0x003c,
            "equal" => 0x003d,
            "greater" => 0x003e,
            "question" => 0x003f,
            "at" => 0x0040,
            "bracketleft" => 0x005b,
            "backslash" => 0x005c,
            "bracketright" => 0x005d,
            "asciicircum" => 0x005e,
            "underscore" => 0x005f,
            "grave" => 0x0060,
            "braceleft" => 0x007b,
            "bar" => 0x007c,
            "braceright" => 0x007d,
            "asciitilde" => 0x007e,

            // Специальные клавиши
            "BackSpace" => 0xff08,
            "Tab" => 0xff09,
            "Return" => 0xff0d,
            "Pause" => 0xff13,
            "Scroll_Lock" => 0xff14,
            "Escape" => 0xff1b,
            "Delete" => 0xffff,
            "Print" => 0xff61,
            "Insert" => 0xff63,
            "Menu" => 0xff67,
            "Num_Lock" => 0xff7f,
            "KP_Enter" => 0xff8d,

            // Навигация
            "Home" => 0xff50,
            "Left" => 0xff51,
            "Up" => 0xff52,
            "Right" => 0xff53,
            "Down" => 0xff54,
            "Page_Up" => 0xff55,
            "Page_Down" => 0xff56,
            "End" => 0xff57,

            // Функциональные
            "F1" => 0xffbe,
            "F2" => 0xffbf,
            "F3" => 0xffc0,
            "F4" => 0xffc1,
            "F5" => 0xffc2,
            "F6" => 0xffc3,
            "F7" => 0xffc4,
            "F8" => 0xffc5,
            "F9" => 0xffc6,
            "F10" => 0xffc7,
            "F11" => 0xffc8,
            "F12" => 0xffc9,

            // Модификаторы
            "Shift_L" => 0xffe1,
            "Shift_R" => 0xffe2,
            "Control_L" => 0xffe3,
            "Control_R" => 0xffe4,
            "Caps_Lock" => 0xffe5,
            "Alt_L" => 0xffe9,
            "Alt_R" => 0xffea,
            "Super_L" => 0xffeb,
            "Super_R" => 0xffec,

            _ => return None,
        };

        Some(Keysym(value))
    }

    /// Keysym для одиночного символа: Latin-1 совпадает с кодом символа,
    /// остальной Unicode кодируется как 0x01000000 + code point
    fn from_char(c: char) -> Option<Keysym> {
        let code = c as u32;
        match code {
            0x20..=0x7e | 0xa0..=0xff => Some(Keysym(code)),
            _ if c.is_control() => None,
            _ => Some(Keysym(0x0100_0000 | code)),
        }
    }
}
