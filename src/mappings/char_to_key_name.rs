use once_cell::sync::Lazy;
use std::borrow::Cow;
use std::collections::HashMap;

/// Преобразование печатных символов в имена keysym X11
/// Символы вне таблицы передаются как есть: их имя совпадает с самим символом
pub struct CharToKeyName;

static LETTER_MAP: Lazy<HashMap<char, &'static str>> = Lazy::new(|| {
    let mut map = HashMap::new();

    // Пробельные и управляющие
    map.insert(' ', "space");
    map.insert('\t', "Tab");
    map.insert('\n', "Return");
    map.insert('\r', "Return");
    map.insert('\u{1b}', "Escape");

    // Пунктуация
    map.insert('!', "exclam");
    map.insert('#', "numbersign");
    map.insert('%', "percent");
    map.insert('$', "dollar");
    map.insert('&', "ampersand");
    map.insert('"', "quotedbl");
    map.insert('\'', "apostrophe");
    map.insert('(', "parenleft");
    map.insert(')', "parenright");
    map.insert('*', "asterisk");
    map.insert('=', "equal");
    map.insert('+', "plus");
    map.insert(',', "comma");
    map.insert('-', "minus");
    map.insert('.', "period");
    map.insert('/', "slash");
    map.insert(':', "colon");
    map.insert(';', "semicolon");
    map.insert('<', "less");
    map.insert('>', "greater");
    map.insert('?', "question");
    map.insert('@', "at");
    map.insert('[', "bracketleft");
    map.insert(']', "bracketright");
    map.insert('\\', "backslash");
    map.insert('^', "asciicircum");
    map.insert('_', "underscore");
    map.insert('`', "grave");
    map.insert('{', "braceleft");
    map.insert('|', "bar");
    map.insert('}', "braceright");
    map.insert('~', "asciitilde");

    map
});

/// Символы, которые на US-раскладке набираются с Shift
const SHIFTED_SYMBOLS: &str = "~!@#$%^&*()_+{}|:\"<>?";

impl CharToKeyName {
    /// Получить имя keysym для символа
    pub fn translate(c: char) -> Cow<'static, str> {
        match LETTER_MAP.get(&c) {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(c.to_string()),
        }
    }

    /// Нужно ли зажимать Shift для набора символа
    pub fn needs_shift(c: char) -> bool {
        c.is_uppercase() || SHIFTED_SYMBOLS.contains(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols_are_named() {
        assert_eq!(CharToKeyName::translate(' '), "space");
        assert_eq!(CharToKeyName::translate('!'), "exclam");
        assert_eq!(CharToKeyName::translate('\n'), "Return");
        assert_eq!(CharToKeyName::translate('~'), "asciitilde");
    }

    #[test]
    fn test_unknown_chars_pass_through() {
        assert_eq!(CharToKeyName::translate('a'), "a");
        assert_eq!(CharToKeyName::translate('Z'), "Z");
        assert_eq!(CharToKeyName::translate('7'), "7");
    }

    #[test]
    fn test_shift_detection() {
        assert!(CharToKeyName::needs_shift('A'));
        assert!(CharToKeyName::needs_shift('!'));
        assert!(CharToKeyName::needs_shift('"'));
        assert!(!CharToKeyName::needs_shift('a'));
        assert!(!CharToKeyName::needs_shift('1'));
        assert!(!CharToKeyName::needs_shift('-'));
        assert!(!CharToKeyName::needs_shift(' '));
    }
}
