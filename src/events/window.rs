use std::fmt;

/// Атом X11 (идентификатор имени свойства или типа)
pub type Atom = u32;

/// XID окна, выданный сервером. Мы им не владеем, это чужая ссылка.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(u32);

impl WindowId {
    pub const fn new(xid: u32) -> Self {
        Self(xid)
    }

    /// XID 0 в `_NET_ACTIVE_WINDOW` означает "активного окна нет"
    pub fn from_xid(xid: u32) -> Option<Self> {
        (xid != 0).then_some(Self(xid))
    }

    pub fn xid(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Заголовок окна. Заменяется целиком при каждом обновлении.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WindowTitle(String);

impl WindowTitle {
    pub fn new(title: impl Into<String>) -> Self {
        Self(title.into())
    }

    /// Заглушка для окна без `_NET_WM_NAME` и `WM_NAME`
    pub fn unnamed(window: WindowId) -> Self {
        Self(format!("<unnamed window> (XID: {})", window))
    }

    /// Заглушка для заголовка, байты которого не являются UTF-8
    pub fn undecodable(window: WindowId) -> Self {
        Self(format!("<could not decode characters> (XID: {})", window))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for WindowTitle {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for WindowTitle {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for WindowTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.0)
    }
}

/// Снимок состояния наблюдателя: активное окно и его заголовок.
///
/// `title` всегда относится к `active_window`: оба поля обновляются вместе
/// до того, как снимок увидит кто-либо снаружи.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackerState {
    pub active_window: Option<WindowId>,
    pub title: Option<WindowTitle>,
}

impl TrackerState {
    pub fn title_str(&self) -> Option<&str> {
        self.title.as_ref().map(WindowTitle::as_str)
    }
}

impl fmt::Display for TrackerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.active_window, &self.title) {
            (Some(window), Some(title)) => write!(f, "{} (XID: {})", title, window),
            (Some(window), None) => write!(f, "<без заголовка> (XID: {})", window),
            (None, _) => write!(f, "<нет активного окна>"),
        }
    }
}

/// Отслеживаемые свойства окон
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WatchedProperty {
    /// `_NET_ACTIVE_WINDOW` на корневом окне
    ActiveWindow,
    /// `_NET_WM_NAME` или `WM_NAME`
    Title,
}

/// Уведомление от сервера, уже отфильтрованное по интересующим свойствам.
/// Живёт одну итерацию цикла.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub window: WindowId,
    pub property: WatchedProperty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_xid_is_no_window() {
        assert_eq!(WindowId::from_xid(0), None);
        assert_eq!(WindowId::from_xid(42), Some(WindowId::new(42)));
    }

    #[test]
    fn test_placeholders_carry_xid() {
        let window = WindowId::new(4242);
        assert_eq!(WindowTitle::unnamed(window), "<unnamed window> (XID: 4242)");
        assert_eq!(
            WindowTitle::undecodable(window).as_str(),
            "<could not decode characters> (XID: 4242)"
        );
    }

    #[test]
    fn test_tracker_state_display() {
        let state = TrackerState {
            active_window: Some(WindowId::new(7)),
            title: Some(WindowTitle::new("pulseUI")),
        };
        assert_eq!(state.to_string(), "\"pulseUI\" (XID: 7)");
        assert_eq!(state.title_str(), Some("pulseUI"));
        assert_eq!(TrackerState::default().to_string(), "<нет активного окна>");
    }
}
