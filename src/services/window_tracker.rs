use crate::error::Result;
use crate::events::{Atom, TrackerState, WindowId, WindowTitle};
use crate::services::display::{DisplayConnection, PropertyType, PropertyValue};
use tracing::debug;

/// Последнее наблюдавшееся активное окно и его заголовок.
///
/// Каждая операция устроена как resolve -> compare -> store: значение читается
/// с сервера, сравнивается с сохранённым, и только результат сравнения служит
/// сигналом изменения.
#[derive(Debug, Default)]
pub struct WindowTracker {
    state: TrackerState,
    // false, пока заголовок ни разу не разрешался: первое null -> null считается изменением
    title_resolved: bool,
}

impl WindowTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    /// Перечитать `_NET_ACTIVE_WINDOW` и перенести подписку на новое окно.
    /// Возвращает текущее окно и признак его смены.
    pub fn resolve_active_window<C>(&mut self, conn: &C) -> Result<(Option<WindowId>, bool)>
    where
        C: DisplayConnection + ?Sized,
    {
        let active = Self::read_active_window(conn)?;
        if active == self.state.active_window {
            return Ok((active, false));
        }

        debug!(
            "Активное окно: {:?} -> {:?}",
            self.state.active_window.map(|w| w.xid()),
            active.map(|w| w.xid())
        );

        if let Some(old) = self.state.active_window {
            if old != conn.root() {
                Self::ignore_window_gone(conn.unsubscribe(old), old)?;
            }
        }

        self.state.active_window = active;

        if let Some(new) = active {
            if new != conn.root() {
                Self::ignore_window_gone(conn.subscribe(new), new)?;
            }
        }

        Ok((active, true))
    }

    /// Разрешить заголовок окна и сохранить его.
    /// Возвращает заголовок и признак того, что он отличается от сохранённого.
    pub fn resolve_title<C>(
        &mut self,
        conn: &C,
        window: Option<WindowId>,
    ) -> Result<(Option<WindowTitle>, bool)>
    where
        C: DisplayConnection + ?Sized,
    {
        let Some(window) = window else {
            let changed = !self.title_resolved || self.state.title.is_some();
            self.title_resolved = true;
            self.state.title = None;
            return Ok((None, changed));
        };

        let title = match Self::read_title(conn, window) {
            Ok(title) => title,
            Err(e) if e.is_window_gone() => {
                debug!("Окно {} исчезло при чтении заголовка, заголовок не меняем", window);
                return Ok((self.state.title.clone(), false));
            }
            Err(e) => return Err(e),
        };

        let changed = self.state.title.as_ref() != Some(&title);
        self.title_resolved = true;
        self.state.title = Some(title);

        Ok((self.state.title.clone(), changed))
    }

    fn read_active_window<C>(conn: &C) -> Result<Option<WindowId>>
    where
        C: DisplayConnection + ?Sized,
    {
        let value = conn.read_property(
            conn.root(),
            conn.atoms().net_active_window,
            PropertyType::Window,
        )?;
        Ok(value
            .and_then(|v| v.first_u32())
            .and_then(WindowId::from_xid))
    }

    fn read_title<C>(conn: &C, window: WindowId) -> Result<WindowTitle>
    where
        C: DisplayConnection + ?Sized,
    {
        let atoms = conn.atoms();
        let mut undecodable = false;

        for property in atoms.title_properties() {
            let Some(value) = conn.read_property(window, property, PropertyType::Any)? else {
                continue;
            };
            match decode_title(&value, atoms.utf8_string) {
                Some(title) => return Ok(WindowTitle::new(title)),
                None => {
                    debug!("Заголовок окна {} (атом {}) не является UTF-8", window, property);
                    undecodable = true;
                }
            }
        }

        Ok(if undecodable {
            WindowTitle::undecodable(window)
        } else {
            WindowTitle::unnamed(window)
        })
    }

    fn ignore_window_gone(result: Result<()>, window: WindowId) -> Result<()> {
        match result {
            Err(e) if e.is_window_gone() => {
                debug!("Окно {} уже закрыто, подписка не изменена", window);
                Ok(())
            }
            other => other,
        }
    }
}

/// UTF8_STRING декодируется строго; STRING и COMPOUND_TEXT как Latin-1, как это делает xprop
fn decode_title(value: &PropertyValue, utf8_string: Atom) -> Option<String> {
    if value.type_ == utf8_string {
        String::from_utf8(value.value.clone()).ok()
    } else {
        Some(value.value.iter().map(|&b| char::from(b)).collect())
    }
}
