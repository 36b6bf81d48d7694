//! WindowWatcher: responsibility and boundaries
//!
//! Blocks on the display connection, filters property-change notifications down to the
//! active-window pointer and the two title properties, feeds them to WindowTracker and
//! hands out a TrackerState snapshot exactly when something changed. It is pull-driven:
//! nothing happens until the caller asks for the next change. It MUST NOT decide what to
//! type for which title; that belongs to LoginDispatcher.

use crate::debug_if_enabled;
use crate::error::Result;
use crate::events::{ChangeEvent, TrackerState, WatchedProperty, WindowId};
use crate::services::display::{DisplayConnection, Notification};
use crate::services::window_tracker::WindowTracker;
use tracing::{debug, info};

pub struct WindowWatcher<'a, C: DisplayConnection + ?Sized> {
    conn: &'a C,
    tracker: WindowTracker,
}

impl<'a, C: DisplayConnection + ?Sized> WindowWatcher<'a, C> {
    /// Подписаться на корневое окно и один раз разрешить активное окно и заголовок
    pub fn new(conn: &'a C) -> Result<Self> {
        conn.subscribe(conn.root())?;

        let mut tracker = WindowTracker::new();
        let (window, _) = tracker.resolve_active_window(conn)?;
        tracker.resolve_title(conn, window)?;

        info!("WindowWatcher запущен, текущее окно: {}", tracker.state());
        Ok(Self { conn, tracker })
    }

    pub fn state(&self) -> &TrackerState {
        self.tracker.state()
    }

    /// Заблокироваться до следующего реального изменения окна или заголовка
    pub fn next_change(&mut self) -> Result<TrackerState> {
        loop {
            let notification = self.conn.wait_for_notification()?;
            let Some(event) = self.classify(notification) else {
                continue;
            };

            if self.apply(event)? {
                let state = self.tracker.state().clone();
                debug!("Изменение окна: {}", state);
                return Ok(state);
            }
        }
    }

    fn classify(&self, notification: Notification) -> Option<ChangeEvent> {
        match notification {
            Notification::PropertyChanged { window, atom } => self
                .conn
                .atoms()
                .classify(atom)
                .map(|property| ChangeEvent { window, property }),
            Notification::Other => None,
        }
    }

    fn apply(&mut self, event: ChangeEvent) -> Result<bool> {
        debug_if_enabled!("Уведомление {:?} от окна {}", event.property, event.window);
        match event.property {
            WatchedProperty::ActiveWindow => {
                let (window, changed) = self.tracker.resolve_active_window(self.conn)?;
                if changed {
                    // Заголовок нового окна обновляется всегда; смена окна сама по себе
                    // уже является изменением, флаг заголовка здесь не нужен
                    self.tracker.resolve_title(self.conn, window)?;
                }
                Ok(changed)
            }
            WatchedProperty::Title => {
                let window: Option<WindowId> = self.tracker.state().active_window;
                let (_, changed) = self.tracker.resolve_title(self.conn, window)?;
                Ok(changed)
            }
        }
    }
}

/// Бесконечная ленивая последовательность снимков: по одному на каждое изменение
impl<C: DisplayConnection + ?Sized> Iterator for WindowWatcher<'_, C> {
    type Item = Result<TrackerState>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_change())
    }
}
