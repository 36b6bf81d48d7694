//! In-memory display used by unit tests: properties, a notification queue,
//! subscriptions and a journal of injected key events.
//!
//! `focus` and `rename` queue the property change together with its notification;
//! the change lands only when `wait_for_notification` pops it, as on a real server
//! where a client reads the property after the event arrives.

use crate::error::{AutologinError, Result};
use crate::events::keyboard::KeyAction;
use crate::events::{Atom, KeyCode, KeyState, Keysym, WindowId};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use x11rb::errors::ConnectionError;

use super::r#trait::{DisplayConnection, Notification, PropertyType, PropertyValue, WatchedAtoms};

pub const ROOT: WindowId = WindowId::new(1);
pub const STRING: Atom = 31;
pub const WINDOW: Atom = 33;
pub const SHIFT_L: KeyCode = KeyCode(50);

type PropertyKey = (WindowId, Atom);

/// Уведомление и изменение свойства, которое применяется при его извлечении
struct Queued {
    change: Option<(PropertyKey, PropertyValue)>,
    notification: Notification,
}

#[derive(Default)]
struct MockState {
    properties: HashMap<PropertyKey, PropertyValue>,
    gone: HashSet<WindowId>,
    notifications: VecDeque<Queued>,
    subscriptions: HashSet<WindowId>,
    journal: Vec<KeyAction>,
    syncs: usize,
}

pub struct MockDisplay {
    atoms: WatchedAtoms,
    keymap: HashMap<Keysym, KeyCode>,
    state: RefCell<MockState>,
}

impl MockDisplay {
    pub fn new() -> Self {
        Self {
            atoms: WatchedAtoms {
                net_active_window: 300,
                net_wm_name: 301,
                wm_name: 39,
                utf8_string: 302,
            },
            keymap: us_keymap(),
            state: RefCell::new(MockState::default()),
        }
    }

    /// Сменить активное окно сразу, без уведомления
    pub fn set_active(&self, window: Option<WindowId>) {
        let (key, value) = self.active_window_change(window);
        self.state.borrow_mut().properties.insert(key, value);
    }

    /// Поставить в очередь смену активного окна вместе с уведомлением
    pub fn focus(&self, window: Option<WindowId>) {
        let change = self.active_window_change(window);
        self.enqueue(Some(change), ROOT, self.atoms.net_active_window);
    }

    pub fn set_utf8_title(&self, window: WindowId, title: &[u8]) {
        let (key, value) = self.utf8_title_change(window, title);
        self.state.borrow_mut().properties.insert(key, value);
    }

    pub fn set_legacy_title(&self, window: WindowId, title: &[u8]) {
        self.state.borrow_mut().properties.insert(
            (window, self.atoms.wm_name),
            PropertyValue { type_: STRING, format: 8, value: title.to_vec() },
        );
    }

    /// Поставить в очередь переименование через `_NET_WM_NAME` вместе с уведомлением
    pub fn rename(&self, window: WindowId, title: &str) {
        let change = self.utf8_title_change(window, title.as_bytes());
        self.enqueue(Some(change), window, self.atoms.net_wm_name);
    }

    pub fn destroy(&self, window: WindowId) {
        self.state.borrow_mut().gone.insert(window);
    }

    /// Уведомление без изменения свойства
    pub fn notify(&self, window: WindowId, atom: Atom) {
        self.enqueue(None, window, atom);
    }

    pub fn push_other(&self) {
        self.state.borrow_mut().notifications.push_back(Queued {
            change: None,
            notification: Notification::Other,
        });
    }

    pub fn is_subscribed(&self, window: WindowId) -> bool {
        self.state.borrow().subscriptions.contains(&window)
    }

    pub fn subscription_count(&self) -> usize {
        self.state.borrow().subscriptions.len()
    }

    pub fn pending(&self) -> usize {
        self.state.borrow().notifications.len()
    }

    pub fn journal(&self) -> Vec<KeyAction> {
        self.state.borrow().journal.clone()
    }

    pub fn syncs(&self) -> usize {
        self.state.borrow().syncs
    }

    pub fn keycode(&self, name: &str) -> KeyCode {
        let keysym = crate::mappings::KeyNameToKeysym::translate(name)
            .unwrap_or_else(|| panic!("неизвестное имя {}", name));
        self.keymap[&keysym]
    }

    fn active_window_change(&self, window: Option<WindowId>) -> (PropertyKey, PropertyValue) {
        let xid = window.map(|w| w.xid()).unwrap_or(0);
        (
            (ROOT, self.atoms.net_active_window),
            PropertyValue { type_: WINDOW, format: 32, value: xid.to_ne_bytes().to_vec() },
        )
    }

    fn utf8_title_change(&self, window: WindowId, title: &[u8]) -> (PropertyKey, PropertyValue) {
        (
            (window, self.atoms.net_wm_name),
            PropertyValue { type_: self.atoms.utf8_string, format: 8, value: title.to_vec() },
        )
    }

    fn enqueue(&self, change: Option<(PropertyKey, PropertyValue)>, window: WindowId, atom: Atom) {
        self.state.borrow_mut().notifications.push_back(Queued {
            change,
            notification: Notification::PropertyChanged { window, atom },
        });
    }

    fn check_alive(&self, window: WindowId) -> Result<()> {
        if self.state.borrow().gone.contains(&window) {
            return Err(AutologinError::WindowGone(window));
        }
        Ok(())
    }
}

impl DisplayConnection for MockDisplay {
    fn root(&self) -> WindowId {
        ROOT
    }

    fn atoms(&self) -> &WatchedAtoms {
        &self.atoms
    }

    fn wait_for_notification(&self) -> Result<Notification> {
        let mut state = self.state.borrow_mut();
        let queued = state.notifications.pop_front().ok_or_else(|| {
            AutologinError::Connection(ConnectionError::IoError(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "очередь уведомлений пуста",
            )))
        })?;
        if let Some((key, value)) = queued.change {
            state.properties.insert(key, value);
        }
        Ok(queued.notification)
    }

    fn read_property(
        &self,
        window: WindowId,
        property: Atom,
        expected: PropertyType,
    ) -> Result<Option<PropertyValue>> {
        self.check_alive(window)?;
        let value = self.state.borrow().properties.get(&(window, property)).cloned();
        Ok(value.filter(|v| expected == PropertyType::Any || v.type_ == WINDOW))
    }

    fn subscribe(&self, window: WindowId) -> Result<()> {
        self.check_alive(window)?;
        self.state.borrow_mut().subscriptions.insert(window);
        Ok(())
    }

    fn unsubscribe(&self, window: WindowId) -> Result<()> {
        self.check_alive(window)?;
        self.state.borrow_mut().subscriptions.remove(&window);
        Ok(())
    }

    fn sync(&self) -> Result<()> {
        self.state.borrow_mut().syncs += 1;
        Ok(())
    }

    fn keycode_for(&self, keysym: Keysym) -> Option<KeyCode> {
        self.keymap.get(&keysym).copied()
    }

    fn fake_key(&self, key_code: KeyCode, state: KeyState) -> Result<()> {
        self.state.borrow_mut().journal.push(KeyAction { key_code, state });
        Ok(())
    }
}

/// Упрощённая US-раскладка: буквы, цифры, пунктуация и несколько служебных клавиш
fn us_keymap() -> HashMap<Keysym, KeyCode> {
    let mut keymap = HashMap::new();
    let mut bind = |code: u8, syms: &[u32]| {
        for &sym in syms {
            keymap.insert(Keysym(sym), KeyCode(code));
        }
    };

    for (i, c) in ('a'..='z').enumerate() {
        bind(100 + i as u8, &[c as u32, c.to_ascii_uppercase() as u32]);
    }

    let pairs = [
        ('1', '!'), ('2', '@'), ('3', '#'), ('4', '$'), ('5', '%'),
        ('6', '^'), ('7', '&'), ('8', '*'), ('9', '('), ('0', ')'),
        ('-', '_'), ('=', '+'), ('[', '{'), (']', '}'), ('\\', '|'),
        (';', ':'), ('\'', '"'), ('`', '~'), (',', '<'), ('.', '>'),
        ('/', '?'),
    ];
    for (i, (plain, shifted)) in pairs.iter().enumerate() {
        bind(130 + i as u8, &[*plain as u32, *shifted as u32]);
    }

    bind(65, &[0x0020]); // space
    bind(23, &[0xff09]); // Tab
    bind(36, &[0xff0d]); // Return
    bind(9, &[0xff1b]); // Escape
    bind(SHIFT_L.value(), &[0xffe1]);

    keymap
}
