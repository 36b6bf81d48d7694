use crate::error::{AutologinError, Result};
use crate::events::{Atom, KeyCode, KeyState, Keysym, WindowId};
use std::cell::RefCell;
use std::collections::HashMap;
use tracing::{debug, info};
use x11rb::connection::{Connection, RequestConnection};
use x11rb::protocol::xproto::{
    self, AtomEnum, ChangeWindowAttributesAux, ConnectionExt as _, EventMask, Mapping,
};
use x11rb::protocol::xtest::{self, ConnectionExt as _};
use x11rb::protocol::Event;
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as _;

use super::r#trait::{DisplayConnection, Notification, PropertyType, PropertyValue, WatchedAtoms};

x11rb::atom_manager! {
    pub X11Atoms: X11AtomsCookie {
        _NET_ACTIVE_WINDOW,
        _NET_WM_NAME,
        UTF8_STRING,
    }
}

pub struct X11Connection {
    conn: RustConnection,
    root: WindowId,
    atoms: WatchedAtoms,
    keymap: RefCell<HashMap<Keysym, KeyCode>>,
    dry_run: bool,
}

impl X11Connection {
    pub fn connect(display_name: Option<&str>, dry_run: bool) -> Result<Self> {
        info!(
            "Подключение к X-серверу {} (dry_run: {})",
            display_name.unwrap_or("$DISPLAY"),
            dry_run
        );

        let (conn, screen_num) = x11rb::connect(display_name)?;
        let root = WindowId::new(conn.setup().roots[screen_num].root);

        let interned = X11Atoms::new(&conn)?.reply()?;
        let atoms = WatchedAtoms {
            net_active_window: interned._NET_ACTIVE_WINDOW,
            net_wm_name: interned._NET_WM_NAME,
            wm_name: AtomEnum::WM_NAME.into(),
            utf8_string: interned.UTF8_STRING,
        };

        Self::check_xtest(&conn)?;
        let keymap = Self::load_keymap(&conn)?;
        info!(
            "Подключено к X-серверу, корневое окно {}, в раскладке {} keysym",
            root,
            keymap.len()
        );

        Ok(Self {
            conn,
            root,
            atoms,
            keymap: RefCell::new(keymap),
            dry_run,
        })
    }

    fn check_xtest(conn: &RustConnection) -> Result<()> {
        if conn.extension_information(xtest::X11_EXTENSION_NAME)?.is_none() {
            return Err(AutologinError::MissingExtension(
                xtest::X11_EXTENSION_NAME.to_string(),
            ));
        }
        let version = conn.xtest_get_version(2, 2)?.reply()?;
        info!(
            "Расширение XTEST {}.{}",
            version.major_version, version.minor_version
        );
        Ok(())
    }

    fn load_keymap(conn: &RustConnection) -> Result<HashMap<Keysym, KeyCode>> {
        let setup = conn.setup();
        let min_keycode = setup.min_keycode;
        let max_keycode = setup.max_keycode;

        let reply = conn
            .get_keyboard_mapping(min_keycode, max_keycode - min_keycode + 1)?
            .reply()?;

        debug!(
            "Загружена раскладка: keycode {}..={}, {} keysym на клавишу",
            min_keycode, max_keycode, reply.keysyms_per_keycode
        );
        Ok(build_keymap(min_keycode, reply.keysyms_per_keycode, &reply.keysyms))
    }

    fn set_event_mask(&self, window: WindowId, mask: EventMask) -> Result<()> {
        self.conn
            .change_window_attributes(window.xid(), &ChangeWindowAttributesAux::new().event_mask(mask))?
            .check()
            .map_err(|e| AutologinError::for_window(window, e))
    }
}

/// Построить таблицу keysym -> keycode из ответа GetKeyboardMapping.
/// При совпадениях побеждает меньший столбец, затем меньший keycode.
fn build_keymap(
    min_keycode: u8,
    keysyms_per_keycode: u8,
    keysyms: &[u32],
) -> HashMap<Keysym, KeyCode> {
    let per_keycode = keysyms_per_keycode as usize;
    let mut keymap = HashMap::new();
    if per_keycode == 0 {
        return keymap;
    }

    for column in 0..per_keycode {
        for (offset, row) in keysyms.chunks(per_keycode).enumerate() {
            let Some(&keysym) = row.get(column) else {
                continue;
            };
            // NoSymbol
            if keysym == 0 {
                continue;
            }
            keymap
                .entry(Keysym(keysym))
                .or_insert(KeyCode(min_keycode.saturating_add(offset as u8)));
        }
    }
    keymap
}

impl DisplayConnection for X11Connection {
    fn root(&self) -> WindowId {
        self.root
    }

    fn atoms(&self) -> &WatchedAtoms {
        &self.atoms
    }

    fn wait_for_notification(&self) -> Result<Notification> {
        self.conn.flush()?;
        let event = self.conn.wait_for_event()?;

        match event {
            Event::PropertyNotify(ev) => Ok(Notification::PropertyChanged {
                window: WindowId::new(ev.window),
                atom: ev.atom,
            }),
            Event::MappingNotify(ev) if ev.request == Mapping::KEYBOARD => {
                info!("Раскладка клавиатуры изменилась, перечитываем");
                *self.keymap.borrow_mut() = Self::load_keymap(&self.conn)?;
                Ok(Notification::Other)
            }
            Event::Error(err) => {
                debug!("Асинхронная ошибка X11: {:?}", err.error_kind);
                Ok(Notification::Other)
            }
            _ => Ok(Notification::Other),
        }
    }

    fn read_property(
        &self,
        window: WindowId,
        property: Atom,
        expected: PropertyType,
    ) -> Result<Option<PropertyValue>> {
        let type_: Atom = match expected {
            PropertyType::Any => AtomEnum::ANY.into(),
            PropertyType::Window => AtomEnum::WINDOW.into(),
        };

        let reply = self
            .conn
            .get_property(false, window.xid(), property, type_, 0, u32::MAX)?
            .reply()
            .map_err(|e| AutologinError::for_window(window, e))?;

        if reply.type_ == x11rb::NONE {
            return Ok(None);
        }

        Ok(Some(PropertyValue {
            type_: reply.type_,
            format: reply.format,
            value: reply.value,
        }))
    }

    fn subscribe(&self, window: WindowId) -> Result<()> {
        self.set_event_mask(window, EventMask::PROPERTY_CHANGE)
    }

    fn unsubscribe(&self, window: WindowId) -> Result<()> {
        self.set_event_mask(window, EventMask::NO_EVENT)
    }

    fn sync(&self) -> Result<()> {
        self.conn.sync()?;
        Ok(())
    }

    fn keycode_for(&self, keysym: Keysym) -> Option<KeyCode> {
        self.keymap.borrow().get(&keysym).copied()
    }

    fn fake_key(&self, key_code: KeyCode, state: KeyState) -> Result<()> {
        if self.dry_run {
            debug!("[DRY RUN] {:?} {}", state, key_code);
            return Ok(());
        }

        let event_type = match state {
            KeyState::Pressed => xproto::KEY_PRESS_EVENT,
            KeyState::Released => xproto::KEY_RELEASE_EVENT,
        };

        self.conn.xtest_fake_input(
            event_type,
            key_code.value(),
            x11rb::CURRENT_TIME,
            self.root.xid(),
            0,
            0,
            0,
        )?;
        Ok(())
    }
}

impl Drop for X11Connection {
    fn drop(&mut self) {
        info!("Соединение с X-сервером закрывается");
    }
}
