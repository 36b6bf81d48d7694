use crate::error::Result;
use crate::events::{Atom, KeyCode, KeyState, Keysym, WatchedProperty, WindowId};

/// Атомы отслеживаемых свойств, интернированные один раз при подключении
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchedAtoms {
    pub net_active_window: Atom,
    pub net_wm_name: Atom,
    pub wm_name: Atom,
    pub utf8_string: Atom,
}

impl WatchedAtoms {
    /// Отнести атом к одному из отслеживаемых свойств
    pub fn classify(&self, atom: Atom) -> Option<WatchedProperty> {
        if atom == self.net_active_window {
            Some(WatchedProperty::ActiveWindow)
        } else if atom == self.net_wm_name || atom == self.wm_name {
            Some(WatchedProperty::Title)
        } else {
            None
        }
    }

    /// Свойства заголовка в порядке предпочтения: сначала UTF-8, затем устаревшее
    pub fn title_properties(&self) -> [Atom; 2] {
        [self.net_wm_name, self.wm_name]
    }
}

/// Ожидаемый тип значения свойства
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyType {
    Any,
    Window,
}

/// Полное значение свойства окна
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyValue {
    pub type_: Atom,
    pub format: u8,
    pub value: Vec<u8>,
}

impl PropertyValue {
    /// Первый 32-битный элемент (для свойств типа WINDOW)
    pub fn first_u32(&self) -> Option<u32> {
        if self.format != 32 {
            return None;
        }
        let bytes: [u8; 4] = self.value.get(..4)?.try_into().ok()?;
        Some(u32::from_ne_bytes(bytes))
    }
}

/// Сырое уведомление от сервера
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    PropertyChanged { window: WindowId, atom: Atom },
    Other,
}

/// Сессия с дисплейным сервером.
///
/// Любой запрос к конкретному окну может завершиться `AutologinError::WindowGone`,
/// если окно исчезло между получением XID и запросом. Вызывающий код обязан
/// трактовать это как "окна нет", а не как фатальную ошибку.
pub trait DisplayConnection {
    fn root(&self) -> WindowId;

    fn atoms(&self) -> &WatchedAtoms;

    /// Блокирующее ожидание следующего уведомления
    fn wait_for_notification(&self) -> Result<Notification>;

    /// Прочитать значение свойства целиком; `None`, если свойство не установлено
    fn read_property(
        &self,
        window: WindowId,
        property: Atom,
        expected: PropertyType,
    ) -> Result<Option<PropertyValue>>;

    /// Подписаться на изменения свойств окна
    fn subscribe(&self, window: WindowId) -> Result<()>;

    /// Отписаться от изменений свойств окна
    fn unsubscribe(&self, window: WindowId) -> Result<()>;

    /// Отправить накопленные запросы и дождаться их обработки сервером
    fn sync(&self) -> Result<()>;

    /// Физический код клавиши для keysym в текущей раскладке
    fn keycode_for(&self, keysym: Keysym) -> Option<KeyCode>;

    /// Вставить одно событие клавиатуры во входной поток сервера
    fn fake_key(&self, key_code: KeyCode, state: KeyState) -> Result<()>;
}

/// Factory function to create the display connection based on the dry_run flag
pub fn create_display(
    display_name: Option<&str>,
    dry_run: bool,
) -> Result<Box<dyn DisplayConnection + Send>> {
    Ok(Box::new(super::x11::X11Connection::connect(
        display_name,
        dry_run,
    )?))
}
