pub mod keyboard;
pub mod window;

pub use keyboard::{KeyCode, KeyCommand, KeyState, KeyStroke, Keysym};
pub use window::{Atom, ChangeEvent, TrackerState, WatchedProperty, WindowId, WindowTitle};
