pub mod credentials;
pub mod display;
pub mod input_synthesizer;
pub mod login_dispatcher;
pub mod window_tracker;
pub mod window_watcher;

pub use display::create_display;
pub use login_dispatcher::LoginDispatcher;
