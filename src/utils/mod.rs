pub mod session_env;

// ✅ Макрос условного логирования для горячего пути (по событию на клавишу)
#[macro_export]
macro_rules! debug_if_enabled {
    ($($arg:tt)*) => {
        if tracing::enabled!(tracing::Level::DEBUG) {
            tracing::debug!($($arg)*);
        }
    };
}
