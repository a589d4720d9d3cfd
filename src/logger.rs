use std::sync::atomic::{AtomicBool, Ordering};

static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

pub fn set_debug(enabled: bool) {
    DEBUG_ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn is_debug_enabled() -> bool {
    DEBUG_ENABLED.load(Ordering::Relaxed)
}

pub fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        println!("{} - INFO - {}", $crate::logger::timestamp(), format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        println!("{} - WARNING - {}", $crate::logger::timestamp(), format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        eprintln!("{} - ERROR - {}", $crate::logger::timestamp(), format!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_println {
    ($($arg:tt)*) => {
        if $crate::logger::is_debug_enabled() {
            println!("{} - DEBUG - {}", $crate::logger::timestamp(), format!($($arg)*));
        }
    };
}
