//! Logging macros for the shared logger
//!
//! Each macro captures the call site (file name, enclosing function, line)
//! and takes `format!`-style arguments.

/// Name of the enclosing function, without its module path.
#[doc(hidden)]
#[macro_export]
macro_rules! __function_name {
    () => {{
        fn f() {}
        let name = ::std::any::type_name_of_val(&f);
        let name = name.strip_suffix("::f").unwrap_or(name);
        let name = name.trim_end_matches("::{{closure}}");
        name.rsplit("::").next().unwrap_or(name)
    }};
}

/// Final path component of a source file path.
#[doc(hidden)]
#[must_use]
pub fn __file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// The current source location as a [`Location`](crate::Location).
#[macro_export]
macro_rules! location {
    () => {
        $crate::Location::new(
            $crate::macros::__file_name(file!()),
            $crate::__function_name!(),
            line!(),
        )
    };
}

/// Logs a `DEBUG` line.
///
/// ```no_run
/// logman::init_default().unwrap();
/// logman::log_debug!("debug message: {} {}", "stderr message", 12535);
/// ```
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)+) => {
        $crate::global::__log($crate::Level::Debug, &$crate::location!(), format_args!($($arg)+))
    };
}

/// Logs an `INFO` line.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)+) => {
        $crate::global::__log($crate::Level::Info, &$crate::location!(), format_args!($($arg)+))
    };
}

/// Logs a `WARNING` line.
#[macro_export]
macro_rules! log_warning {
    ($($arg:tt)+) => {
        $crate::global::__log($crate::Level::Warning, &$crate::location!(), format_args!($($arg)+))
    };
}

/// Logs an `ERROR` line.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)+) => {
        $crate::global::__log($crate::Level::Error, &$crate::location!(), format_args!($($arg)+))
    };
}

/// Logs an `ERROR` line followed by the current call stack.
#[macro_export]
macro_rules! log_error_backtrace {
    ($($arg:tt)+) => {
        $crate::global::__log_with_backtrace(
            $crate::Level::Error,
            &$crate::location!(),
            format_args!($($arg)+),
        )
    };
}

/// Logs a `PANIC` line and the call stack, tears the logger down and exits
/// the process with status 1.
#[macro_export]
macro_rules! log_panic {
    ($($arg:tt)+) => {
        $crate::global::__panic(&$crate::location!(), format_args!($($arg)+))
    };
}
