//! Call-site macros.
//!
//! Every macro captures `file!()`, `line!()` and the enclosing function, and
//! completes its record at the end of the statement. Levels are written as
//! bare identifiers: `DEBUG`, `INFO`, `WARNING`, `FATAL`.
//!
//! ```ignore
//! log!(INFO, "connected to {peer}");
//! log!(WARNING).append("retry ").append(attempt);
//! logf!(DEBUG, "%s took %.2f ms", name, ms);
//! check!(queue.len() < limit, "queue overflow: {}", queue.len());
//! ```

/// Path of the enclosing function, as a `&'static str`.
#[doc(hidden)]
#[macro_export]
macro_rules! function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        name.strip_suffix("::f").unwrap_or(name)
    }};
}

/// Log a record at a level.
///
/// `log!(LEVEL)` yields the [`LogMessage`](crate::LogMessage) for streaming
/// with `append`; it completes when the temporary is dropped at the end of
/// the statement. `log!(LEVEL, fmt, args..)` takes `format!` syntax.
#[macro_export]
macro_rules! log {
    ($lvl:ident) => {
        $crate::LogMessage::new(
            ::std::file!(),
            ::std::line!(),
            $crate::function_name!(),
            $crate::Level::$lvl,
        )
    };
    ($lvl:ident, $($arg:tt)+) => {{
        $crate::log!($lvl).append_args(::std::format_args!($($arg)+));
    }};
}

/// Log a record only when `cond` holds.
#[macro_export]
macro_rules! log_if {
    ($lvl:ident, $cond:expr) => {
        if $cond {
            ::std::mem::drop($crate::log!($lvl));
        }
    };
    ($lvl:ident, $cond:expr, $($arg:tt)+) => {
        if $cond {
            $crate::log!($lvl, $($arg)+);
        }
    };
}

/// Log a record with a printf-style format checked at run time.
#[macro_export]
macro_rules! logf {
    ($lvl:ident, $fmt:expr $(, $arg:expr)* $(,)?) => {{
        $crate::log!($lvl).message_save($fmt, &[$($crate::FmtArg::from($arg)),*]);
    }};
}

/// Printf-style [`logf!`] only when `cond` holds.
#[macro_export]
macro_rules! logf_if {
    ($lvl:ident, $cond:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        if $cond {
            $crate::logf!($lvl, $fmt $(, $arg)*);
        }
    };
}

/// Contract check: a false condition is a fatal event naming the condition.
///
/// An optional message in `format!` syntax is attached to the record.
#[macro_export]
macro_rules! check {
    ($cond:expr) => {
        if !($cond) {
            ::std::mem::drop($crate::LogMessage::contract(
                ::std::file!(),
                ::std::line!(),
                $crate::function_name!(),
                ::std::stringify!($cond),
            ));
        }
    };
    ($cond:expr, $($arg:tt)+) => {
        if !($cond) {
            $crate::LogMessage::contract(
                ::std::file!(),
                ::std::line!(),
                $crate::function_name!(),
                ::std::stringify!($cond),
            )
            .append_args(::std::format_args!($($arg)+));
        }
    };
}

/// Contract check with a printf-style message.
#[macro_export]
macro_rules! check_f {
    ($cond:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        if !($cond) {
            $crate::LogMessage::contract(
                ::std::file!(),
                ::std::line!(),
                $crate::function_name!(),
                ::std::stringify!($cond),
            )
            .message_save($fmt, &[$($crate::FmtArg::from($arg)),*]);
        }
    };
}
