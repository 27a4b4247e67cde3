/// Throws an exception code with an optional formatted message.
///
/// The message arguments follow [`format!`]. The code must not be `0`. The throw site (file,
/// line and enclosing function) is recorded for the uncaught-exception diagnostic.
///
/// ```rust
/// use trycatch::{throw, Try};
///
/// let code = Try::new(|| -> i32 { throw!(4, "{} of {} failed", 3, 7) })
///     .catch(4, |ex| {
///         assert_eq!(ex.message(), Some("3 of 7 failed"));
///         ex.code
///     })
///     .run();
/// assert_eq!(code, 4);
/// ```
#[macro_export]
macro_rules! throw {
    ($code:expr $(,)?) => {
        $crate::protocol::throw_at($code, ::core::option::Option::None, $crate::site!())
    };
    ($code:expr, $($arg:tt)+) => {
        $crate::protocol::throw_at(
            $code,
            ::core::option::Option::Some(::std::format!($($arg)+)),
            $crate::site!(),
        )
    };
}

/// Propagates the recorded exception to the next enclosing try block.
///
/// ```rust
/// use trycatch::{rethrow, throw, Try};
///
/// let outer = Try::new(|| {
///     Try::new(|| -> u8 { throw!(3, "a") })
///         .catch(3, |_| rethrow!())
///         .run()
/// })
/// .catch(3, |ex| ex.code as u8)
/// .run();
/// assert_eq!(outer, 3);
/// ```
#[macro_export]
macro_rules! rethrow {
    () => {
        $crate::protocol::rethrow_at($crate::site!())
    };
}

/// Captures the current [`Site`](crate::exception::Site): file, line and enclosing function.
#[macro_export]
macro_rules! site {
    () => {
        $crate::exception::Site::new(
            ::core::file!(),
            ::core::line!(),
            ::core::option::Option::Some($crate::function_name!()),
        )
    };
}

/// Name of the enclosing function, without its module path.
///
/// Inside a closure this is the function that defines the closure.
///
/// ```rust
/// fn load_index() -> &'static str {
///     trycatch::function_name!()
/// }
/// assert_eq!(load_index(), "load_index");
/// ```
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __here() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::core::any::type_name::<T>()
        }
        let name = __type_name_of(__here);
        let name = name.strip_suffix("::__here").unwrap_or(name);
        let name = name.trim_end_matches("::{{closure}}");
        match name.rfind("::") {
            ::core::option::Option::Some(pos) => &name[pos + 2..],
            ::core::option::Option::None => name,
        }
    }};
}
