//! Caller attribution
//!
//! Call sites are identified by the `#[track_caller]` location threaded
//! through every logging entry point, plus the enclosing function name the
//! `log_*!` macros capture at the call site with
//! [`function_name!`](crate::function_name).

use std::panic::Location;

use applog_core_types::schema::NO_CALLER;

/// Format a call site as `function@file:line`.
///
/// Returns `<nocaller>` unless both the function and the location are known.
pub fn format_caller(function: Option<&str>, location: Option<&Location<'_>>) -> String {
    let (Some(function), Some(location)) = (function, location) else {
        return NO_CALLER.to_string();
    };
    format!(
        "{}@{}:{}",
        short_function_name(function),
        file_base_name(location.file()),
        location.line()
    )
}

/// Last segment of a qualified function path.
///
/// Both `.` and `::` delimit segments; a path without delimiters is returned
/// unchanged.
pub fn short_function_name(path: &str) -> &str {
    let after_colons = path.rfind("::").map(|i| i + 2);
    let after_dot = path.rfind('.').map(|i| i + 1);
    match after_colons.max(after_dot) {
        Some(start) => &path[start..],
        None => path,
    }
}

/// File name without its directories
pub fn file_base_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Trim a source path to its last directory and file name, e.g. `src/lib.rs:12`
pub fn short_caller(location: &Location<'_>) -> String {
    let path = location.file();
    let mut separators = path.rmatch_indices(['/', '\\']);
    let trimmed = match (separators.next(), separators.next()) {
        (Some(_), Some((idx, _))) => &path[idx + 1..],
        _ => path,
    };
    format!("{}:{}", trimmed, location.line())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_short_function_name() {
        assert_eq!(short_function_name("pkg.Type.Method"), "Method");
        assert_eq!(short_function_name("already_bare"), "already_bare");
        assert_eq!(short_function_name("applog_core::enhancer::handle"), "handle");
    }

    #[test]
    fn test_file_base_name() {
        assert_eq!(file_base_name("crates/app/src/handler.rs"), "handler.rs");
        assert_eq!(file_base_name("C:\\src\\main.rs"), "main.rs");
        assert_eq!(file_base_name("main.rs"), "main.rs");
    }

    #[test]
    fn test_format_caller_without_location() {
        assert_eq!(format_caller(Some("a::b"), None), "<nocaller>");
        assert_eq!(format_caller(None, None), "<nocaller>");
    }

    #[test]
    fn test_format_caller_with_location() {
        let location = Location::caller();
        let formatted = format_caller(Some("applog_core::caller::tests::here"), Some(location));
        assert_eq!(formatted, format!("here@caller.rs:{}", location.line()));
    }

    #[test]
    fn test_format_caller_without_function() {
        let location = Location::caller();
        assert_eq!(format_caller(None, Some(location)), "<nocaller>");
    }

    #[test]
    fn test_short_caller_keeps_parent_directory() {
        let location = Location::caller();
        assert_eq!(
            short_caller(location),
            format!("src/caller.rs:{}", location.line())
        );
    }

    proptest! {
        #[test]
        fn prop_bare_names_unchanged(name in "[A-Za-z_][A-Za-z0-9_]{0,24}") {
            prop_assert_eq!(short_function_name(&name), name.as_str());
        }

        #[test]
        fn prop_shortened_name_has_no_delimiters(
            segments in proptest::collection::vec("[a-z_]{1,8}", 1..5)
        ) {
            let path = segments.join(".");
            let short = short_function_name(&path);
            prop_assert!(!short.contains('.'));
            prop_assert_eq!(short, segments.last().unwrap().as_str());
        }
    }
}
