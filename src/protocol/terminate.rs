//! Uncaught-exception handling.
//!
//! Reached only when `throw`/`rethrow` find an empty control-flow stack. The handler writes one
//! diagnostic line to stderr, releases the exception message, and then either terminates the
//! process (primary context) or unwinds the current context to its boundary (any other
//! context). In both cases the thrown code is the resulting exit status.

use std::{env, path::Path};

use crate::{
    context::{self, Diagnostics},
    exception::{Exception, Site},
    protocol,
};

/// Terminates the current context or the whole process with the active exception's code.
#[cold]
pub(crate) fn terminate(site: Site) -> ! {
    let exception = context::with(|ctx| ctx.state.exception().clone());
    let primary = context::is_primary();
    let label = (!primary).then(context::label);

    if let Some(line) = diagnostic_line(
        &program_name(),
        label.as_deref(),
        &exception,
        &site,
        context::config().diagnostics,
    ) {
        eprintln!("{line}");
    }

    protocol::cleanup();

    let code = exception.code;
    match label {
        None => {
            log::debug!("uncaught exception on the primary context, exiting with code {code}");
            std::process::exit(code)
        }
        Some(label) => {
            log::debug!("uncaught exception, ending context {label} with code {code}");
            context::exit(code)
        }
    }
}

/// Formats the uncaught-exception line, or `None` when diagnostics are silenced.
///
/// `context` is the label of a secondary context; the primary context is reported without one.
pub(crate) fn diagnostic_line(
    program: &str,
    context: Option<&str>,
    exception: &Exception,
    site: &Site,
    diagnostics: Diagnostics,
) -> Option<String> {
    let body = match diagnostics {
        Diagnostics::Verbose => format!("{site}: {exception}"),
        Diagnostics::Brief => exception.to_string(),
        Diagnostics::Silent => return None,
    };

    Some(match context {
        Some(context) => format!("{program}: thread {context}: {body}"),
        None => format!("{program}: {body}"),
    })
}

fn program_name() -> String {
    env::args_os()
        .next()
        .as_deref()
        .and_then(|arg0| Path::new(arg0).file_name())
        .map_or_else(
            || env!("CARGO_PKG_NAME").to_string(),
            |name| name.to_string_lossy().into_owned(),
        )
}
