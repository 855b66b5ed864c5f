use buffbucks_core::MintError;
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Structured JSON logs on stderr; stdout is reserved for the result.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "buffbucks_core=info,buffbucks_cli=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr),
        )
        .init();
}

pub fn exit_error(error: &str, message: &str, docs_hint: Option<&str>) -> ! {
    eprintln!("{}", error_body(error, message, docs_hint));
    std::process::exit(4);
}

fn error_body(error: &str, message: &str, docs_hint: Option<&str>) -> String {
    let mut err = json!({
        "error": error,
        "message": message
    });
    if let Some(hint) = docs_hint {
        err["docs_hint"] = json!(hint);
    }
    serde_json::to_string_pretty(&err).unwrap_or_else(|_| err.to_string())
}

/// Print a failed invocation and return its exit code.
///
/// Exit codes: 1=rejected (mismatch, same day, encoding), 3=upstream error,
///             4=usage error
pub fn report_failure(err: &MintError) -> i32 {
    tracing::error!(code = err.code(), "invocation failed");
    eprintln!("{}", error_body(err.code(), &err.to_string(), err.docs_hint()));
    exit_code(err)
}

fn exit_code(err: &MintError) -> i32 {
    match err {
        MintError::MissingCredential | MintError::MalformedArgument { .. } => 4,
        MintError::IdentityFetch(_) | MintError::DayWindowFetch(_) => 3,
        MintError::IdentityMismatch | MintError::SameDayMint { .. } | MintError::Encoding(_) => 1,
    }
}

pub fn print_json(value: &serde_json::Value) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(s) => {
            println!("{s}");
            0
        }
        Err(e) => {
            eprintln!("{}", error_body("cli_error", &e.to_string(), None));
            2
        }
    }
}
