//! qualname-inspect
//!
//! Usage: `qualname-inspect <config.yaml> <envelope.json>`
//! - Strict config load (filter pattern)
//! - Decode the envelope and report the invocation it carries
//! - Report whether the configured filter admits its constructor and, for
//!   `qualname.builtins` targets, whether it builds

use std::fs;
use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use qualname_core::error::{QualnameError, Result};
use qualname_core::protocol::{Envelope, InvocationSpec};
use qualname_transform::{builtins, config, FilterGuard, ModuleRegistry, Runtime};

fn main() -> ExitCode {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.code().as_str(), "{e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let mut argv = std::env::args().skip(1);
    let (cfg_path, envelope_path) = match (argv.next(), argv.next()) {
        (Some(c), Some(e)) => (c, e),
        _ => {
            return Err(QualnameError::Config(
                "usage: qualname-inspect <config.yaml> <envelope.json>".into(),
            ))
        }
    };

    let cfg = config::load_from_file(&cfg_path)?;
    let raw = fs::read_to_string(&envelope_path)
        .map_err(|e| QualnameError::Config(format!("read envelope failed: {e}")))?;
    let envelope = Envelope::from_json(&raw)?;
    let spec = InvocationSpec::decode(&envelope)?;

    let modules = Arc::new(ModuleRegistry::new());
    builtins::register(&modules);
    let runtime = Runtime::new(cfg, modules, None)?;

    let allowed = {
        let _scope = FilterGuard::activate(runtime.filter().clone());
        FilterGuard::check(spec.constructor()).is_ok()
    };

    let built = if spec.constructor().starts_with(builtins::BUILTINS_MODULE) {
        Some(runtime.expand_envelope(&envelope).map(|t| t.label().to_string()))
    } else {
        None
    };

    let summary = serde_json::json!({
        "identifier": envelope.identifier,
        "constructor": spec.constructor(),
        "args": spec.args().iter().map(|v| format!("{v:?}")).collect::<Vec<_>>(),
        "kwargs": spec.kwargs().iter().map(|(k, v)| (k.clone(), format!("{v:?}"))).collect::<std::collections::BTreeMap<_, _>>(),
        "config_version": runtime.cfg().version,
        "filter": runtime.filter().to_string(),
        "allowed": allowed,
        "built": built.as_ref().map(|r| match r {
            Ok(label) => serde_json::json!({ "label": label }),
            Err(e) => serde_json::json!({ "error": e.code().as_str(), "message": e.to_string() }),
        }),
    });
    tracing::info!(constructor = %spec.constructor(), allowed, "inspected envelope");
    println!("{summary:#}");
    Ok(())
}
