use std::io::Read;
use std::path::Path;

use anyhow::Context;
use herald_engine::{Router, finalize};
use serde_json::Value;

use crate::cli::ClassifyArgs;

/// Handle `herald classify`.
pub fn handle(args: &ClassifyArgs, router: &Router) -> anyhow::Result<()> {
    let body = read_input(args.input.as_deref())?;
    println!("{}", render(args, router, &body)?);
    Ok(())
}

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut body = String::new();
            std::io::stdin()
                .read_to_string(&mut body)
                .context("failed to read payload from stdin")?;
            Ok(body)
        }
    }
}

/// Output for one payload. A malformed payload still renders, as a
/// suppressed result, except in `--stats` mode which needs the JSON.
fn render(args: &ClassifyArgs, router: &Router, body: &str) -> anyhow::Result<String> {
    if args.stats {
        let payload: Value = serde_json::from_str(body).context("payload is not JSON")?;
        return Ok(serde_json::to_string_pretty(&router.stats(&payload))?);
    }

    let result = router.dispatch_str(body);
    if args.finalize {
        return Ok(finalize(&result));
    }
    Ok(serde_json::to_string_pretty(&result)?)
}
