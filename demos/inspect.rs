use std::io::Read;

use certview::output::ParseOutput;
use tracing_subscriber::EnvFilter;

/// Prints the canonical dump of a certificate or CSR.
///
/// Usage: `cargo run --example inspect -- [--json] [FILE]`; reads stdin when no
/// file is given. Set `RUST_LOG=certview=debug` to trace the pipeline.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut json = false;
    let mut path = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            _ => path = Some(arg),
        }
    }

    let input = match path {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let result = certview::parse(&input);
    if json {
        println!("{}", ParseOutput::from(result).to_json_pretty()?);
        return Ok(());
    }

    let parsed = result?;
    println!("{}", parsed.raw_output);
    println!();
    println!("SHA1 Fingerprint={}", parsed.fingerprints.sha1);
    println!("SHA256 Fingerprint={}", parsed.fingerprints.sha256);
    print!("{}", parsed.to_pem());
    Ok(())
}
