use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use colored::Colorize;
use hb_crypto::{timed_digest, DigestAlgorithm};
use hb_protocol::encode_digest;
use hb_server::{HbServer, ServerConfig};

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args).await,
        Command::Digest(args) => cmd_digest(args),
    }
}

async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = serve_config(&args)?;
    config.store.validate()?;
    tracing::debug!(?config, "resolved configuration");

    println!(
        "{} Hashbank on {} ({} workers, {} settle, {})",
        "✓".green().bold(),
        config.bind_addr.to_string().bold(),
        config.store.pool_size,
        format!("{}ms", config.store.settle_delay_ms).cyan(),
        config.store.algorithm.to_string().yellow(),
    );

    let server = HbServer::new(config)?;
    let store = Arc::clone(server.store());
    server.serve().await?;

    let stats = store.stats();
    println!(
        "{} Stopped after {} hashes (average {}µs)",
        "✓".green().bold(),
        stats.count.to_string().bold(),
        stats.average_micros(),
    );
    Ok(())
}

/// Config file first, then command-line overrides.
fn serve_config(args: &ServeArgs) -> anyhow::Result<ServerConfig> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(size) = args.pool_size {
        config.store.pool_size = size;
    }
    if let Some(capacity) = args.queue_capacity {
        config.store.queue_capacity = capacity;
    }
    if let Some(ms) = args.settle_ms {
        config.store.settle_delay_ms = ms;
    }
    if let Some(algorithm) = args.algorithm {
        config.store.algorithm = algorithm;
    }
    Ok(config)
}

fn cmd_digest(args: DigestArgs) -> anyhow::Result<()> {
    let algorithm: DigestAlgorithm = args.algorithm;
    let (digest, latency) = timed_digest(&algorithm, args.payload.as_bytes());

    match args.format {
        OutputFormat::Json => {
            let out = digest_json(algorithm, &digest, latency);
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            println!("{} {}", "algorithm:".bold(), algorithm.to_string().yellow());
            println!("{} {}", "hex:".bold(), hex::encode(&digest).cyan());
            println!("{} {}", "base64:".bold(), encode_digest(&digest));
            println!("{} {}µs", "latency:".bold(), latency.as_micros());
        }
    }
    Ok(())
}

fn digest_json(algorithm: DigestAlgorithm, digest: &[u8], latency: Duration) -> serde_json::Value {
    serde_json::json!({
        "algorithm": algorithm.name(),
        "hex": hex::encode(digest),
        "base64": encode_digest(digest),
        "latency_us": u64::try_from(latency.as_micros()).unwrap_or(u64::MAX),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use hb_crypto::Digester;
    use std::io::Write;

    fn serve_args(argv: &[&str]) -> ServeArgs {
        let mut full = vec!["hashbank", "serve"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Command::Serve(args) => args,
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn serve_config_defaults() {
        let config = serve_config(&serve_args(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "bind_addr = \"0.0.0.0:9000\"\n[store]\npool_size = 3\nsettle_delay_ms = 50").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config = serve_config(&serve_args(&["-c", path.as_str(), "--settle-ms", "7"])).unwrap();
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.store.pool_size, 3);
        assert_eq!(config.store.settle_delay_ms, 7);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        assert!(serve_config(&serve_args(&["-c", "/no/such/hashbank.toml"])).is_err());
    }

    #[test]
    fn digest_json_fields() {
        let digest = DigestAlgorithm::Sha256.digest(b"abc");
        let out = digest_json(DigestAlgorithm::Sha256, &digest, Duration::from_micros(42));
        assert_eq!(out["algorithm"], "sha256");
        assert_eq!(
            out["hex"],
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(out["latency_us"], 42);
    }

    #[test]
    fn digest_json_saturates_huge_latency() {
        let out = digest_json(DigestAlgorithm::Blake3, b"", Duration::MAX);
        assert_eq!(out["latency_us"], u64::MAX);
    }

    #[test]
    fn digest_command_runs() {
        for format in ["text", "json"] {
            let cli = Cli::try_parse_from(["hashbank", "digest", "abc123", "--format", format]).unwrap();
            match cli.command {
                Command::Digest(args) => cmd_digest(args).unwrap(),
                _ => panic!("wrong command"),
            }
        }
    }
}
