use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use formats::GeoJsonDocument;
use layers::{MapBundle, MapViewConfig};
use projection::{Reprojector, registry};
use streaming::{Assembler, ChatSession, HttpTransport};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

use config::{Settings, timeout_from_secs};

#[derive(Parser, Debug)]
#[command(author, version, about = "Reproject GeoJSON for a map view and chat with the map assistant")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reproject a GeoJSON FeatureCollection
    Reproject {
        /// Input GeoJSON file
        input: PathBuf,

        /// Source SRS identifier (env: SRS_FROM)
        #[arg(long)]
        from: Option<String>,

        /// Target SRS identifier (env: SRS_TO)
        #[arg(long)]
        to: Option<String>,

        /// Output file (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Emit the full map bundle (view, source, layer) instead of the document
        #[arg(long)]
        bundle: bool,

        /// Center the bundle view on the data instead of the default center
        #[arg(long, requires = "bundle")]
        fit: bool,
    },

    /// Interactive chat against the streaming endpoint
    Chat {
        /// Chat endpoint URL (env: CHAT_ENDPOINT)
        #[arg(long)]
        endpoint: Option<String>,

        /// Request timeout in seconds, 0 for none (env: CHAT_TIMEOUT_SECS)
        #[arg(long)]
        timeout_secs: Option<u64>,
    },

    /// List registered spatial reference systems
    Srs,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let settings = Settings::from_env();

    match args.command {
        Command::Reproject {
            input,
            from,
            to,
            out,
            bundle,
            fit,
        } => {
            let from = from.unwrap_or(settings.srs_from.clone());
            let to = to.unwrap_or(settings.srs_to.clone());
            let output = reproject_file(&input, &from, &to, bundle.then_some(fit), &settings)?;
            match out {
                Some(path) => {
                    std::fs::write(&path, output)
                        .with_context(|| format!("writing {}", path.display()))?;
                    info!("wrote {}", path.display());
                }
                None => println!("{output}"),
            }
        }
        Command::Chat {
            endpoint,
            timeout_secs,
        } => {
            let endpoint = endpoint.unwrap_or(settings.chat_endpoint.clone());
            let timeout = match timeout_secs {
                Some(secs) => timeout_from_secs(secs),
                None => settings.chat_timeout,
            };
            run_chat(endpoint, timeout).await?;
        }
        Command::Srs => {
            for (id, definition) in registry::global().iter() {
                println!("{id}\t{definition}");
            }
        }
    }
    Ok(())
}

/// `bundle` is `None` for a bare document, `Some(fit)` for a map bundle.
fn reproject_file(
    input: &Path,
    from: &str,
    to: &str,
    bundle: Option<bool>,
    settings: &Settings,
) -> Result<String> {
    let payload = std::fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;
    let document = GeoJsonDocument::from_geojson_str(&payload)
        .with_context(|| format!("parsing {}", input.display()))?;
    let reprojector = Reprojector::from_global(from, to)?;
    let document = document
        .reprojected(&reprojector)
        .with_context(|| format!("reprojecting {from} -> {to}"))?;
    info!(
        features = document.feature_count(),
        from, to, "reprojected {}", input.display()
    );

    let Some(fit) = bundle else {
        return Ok(document.to_geojson_string_pretty()?);
    };

    let mut view = MapViewConfig::default().with_style_url(settings.style_url.clone());
    if fit && let Some(bounds) = document.bounds()? {
        view = view.centered_on(&bounds);
    }
    let map = MapBundle::for_document(view, &document);
    map.validate()?;
    Ok(map.to_json_string_pretty()?)
}

async fn run_chat(endpoint: String, timeout: Option<Duration>) -> Result<()> {
    let transport = match timeout {
        Some(timeout) => HttpTransport::with_timeout(endpoint, timeout)
            .context("building HTTP client")?,
        None => HttpTransport::new(endpoint),
    };
    info!(endpoint = transport.endpoint(), ?timeout, "chat session started");
    let mut assembler = Assembler::new(transport);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt()?;
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        let line = line.trim();
        if line == "/quit" {
            break;
        }
        if line.is_empty() {
            prompt()?;
            continue;
        }

        let mut printer = ReplyPrinter::default();
        assembler.submit_with(line, |s| printer.update(s)).await;
        printer.finish(assembler.session())?;
        prompt()?;
    }
    info!(
        messages = assembler.session().conversation().len(),
        "chat session ended"
    );
    Ok(())
}

fn prompt() -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    write!(stdout, "> ")?;
    stdout.flush()?;
    Ok(())
}

/// Prints the streamed reply as it grows, without repeating text.
#[derive(Default)]
struct ReplyPrinter {
    printed: usize,
    error: Option<std::io::Error>,
}

impl ReplyPrinter {
    fn update(&mut self, session: &ChatSession) {
        if self.error.is_some() {
            return;
        }
        let Some(reply) = session.current_response() else {
            return;
        };
        let text = reply.text();
        if text.len() > self.printed {
            let mut stdout = std::io::stdout().lock();
            let res = stdout
                .write_all(text[self.printed..].as_bytes())
                .and_then(|_| stdout.flush());
            self.printed = text.len();
            if let Err(e) = res {
                self.error = Some(e);
            }
        }
    }

    fn finish(self, session: &ChatSession) -> Result<()> {
        if let Some(e) = self.error {
            return Err(e).context("writing reply");
        }
        if session.last_failure().is_some() {
            if self.printed > 0 {
                println!();
            }
            match session.messages().last() {
                Some(fallback) => println!("{}", fallback.text()),
                None => bail!("conversation lost its fallback message"),
            }
        } else {
            println!();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::reproject_file;
    use crate::config::Settings;

    fn sample() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/input.geojson")
    }

    fn settings() -> Settings {
        Settings {
            chat_endpoint: String::new(),
            chat_timeout: None,
            srs_from: "EPSG:6668".into(),
            srs_to: "EPSG:4326".into(),
            style_url: "https://example.test/style.json".into(),
        }
    }

    #[test]
    fn reprojects_sample_document() {
        let out = reproject_file(&sample(), "EPSG:6668", "EPSG:4326", None, &settings())
            .expect("reproject");
        let value: serde_json::Value = serde_json::from_str(&out).expect("json");
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["features"].as_array().map(Vec::len), Some(4));
    }

    #[test]
    fn bundle_uses_configured_style() {
        let out = reproject_file(&sample(), "EPSG:6668", "EPSG:4326", Some(false), &settings())
            .expect("bundle");
        let value: serde_json::Value = serde_json::from_str(&out).expect("json");
        assert_eq!(value["view"]["styleUrl"], "https://example.test/style.json");
        assert_eq!(value["sources"][0]["id"], "test");
        assert_eq!(value["layers"][0]["id"], "test-layer");
    }

    #[test]
    fn fitted_bundle_centers_on_data() {
        let out = reproject_file(&sample(), "EPSG:6668", "EPSG:4326", Some(true), &settings())
            .expect("bundle");
        let value: serde_json::Value = serde_json::from_str(&out).expect("json");
        let lon = value["view"]["center"][0].as_f64().expect("lon");
        let lat = value["view"]["center"][1].as_f64().expect("lat");
        assert!((136.19..136.26).contains(&lon), "lon {lon}");
        assert!((36.05..36.08).contains(&lat), "lat {lat}");
    }

    #[test]
    fn unknown_srs_is_reported() {
        let err = reproject_file(&sample(), "EPSG:9999", "EPSG:4326", None, &settings())
            .expect_err("unknown srs");
        assert!(err.to_string().contains("EPSG:9999"), "{err}");
    }
}
