mod cli;

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;

use cli::{Cli, Commands};
use statesnap::assemble::{CaptureOptions, FrameCapture, SnapshotAssembler};
use statesnap::config::Config;
use statesnap::model::{CookieModel, Snapshot};
use statesnap::net::FetchInit;
use statesnap::replay::{self, Matcher, MISS_BODY, MISS_STATUS};
use statesnap::util::{self, json};
use statesnap::{loader, PageContext};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    util::init_data_dir(cli.data_dir.clone());

    // Initialize logging to file (~/.statesnap/logs/statesnap.log)
    fs::create_dir_all(util::logs_dir())?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(util::log_file_path())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .init();

    let config = Config::load();

    match cli.command {
        Commands::Record {
            page_url,
            fetches,
            xhrs,
            beacons,
            local_storage,
            html,
            output,
        } => {
            let mut page = PageContext::live(page_url, &config.http)?;
            for pair in &local_storage {
                let (key, value) = pair
                    .split_once('=')
                    .with_context(|| format!("expected KEY=VALUE, got {pair:?}"))?;
                page.local_storage_mut()
                    .insert(key.to_string(), value.to_string());
            }
            let dom = match html {
                Some(path) => {
                    let contents = fs::read_to_string(&path)
                        .with_context(|| format!("reading {}", path.display()))?;
                    page.set_html(Some(contents));
                    true
                }
                None => false,
            };

            loader::arm(&mut page);
            loader::activate(&mut page);

            for url in &fetches {
                match page.fetch(url.as_str(), FetchInit::default()).await {
                    Ok(response) => println!("fetch {} {url}", response.status),
                    Err(err) => eprintln!("fetch failed {url}: {err}"),
                }
            }
            for url in &xhrs {
                let xhr = page.xhr();
                xhr.open("GET", url);
                xhr.send(None)?;
                xhr.completion().await;
                println!("xhr {} {url}", xhr.status());
            }
            for url in &beacons {
                let queued = page.send_beacon(url, None);
                println!("beacon {} {url}", if queued { "queued" } else { "refused" });
            }

            let capture = page.capture(&CaptureOptions {
                dom,
                ..CaptureOptions::default()
            });
            json::write_json_to_path(&capture, &output)
                .with_context(|| format!("writing {}", output.display()))?;
            println!("recorded {} entries to {}", capture.logs.len(), output.display());
        }

        Commands::Assemble {
            frames,
            url,
            description,
            cookies,
            output,
        } => {
            let captures = frames
                .iter()
                .map(|path| {
                    json::read_json_from_path::<FrameCapture>(path)
                        .with_context(|| format!("reading frame {}", path.display()))
                })
                .collect::<Result<Vec<_>>>()?;
            let cookies: Vec<CookieModel> = match cookies {
                Some(path) => json::read_json_from_path(&path)
                    .with_context(|| format!("reading cookies {}", path.display()))?,
                None => Vec::new(),
            };

            let snapshot = SnapshotAssembler::new(url)
                .description(description)
                .cookies(cookies)
                .frames(captures)
                .assemble();
            snapshot
                .write_json_to_path(&output)
                .with_context(|| format!("writing {}", output.display()))?;
            println!(
                "assembled {} entries into {}",
                snapshot.network_logs.len(),
                output.display()
            );
        }

        Commands::Inspect { snapshot } => {
            let snapshot = load_snapshot(&snapshot)?;
            print_summary(&snapshot);
        }

        Commands::Match {
            snapshot,
            method,
            url,
            body,
            origin,
        } => {
            let snapshot = Arc::new(load_snapshot(&snapshot)?);
            let origin = origin
                .or(config.replay_origin)
                .unwrap_or_else(|| snapshot.url.clone());
            let matcher = Matcher::new(snapshot, Some(replay::resolve_origin(&origin)?));
            match matcher.find(&method, &url, body.as_deref()) {
                Some(entry) => println!("{}", serde_json::to_string_pretty(entry)?),
                None => println!("{MISS_STATUS} {MISS_BODY}"),
            }
        }

        Commands::Replay {
            snapshot,
            urls,
            method,
            body,
            origin,
        } => {
            let snapshot = Arc::new(load_snapshot(&snapshot)?);
            let origin = origin.or(config.replay_origin);
            let mut page = PageContext::live(snapshot.url.clone(), &config.http)?;
            let session = replay::install(&mut page, snapshot, origin.as_deref())?;

            for url in &urls {
                let mut init = FetchInit::method(method.as_str());
                if let Some(body) = &body {
                    init = init.with_body(body.as_str());
                }
                let response = page.fetch(url.as_str(), init).await?;
                println!("{} {url} {}", response.status, response.text());
            }
            eprintln!("hits: {} misses: {}", session.hits(), session.misses());
        }
    }

    Ok(())
}

fn load_snapshot(path: &Path) -> Result<Snapshot> {
    if !path.exists() {
        bail!("snapshot not found: {}", path.display());
    }
    Snapshot::read_json_from_path(path).with_context(|| format!("reading {}", path.display()))
}

fn print_summary(snapshot: &Snapshot) {
    let taken = chrono::DateTime::from_timestamp_millis(snapshot.timestamp)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| snapshot.timestamp.to_string());

    println!("url: {}", snapshot.url);
    println!("taken: {taken}");
    if let Some(description) = &snapshot.description {
        println!("description: {description}");
    }
    println!("cookies: {}", snapshot.cookies.len());
    println!("localStorage: {}", snapshot.local_storage.len());
    println!("sessionStorage: {}", snapshot.session_storage.len());
    println!("dom: {}", if snapshot.html.is_some() { "yes" } else { "no" });
    println!("entries: {}", snapshot.network_logs.len());
    for entry in &snapshot.network_logs {
        let status = entry
            .status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("  {} {} {}", entry.method, status, entry.url);
    }
}
