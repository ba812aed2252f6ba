// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! dlcapture CLI - operator side of a capture
//!
//! Reads the `lastRequest` record from the JSON-file store a capturing
//! process writes to, and turns it into what the downloader needs.

use std::env;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use dlcapture::capture::now_millis;
use dlcapture::handoff::{both_text, headers_json};
use dlcapture::{
    CaptureConfig, CaptureNotifier, CaptureRecord, CaptureSummary, Error, ErrorContext,
    FileStore, HandoffBundle, LatestCapture, Replayer,
};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("dlcapture=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    let config = match CaptureConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(1);
        }
    };

    match args[1].as_str() {
        "show" => show(&config).await,
        "headers" => print_with(&config, headers_json).await,
        "export" => print_with(&config, |r| HandoffBundle::from(r).encode()).await,
        "both" => print_with(&config, |r| Ok(both_text(r))).await,
        "clear" => clear(&config).await,
        "replay" => {
            if args.len() < 3 {
                eprintln!("Usage: dlcapture replay <output> [blob]");
                return ExitCode::from(1);
            }
            replay(&config, &args[2], args.get(3).map(String::as_str)).await
        }
        "--help" | "-h" | "help" => {
            print_usage();
            ExitCode::SUCCESS
        }
        "--version" | "-v" | "version" => {
            println!("dlcapture {}", dlcapture::VERSION);
            ExitCode::SUCCESS
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"dlcapture - Download Request Capture

USAGE:
    dlcapture <COMMAND> [OPTIONS]

COMMANDS:
    show                    Show the last captured request
    headers                 Print captured headers as JSON
    export                  Print the base64 hand-off blob for the downloader
    both                    Print cookie and POST data together
    clear                   Forget the last captured request
    replay <output> [blob]  Re-send the capture (or a pasted blob) and save the response
    help                    Show this help message
    version                 Show version information

ENVIRONMENT:
    DLCAPTURE_STORE          Store file (default: dlcapture-store.json)
    DLCAPTURE_URL_PATTERN    Endpoint; also the replay target for a pasted blob
    RUST_LOG                 Log filter
"#
    );
}

fn latest(config: &CaptureConfig) -> LatestCapture {
    let store = Arc::new(FileStore::new(&config.store_path));
    LatestCapture::new(store, CaptureNotifier::default())
}

async fn load(config: &CaptureConfig) -> Result<CaptureRecord, Error> {
    latest(config).read().await?.ok_or(Error::NothingCaptured)
}

async fn show(config: &CaptureConfig) -> ExitCode {
    let record = match load(config).await {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(1);
        }
    };

    if !record.is_ready() {
        println!("[!] Capture is incomplete (missing cookie or payload)");
    }

    println!("=== Captured Request ===");
    println!("URL: {}", record.url);
    println!("\nCookie:\n  {}", record.cookie);
    println!("\nPOST Data:\n  {}", record.payload);

    println!("\nHeaders ({}):", record.headers.len());
    if record.headers.is_empty() {
        println!("  (none captured)");
    } else {
        let mut names: Vec<&String> = record.headers.keys().collect();
        names.sort();
        for name in names {
            println!("  {}: {}", name, record.headers[name]);
        }
    }

    let summary = CaptureSummary::new(&record, now_millis());
    println!("\n=== Debug ===");
    println!("Payload length: {} chars", summary.payload_len);
    println!("Cookie count: {}", summary.cookie_count);
    println!("Headers count: {}", summary.header_count);
    println!("Captured {}s ago", summary.age_secs);

    ExitCode::SUCCESS
}

async fn print_with<F>(config: &CaptureConfig, render: F) -> ExitCode
where
    F: FnOnce(&CaptureRecord) -> Result<String, Error>,
{
    match load(config).await.and_then(|r| render(&r)) {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::from(1)
        }
    }
}

async fn clear(config: &CaptureConfig) -> ExitCode {
    match latest(config).clear().await {
        Ok(()) => {
            println!("Cleared last capture");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to clear: {}", e);
            ExitCode::from(1)
        }
    }
}

fn blob_target(config: &CaptureConfig, blob: &str) -> Result<(String, HandoffBundle), Error> {
    let url = config
        .url_pattern
        .to_url()
        .context("set DLCAPTURE_URL_PATTERN to a concrete URL to replay a blob")?;
    Ok((url.to_string(), HandoffBundle::decode(blob)?))
}

async fn replay(config: &CaptureConfig, output: &str, blob: Option<&str>) -> ExitCode {
    let (url, bundle) = match blob {
        // A blob carries no URL, so replay against the configured endpoint
        Some(blob) => match blob_target(config, blob) {
            Ok(target) => target,
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::from(1);
            }
        },
        None => match load(config).await {
            Ok(record) => (record.url.clone(), HandoffBundle::from(&record)),
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::from(1);
            }
        },
    };

    let replayer = match Replayer::new(Duration::from_secs(300)) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Failed to create HTTP client: {}", e);
            return ExitCode::from(1);
        }
    };

    match replayer.replay_to_file(&url, &bundle, Path::new(output)).await {
        Ok(outcome) => {
            println!("[OK] {} bytes written to {}", outcome.bytes_written, output);
            if let Some(name) = outcome.suggested_name {
                println!("Server file name: {}", name);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Replay failed: {}", e);
            ExitCode::from(2)
        }
    }
}
