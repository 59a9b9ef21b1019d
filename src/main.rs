//! toastline 演示 CLI
//!
//! 基于内存 store 调用 toast API，每个 store 变更事件输出为一行 JSON。

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use toastline::{
    MemoryStore, NativeNotice, NativeNotification, PromiseParams, ToastOptions, ToastType, Toaster,
    ToasterConfig,
};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "toastline-demo")]
#[command(about = "Drive the toastline API from the terminal and print store events")]
#[command(version)]
struct Cli {
    /// Config file (default: <config dir>/toastline/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show one toast
    Show {
        /// Toast text
        message: String,
        /// default, success, info, warning (warn) or error
        #[arg(long = "type", short = 't', default_value = "default")]
        toast_type: ToastType,
        /// Explicit toast id
        #[arg(long)]
        id: Option<String>,
        /// Use the dark theme
        #[arg(long)]
        dark: bool,
    },
    /// Follow a simulated job with a promise toast
    Promise {
        /// How long the job runs
        #[arg(long, default_value = "500")]
        delay_ms: u64,
        /// Make the job fail
        #[arg(long)]
        fail: bool,
        /// Skip the loading toast
        #[arg(long)]
        no_pending: bool,
        /// Also send a desktop notification when the job settles
        #[arg(long)]
        native: bool,
        /// Only notify when the user is away (always true without focus info)
        #[arg(long)]
        only_when_inactive: bool,
    },
}

fn build_toaster(config: ToasterConfig, native: bool) -> Result<(Arc<MemoryStore>, Toaster)> {
    let store = Arc::new(MemoryStore::new());
    store.mount_container(config.container.clone());

    let desktop = config.desktop_notifications || native;
    let toaster = Toaster::builder()
        .config(config)
        .desktop_notifications(desktop)
        .store(store.clone())
        .build()?;
    Ok((store, toaster))
}

async fn run_job(delay: Duration, fail: bool) -> Result<serde_json::Value, String> {
    tokio::time::sleep(delay).await;
    if fail {
        Err("simulated failure".to_string())
    } else {
        Ok(serde_json::json!({"items": 3, "elapsedMs": delay.as_millis() as u64}))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // 通过 RUST_LOG 控制日志级别，例如 RUST_LOG=toastline=debug
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("toastline=info,toastline_demo=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(ToasterConfig::default_path);
    let config = ToasterConfig::load_or_default(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    match cli.command {
        Commands::Show {
            message,
            toast_type,
            id,
            dark,
        } => {
            let (store, toaster) = build_toaster(config, false)?;
            let subscription = toaster.on_change(print_event);

            let mut options = ToastOptions::new().with_type(toast_type);
            if let Some(id) = id {
                options = options.with_toast_id(id);
            }
            let id = if dark {
                toaster.dark(message, options)
            } else {
                toaster.show(message, options)
            };
            info!(toast_id = %id, "Toast shown");

            subscription.unsubscribe();
            print_snapshot(&store);
        }
        Commands::Promise {
            delay_ms,
            fail,
            no_pending,
            native,
            only_when_inactive,
        } => {
            let (store, toaster) = build_toaster(config, native)?;
            let subscription = toaster.on_change(print_event);

            let mut params = PromiseParams::new().success("Job finished").error("Job failed");
            if !no_pending {
                params = params.pending("Job running...");
            }
            if native {
                params = params.native(
                    NativeNotification::new()
                        .on_success(NativeNotice::new("Job finished").with_body("The demo job completed."))
                        .on_error(NativeNotice::new("Job failed").with_body("The demo job reported an error."))
                        .only_when_inactive(only_when_inactive),
                );
            }

            let delay = Duration::from_millis(delay_ms);
            let outcome = toaster
                .promise_deferred(move || run_job(delay, fail), params, ToastOptions::new())
                .notified()
                .await;
            match &outcome {
                Ok(value) => info!(value = %value, "Job succeeded"),
                Err(e) => warn!(error = %e, "Job failed"),
            }

            subscription.unsubscribe();
            print_snapshot(&store);
        }
    }

    Ok(())
}

fn print_event(event: &toastline::ChangeEvent) {
    match serde_json::to_string(event) {
        Ok(line) => println!("{}", line),
        Err(e) => warn!(error = %e, "Failed to serialize change event"),
    }
}

fn print_snapshot(store: &MemoryStore) {
    for toast in store.snapshot(None) {
        println!(
            "[{}] {} {}{}",
            toast.toast_type,
            toast.id,
            toast.content,
            if toast.is_loading { " (loading)" } else { "" }
        );
    }
}
