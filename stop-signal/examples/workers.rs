/*
Workers Example

This example starts a small pool of workers that share one stop signal. Each worker
consumes jobs from a shared queue until the signal fires. The signal is triggered
either by Ctrl-C or by the first worker that picks up a "poison" job, whichever
happens first. Triggering twice is harmless, so both paths can call it freely.

Usage:
    cargo run --example workers -- [WORKERS] [POISON_AFTER]

    RUST_LOG=debug cargo run --example workers -- 4 20
*/

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use stop_signal::{StopResult, StopSignal};
use stop_signal_config::shared::StopSignalConfig;
use stop_signal_telemetry::tracing::init_tracing;
use tokio::sync::{Mutex, mpsc};
use tokio::time::sleep;
use tracing::{error, info};

const DEFAULT_WORKERS: usize = 4;
const DEFAULT_POISON_AFTER: u32 = 20;

type JobQueue = Arc<Mutex<mpsc::Receiver<u32>>>;

#[derive(Debug, Parser)]
#[command(name = "workers", about = "Worker pool stopped by a shared stop signal")]
struct AppArgs {
    /// Number of workers sharing the stop signal
    #[arg(default_value_t = DEFAULT_WORKERS)]
    workers: usize,

    /// Job number at which a worker stops every other worker
    #[arg(default_value_t = DEFAULT_POISON_AFTER)]
    poison_after: u32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    if let Err(e) = main_impl().await {
        error!("{e}");
        std::process::exit(1);
    }

    Ok(())
}

async fn main_impl() -> Result<(), Box<dyn Error>> {
    init_tracing("workers=info,stop_signal=info")?;

    let args = AppArgs::parse();
    let workers = args.workers;
    let poison_after = args.poison_after;

    let config = StopSignalConfig {
        name: "workers".to_string(),
        wait_timeout_ms: 5_000,
    };
    let signal = StopSignal::from_config(&config)?;

    let (jobs_tx, jobs_rx) = mpsc::channel(8);
    let jobs: JobQueue = Arc::new(Mutex::new(jobs_rx));

    let handles: Vec<_> = (0..workers)
        .map(|id| tokio::spawn(worker(id, jobs.clone(), signal.clone(), poison_after)))
        .collect();

    tokio::spawn(produce_jobs(jobs_tx, signal.clone()));

    tokio::spawn({
        let signal = signal.clone();
        async move {
            if let StopResult::Ok(Ok(())) = signal.run_until_stopped(tokio::signal::ctrl_c()).await
            {
                info!("ctrl-c received");
                signal.trigger();
            }
        }
    });

    // Waiting is bounded so a stuck producer cannot keep the process alive forever.
    signal.wait_timeout(Duration::from_secs(60)).await?;

    let mut processed = 0;
    for handle in handles {
        processed += handle.await?;
    }

    info!(processed, "all workers stopped");

    Ok(())
}

async fn produce_jobs(jobs_tx: mpsc::Sender<u32>, signal: StopSignal) {
    let mut job = 0;

    while !signal.is_triggered() {
        match signal.run_until_stopped(jobs_tx.send(job)).await {
            StopResult::Ok(Ok(())) => job += 1,
            StopResult::Ok(Err(_)) | StopResult::Stopped => break,
        }
    }
}

async fn worker(id: usize, jobs: JobQueue, signal: StopSignal, poison_after: u32) -> usize {
    let mut processed = 0;
    let mut stopped = signal.stopped();

    loop {
        let job = tokio::select! {
            biased;

            _ = &mut stopped => break,
            job = async { jobs.lock().await.recv().await } => job,
        };

        let Some(job) = job else {
            break;
        };

        if job >= poison_after {
            info!(worker = id, job, "poison job received, stopping every worker");
            signal.trigger();
            break;
        }

        sleep(Duration::from_millis(50)).await;
        processed += 1;
    }

    info!(worker = id, processed, "worker exiting");

    processed
}
