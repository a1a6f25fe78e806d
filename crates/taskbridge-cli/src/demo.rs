//! Demo scenarios

use crate::host::{Host, HostOutcome};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use taskbridge_workloads::{
    PushStatus, StrQueue, complex_work, do_work, return_int, return_string, sleep,
    throw_exception,
};

const QUEUE_SIZE: usize = 3;
const QUEUE_ITEMS: usize = 10;

/// Run every scenario, then the scrape if `scrape` is given
pub fn run(host: &mut Host, scrape: Option<(String, PathBuf)>) -> Result<()> {
    values(host)?;
    sleeps(host)?;
    exceptions(host)?;
    queue(host)?;
    cancel(host)?;

    if let Some((url, output)) = scrape {
        self::scrape(host, url, output)?;
    }
    Ok(())
}

/// Run `complex_work` once and report the outcome
pub fn scrape(host: &mut Host, url: String, output: PathBuf) -> Result<()> {
    println!("Scraping {url} into {}", output.display());
    let outcome = host.run(complex_work(url, output.clone()))?;
    match outcome {
        Ok(_) => {
            println!("✓ URLs written to {}", output.display());
            Ok(())
        }
        Err(e) => anyhow::bail!("Scrape failed: {e}"),
    }
}

fn values(host: &mut Host) -> Result<()> {
    println!("== values");
    for value in [-1, 0, 1, i32::MAX] {
        report("return_int", host.run(return_int(value))?);
    }
    for value in ["", "abcd", "去吃饭吧"] {
        report("return_string", host.run(return_string(value))?);
    }
    Ok(())
}

fn sleeps(host: &mut Host) -> Result<()> {
    println!("== sleep");
    let started = Instant::now();
    let outcome = host.run(sleep(0.1))?;
    println!("sleep(0.1) -> {} after {:?}", show(&outcome), started.elapsed());

    report("sleep(-1)", host.run(sleep(-1.0))?);
    Ok(())
}

fn exceptions(host: &mut Host) -> Result<()> {
    println!("== exceptions");
    for x in 0..3 {
        report(&format!("throw_exception({x})"), host.run(throw_exception(x))?);
    }
    Ok(())
}

fn queue(host: &mut Host) -> Result<()> {
    println!("== queue");
    let queue = StrQueue::new(QUEUE_SIZE)?;
    let worker = host.start(do_work(queue.clone()))?;

    let (mut waited, mut failed) = (0, 0);
    for i in 0..QUEUE_ITEMS {
        let data = format!("value-{i}");
        if queue.try_push_back(data.clone()) {
            continue;
        }

        waited += 1;
        let push = host.start(queue.push_back(data))?;
        let status = host.block_on(push.into_future())?;
        if status.ok().and_then(|v| v.as_int()) != Some(PushStatus::Success.code()) {
            failed += 1;
        }
    }
    queue.close();

    let processed = host.block_on(worker.into_future())?;
    println!(
        "pushed {QUEUE_ITEMS} items ({waited} waited for space, {failed} failed), worker -> {}",
        show(&processed)
    );
    Ok(())
}

fn cancel(host: &mut Host) -> Result<()> {
    println!("== cancel");
    let outcome = host
        .run_with_timeout(sleep(2.0), Duration::from_millis(500))
        .context("Cancel scenario did not run")?;
    report("sleep(2) with 0.5s timeout", outcome);
    println!(
        "{} bridge(s) still in flight",
        host.bridge().active_bridges()
    );
    Ok(())
}

fn report(label: &str, outcome: HostOutcome) {
    println!("{label} -> {}", show(&outcome));
}

fn show(outcome: &HostOutcome) -> String {
    match outcome {
        Ok(value) => value.to_string(),
        Err(e) => format!("raised {e}"),
    }
}
