//! `imgfetch get` – fetch images through the orchestrator and report deliveries.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use imgfetch_core::config::ImgfetchConfig;
use imgfetch_core::persist::DiskPersistence;
use imgfetch_core::transport::CurlTransport;
use imgfetch_core::{
    Delivery, DeliveryStatus, Image, ImageRequest, ImageTarget, OrchestratorBuilder,
    OrchestratorStats, TargetHandle,
};

use crate::cli::GetArgs;

/// Stand-in display slot; the CLI only reports what would be shown.
struct PrintTarget {
    slot: usize,
}

impl ImageTarget for PrintTarget {
    fn bind(&self, url: &str, image: &Image) {
        tracing::debug!(slot = self.slot, url, width = image.width(), height = image.height(), "bound image");
    }
}

fn status_label(status: &DeliveryStatus) -> &'static str {
    match status {
        DeliveryStatus::CacheHit => "CACHED",
        DeliveryStatus::Fetched => "FETCHED",
        DeliveryStatus::Failed(_) => "FAILED",
        DeliveryStatus::Cancelled => "CANCELLED",
    }
}

fn print_delivery(d: &Delivery) {
    let detail = match (&d.status, &d.image) {
        (_, Some(img)) => format!("{}x{}", img.width(), img.height()),
        (DeliveryStatus::Failed(reason), None) => reason.clone(),
        _ => "-".to_string(),
    };
    println!("{:<10} {} {}", status_label(&d.status), d.url, detail);
}

fn print_stats(stats: &OrchestratorStats, elapsed: Duration) {
    println!(
        "{} request(s): {} cache hit(s) ({} from disk), {} coalesced, {} superseded, {} rejected",
        stats.requests,
        stats.cache_hits,
        stats.disk_restores,
        stats.coalesced,
        stats.superseded,
        stats.rejected
    );
    println!(
        "{} fetch(es): {} ok, {} failed; {} cancelled deliveries; {:.2}s",
        stats.fetches_started,
        stats.fetches_succeeded,
        stats.fetches_failed,
        stats.deliveries_cancelled,
        elapsed.as_secs_f64()
    );
}

pub async fn run_get(cfg: &ImgfetchConfig, args: GetArgs) -> Result<()> {
    let transport = Arc::new(CurlTransport::new(cfg.http_or_default()));
    let mut builder = OrchestratorBuilder::from_config(cfg, transport);
    if let Some(minutes) = args.cool_time {
        builder = builder.cool_time_minutes(minutes);
    }
    if let Some(policy) = args.policy {
        builder = builder.default_policy(policy);
    }
    if let Some(secs) = args.timeout {
        builder = builder.fetch_timeout(Some(Duration::from_secs(secs)));
    }
    if cfg.disk_cache && !args.no_disk_cache {
        builder = builder.persistence(Arc::new(DiskPersistence::open_default()?));
    }
    let mut orch = builder.build()?;

    let started = Instant::now();
    // Targets are held weakly by the orchestrator; keep them alive until done.
    let mut targets: Vec<Arc<PrintTarget>> = Vec::new();
    for _round in 0..args.repeat.max(1) {
        for url in &args.urls {
            let target = Arc::new(PrintTarget { slot: targets.len() });
            let req = ImageRequest::new(url.as_str(), TargetHandle::new(&target))
                .on_complete(|d| print_delivery(&d));
            if let Err(e) = orch.request(req) {
                println!("{:<10} {} {}", "REJECTED", url, e);
            }
            targets.push(target);
        }
    }

    orch.run_until_idle().await;
    print_stats(&orch.stats(), started.elapsed());
    Ok(())
}
