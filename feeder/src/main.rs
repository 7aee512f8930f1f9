use anyhow::Context;
use clap::Parser;
use generator::profile::SyntheticConfig;
use globecore::telemetry::MetricsRecorder;
use gui_bridge::bridge::FeedBridge;
use gui_bridge::model::FeedModel;
use std::fs::{self, File};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::FeedConfig;
use workflow::runner::{LayoutRequest, LayoutRunner};

mod generator;
mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "City and boundary feed driver for the sustainable globe")]
struct Args {
    /// Load a feed config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// City metrics CSV
    #[arg(long)]
    cities: Option<PathBuf>,
    /// Country boundaries (TopoJSON or GeoJSON)
    #[arg(long)]
    boundaries: Option<PathBuf>,
    /// Generate this many cities instead of reading a CSV
    #[arg(long)]
    synthetic: Option<usize>,
    #[arg(long, default_value_t = 7)]
    seed: u64,
    /// Address to serve the feeds on
    #[arg(long)]
    bind: Option<SocketAddr>,
    /// Run one headless layout pass and print a report
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Write the offline report as JSON to this file
    #[arg(long)]
    report: Option<PathBuf>,
    #[arg(long)]
    yaw: Option<f64>,
    #[arg(long)]
    pitch: Option<f64>,
    #[arg(long)]
    scale: Option<f64>,
    /// City to select before the offline pass
    #[arg(long)]
    select: Option<String>,
    #[arg(long)]
    width: Option<f32>,
    #[arg(long)]
    height: Option<f32>,
    /// Keep the HTTP feed alive until Ctrl+C
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut feed_config = if let Some(path) = &args.config {
        FeedConfig::load(path)?
    } else {
        FeedConfig::from_args(args.cities.clone(), args.boundaries.clone(), None)
    };
    if let Some(count) = args.synthetic {
        feed_config.synthetic = Some(SyntheticConfig::new(count, args.seed));
    }
    if let Some(bind) = args.bind {
        feed_config.bind = bind;
    }

    let metrics = MetricsRecorder::new();
    let model = FeedModel::load(&feed_config, &metrics);
    let runner = Arc::new(LayoutRunner::new());

    if args.offline {
        let request = LayoutRequest {
            yaw: args.yaw,
            pitch: args.pitch,
            scale: args.scale,
            select: args.select.clone(),
            width: args.width,
            height: args.height,
        };
        let report = runner.execute(&model, &request);

        println!(
            "Offline layout -> source {:?}, cities {}, visible {}, labels {}, rays {}, draw commands {}",
            model.source,
            report.total_cities,
            report.entries.len(),
            report.labels_shown,
            report.ray_strokes,
            report.draw_commands
        );
        println!(
            "Camera yaw {:.2} pitch {:.2} scale {:.2}; feed fallbacks {}",
            report.camera.yaw,
            report.camera.pitch,
            report.camera.scale,
            metrics.snapshot().feed_fallbacks
        );

        if let Some(report_path) = &args.report {
            if let Some(parent) = report_path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            let file = File::create(report_path)
                .with_context(|| format!("creating report {}", report_path.display()))?;
            serde_json::to_writer_pretty(file, &report)
                .with_context(|| format!("writing report {}", report_path.display()))?;
        }
    }

    if args.serve {
        let bridge = FeedBridge::new(FeedModel::default(), runner, feed_config.bind);
        bridge.publish(model)?;
        bridge.publish_status(&format!(
            "HTTP feed on http://{} (Ctrl+C to stop)...",
            feed_config.bind
        ));
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
