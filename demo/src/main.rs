//! Chart demo - renders the sample charts to SVG
//!
//! Every chart is revealed with a simulated frame clock; the final frame
//! and the frame halfway through the animation are written as SVG files.

use anyhow::{Context, Result};
use chart_geometry::{
    drawables_to_svg, AnyChart, Bar, BarChart, BarSegment, ChartSettings, ChartView, Color, LineChart, LinePoint,
    LineSeries, PieChart, PieSlice, Size, StackedBar, StackedBarChart,
};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "chart-demo")]
#[command(about = "Render sample animated charts to SVG")]
#[command(version)]
struct Cli {
    /// Settings file (JSON); defaults are used when missing
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = "chart-output")]
    output: PathBuf,

    /// Chart width in pixels
    #[arg(long, default_value = "480")]
    width: f64,

    /// Chart height in pixels
    #[arg(long, default_value = "320")]
    height: f64,

    /// Simulated frames per second
    #[arg(long, default_value = "60")]
    fps: u32,
}

const PALETTE: [Color; 5] = [
    Color::rgb(0x63, 0xCB, 0xB0),
    Color::rgb(0x56, 0xB7, 0xF1),
    Color::rgb(0xFE, 0x6D, 0xA8),
    Color::rgb(0xFE, 0xD7, 0x0E),
    Color::rgb(0x1A, 0x3E, 0x5C),
];

fn sample_charts(settings: &ChartSettings) -> Vec<AnyChart> {
    let mut bars = BarChart::new(settings);
    bars.set_bars(
        [2.3, 2.0, 3.3, 1.1, 2.7]
            .iter()
            .enumerate()
            .map(|(i, &v)| Bar::new(format!("Bar {}", i + 1), v, PALETTE[i % PALETTE.len()]))
            .collect(),
    );

    let mut stacked = StackedBarChart::new(settings);
    stacked.set_stacks(
        [[1.2, 2.0, 0.8], [2.5, 1.0, 1.5], [0.7, 3.1, 1.0], [1.9, 1.4, 2.2]]
            .iter()
            .enumerate()
            .map(|(i, values)| {
                values
                    .iter()
                    .enumerate()
                    .fold(StackedBar::new(format!("Q{}", i + 1)), |stack, (j, &v)| {
                        stack.with_segment(BarSegment::new(v, PALETTE[j]))
                    })
            })
            .collect(),
    );

    let mut pie = PieChart::new(settings);
    pie.set_slices(
        [("Freetime", 15.0), ("Sleep", 25.0), ("Work", 35.0), ("Eating", 25.0)]
            .iter()
            .enumerate()
            .map(|(i, &(label, v))| PieSlice::new(label, v, PALETTE[i]))
            .collect(),
    );
    pie.set_focused(2);

    let mut line = LineChart::new(settings);
    let months = ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug"];
    let values = [2.4, 3.4, 0.4, -1.2, 2.6, 1.0, 3.5, 2.4];
    line.add_series(
        months
            .iter()
            .zip(values)
            .fold(LineSeries::new("Temperature", PALETTE[1]), |series, (month, v)| {
                series.with_point(LinePoint::new(*month, v))
            }),
    );

    vec![bars.into(), stacked.into(), pie.into(), line.into()]
}

fn write_frame(dir: &Path, name: &str, size: Size, chart: &AnyChart, reveal: f64) -> Result<()> {
    let path = dir.join(format!("{name}.svg"));
    let svg = drawables_to_svg(size, &chart.produce_drawables(reveal));
    std::fs::write(&path, svg).with_context(|| format!("writing {}", path.display()))?;
    tracing::info!("wrote {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let settings = match &cli.settings {
        Some(path) => ChartSettings::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => ChartSettings::default(),
    };
    settings.validate()?;

    anyhow::ensure!(cli.width > 0.0 && cli.height > 0.0, "chart size must be positive");
    anyhow::ensure!(cli.fps > 0, "fps must be positive");
    let size = Size::new(cli.width, cli.height);
    let frame_time = Duration::from_secs_f64(1.0 / f64::from(cli.fps));

    std::fs::create_dir_all(&cli.output).with_context(|| format!("creating {}", cli.output.display()))?;

    for mut chart in sample_charts(&settings) {
        let name = chart.kind().name();
        chart.compute_layout(size)?;

        let mut animation = settings.animation.animation();
        let token = animation.start(Duration::ZERO);
        let halfway = animation.duration() / 2;
        let mut now = Duration::ZERO;
        let mut frames = 0u32;
        let mut mid_written = false;

        while let Some(frame) = animation.step(token, now) {
            frames += 1;
            if !mid_written && now >= halfway {
                write_frame(&cli.output, &format!("{name}_mid"), size, &chart, frame.value)?;
                mid_written = true;
            }
            if frame.finished {
                write_frame(&cli.output, name, size, &chart, frame.value)?;
                break;
            }
            now += frame_time;
        }
        tracing::debug!(chart = name, frames, "animation finished");
    }

    Ok(())
}
