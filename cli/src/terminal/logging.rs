use colored::*;
use indicatif::ProgressStyle;
use tracing::{Event, Level, Subscriber};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::FormatEvent;
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;

use crate::terminal::print::PRINT_TARGET;

const SPINNER_TICKS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
    "▁▁▁▁▁",
];

pub struct DroneFormatter;

impl<S, N> FormatEvent<S, N> for DroneFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();

        // Terminal output from `print` carries its own layout.
        if meta.target() != PRINT_TARGET {
            let (symbol, color_func): (&str, fn(ColoredString) -> ColoredString) = match *meta.level() {
                Level::TRACE => ("[ ]", |s| s.dimmed()),
                Level::DEBUG => ("[?]", |s| s.blue()),
                Level::INFO => ("[+]", |s| s.green().bold()),
                Level::WARN => ("[*]", |s| s.yellow().bold()),
                Level::ERROR => ("[-]", |s| s.red().bold()),
            };
            write!(writer, "{} ", color_func(symbol.into()))?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// Filter from `RUST_LOG` directives (default `info`). Terminal output under
/// [`PRINT_TARGET`] is always enabled, whatever the directives say.
pub fn build_filter(directives: Option<&str>) -> anyhow::Result<EnvFilter> {
    let filter = directives
        .filter(|raw| !raw.trim().is_empty())
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new("info"));
    Ok(filter.add_directive(format!("{PRINT_TARGET}=info").parse()?))
}

/// Installs the global subscriber.
///
/// Spans opened around network calls are drawn as spinners by the indicatif
/// layer; log lines go through its writer so they do not tear the spinner.
pub fn init_logging() -> anyhow::Result<()> {
    let spinner_style = ProgressStyle::with_template("{span_child_prefix}{spinner:.blue} {span_name} {span_fields}")
        .map(|style| style.tick_strings(SPINNER_TICKS))
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    let indicatif_layer = IndicatifLayer::new().with_progress_style(spinner_style);

    let filter = build_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref())?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(DroneFormatter)
                .with_writer(indicatif_layer.get_stderr_writer()),
        )
        .with(indicatif_layer)
        .init();
    Ok(())
}
