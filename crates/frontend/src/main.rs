mod app;
mod components;
mod notice;
mod pages;
mod session;
mod storage;

use app::App;
use tracing::Subscriber;
use tracing_subscriber::fmt::format::Pretty;
use tracing_subscriber::prelude::*;
use tracing_web::{MakeWebConsoleWriter, performance_layer};

fn main() {
    console_error_panic_hook::set_once();
    subscriber().init();
    yew::Renderer::<App>::new().render();
}

/// Route `tracing` output to the browser console
fn subscriber() -> impl Subscriber + Send + Sync + 'static {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(MakeWebConsoleWriter::new());
    let perf_layer = performance_layer().with_details_from_fields(Pretty::default());

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(perf_layer)
}
