use std::process::ExitCode;
use std::sync::Arc;

use cartelera_viewer::app::ViewerApp;
use cartelera_viewer::config::ViewerConfig;
use cartelera_viewer::data::{load_dataset, Dataset};
use cartelera_viewer::selection::{LogObserver, SelectedSubset, TableView};
use cartelera_viewer::state::AppState;
use clap::Parser;
use eframe::egui;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ViewerConfig::parse();

    // A failed load never reaches the view.
    let dataset = match load_dataset(&config.location, &config.fetch_options()) {
        Ok(ds) => ds,
        Err(e) => {
            log::error!("Startup aborted: {e}");
            eprintln!("error: {}: {e}", e.kind());
            return ExitCode::from(e.kind().exit_code());
        }
    };

    if config.headless {
        run_headless(dataset, &config.clicks);
        return ExitCode::SUCCESS;
    }

    match run_window(config, dataset) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Window closed with error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Apply each click in order, printing the selection after every change.
fn run_headless(dataset: Dataset, clicks: &[usize]) {
    let mut view = TableView::new(Arc::new(dataset));
    view.subscribe(Box::new(LogObserver));
    view.subscribe(Box::new(|subset: &SelectedSubset| {
        println!("selection {:?}\n{subset}", subset.indices());
    }));

    for &row in clicks {
        if !view.click_row(row) {
            eprintln!(
                "warning: row {row} is out of range ({} rows), ignored",
                view.dataset().len()
            );
        }
    }
}

fn run_window(config: ViewerConfig, dataset: Dataset) -> eframe::Result {
    let title = format!("Cartelera Viewer – {}", config.location);
    let state = AppState::new(config.location.clone(), config.fetch_options(), dataset);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(|_cc| Ok(Box::new(ViewerApp::new(state)))),
    )
}
