use clap::Parser;
use flight_tracker::cli::Cli;
use flight_tracker::config::ApplicationConfig;
use flight_tracker::gui::RadarApp;
use flight_tracker::ingestor::{FeedWriter, Ingestor};
use flight_tracker::logging::setup_logging;
use flight_tracker::parser::types::FeedRequest;
use flight_tracker::parser::FeedParser;
use flight_tracker::renderer::TerminalRenderer;
use flight_tracker::scheduler::SchedulerDriver;
use flight_tracker::thread_manager::ThreadManager;
use flight_tracker::tracker::{Tracker, TrackerEvent};
use log::info;

const RENDERER_PERIOD: std::time::Duration = std::time::Duration::from_secs(5);

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.logging_level);

    let application_config = match ApplicationConfig::construct_from_path(&cli.config_file) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };
    info!("Main: Application started.");

    let (messages_sender, messages_receiver): (
        crossbeam_channel::Sender<String>,
        crossbeam_channel::Receiver<String>,
    ) = crossbeam_channel::unbounded();

    let (event_sender, event_receiver): (
        crossbeam_channel::Sender<TrackerEvent>,
        crossbeam_channel::Receiver<TrackerEvent>,
    ) = crossbeam_channel::unbounded();

    let (request_sender, request_receiver): (
        crossbeam_channel::Sender<FeedRequest>,
        crossbeam_channel::Receiver<FeedRequest>,
    ) = crossbeam_channel::unbounded();

    let mut thread_manager = ThreadManager::new();

    match &cli.replay {
        Some(path) => {
            let ingestor = Ingestor::replay(path, messages_sender).unwrap_or_else(|e| {
                log::error!("Error opening replay '{}': {e}", path.display());
                std::process::exit(1);
            });
            thread_manager.add_task("ingestor", ingestor, std::time::Duration::ZERO);
            let writer = FeedWriter::new(std::io::sink(), request_receiver);
            thread_manager.add_task("feed-writer", writer, std::time::Duration::ZERO);
        }
        None => {
            let (ingestor, writer) =
                Ingestor::connect(&application_config.feed, messages_sender, request_receiver)
                    .unwrap_or_else(|e| {
                        log::error!("Error connecting to feed: {e}");
                        std::process::exit(1);
                    });
            thread_manager.add_task("ingestor", ingestor, std::time::Duration::ZERO);
            thread_manager.add_task("feed-writer", writer, std::time::Duration::ZERO);
        }
    }

    let parser = FeedParser::new(messages_receiver, event_sender.clone());
    thread_manager.add_task("parser", parser, std::time::Duration::ZERO);

    let tracker = Tracker::new(
        application_config.tracker.stale_after(),
        application_config.tracker.tick_interval(),
        event_receiver,
        request_sender,
    );
    let airspace_viewer = tracker.get_airspace_viewer();
    let driver = SchedulerDriver::new(tracker.scheduler());
    let tracker_task_id = thread_manager.add_task("tracker", tracker, std::time::Duration::ZERO);
    thread_manager.add_task(
        "extrapolator",
        driver,
        application_config.tracker.tick_interval(),
    );

    let renderer = TerminalRenderer::new(
        airspace_viewer.clone(),
        application_config.route.clone(),
    );
    thread_manager.add_task("renderer", renderer, RENDERER_PERIOD);

    if cli.gui {
        let route_config = application_config.route.clone();
        let gui_result = eframe::run_native(
            "Flight Tracker",
            eframe::NativeOptions::default(),
            Box::new(move |cc| {
                Ok(Box::new(RadarApp::new(
                    cc.egui_ctx.clone(),
                    airspace_viewer,
                    event_sender,
                    route_config,
                )))
            }),
        );
        if let Err(e) = gui_result {
            log::error!("GUI error: {e}");
        }
    } else {
        // the tracker ends once the parser is its only remaining source
        drop(event_sender);
        match cli.duration {
            Some(duration) => std::thread::sleep(std::time::Duration::from_secs(duration)),
            None => thread_manager.wait_on_task_finish(tracker_task_id),
        }
    }

    thread_manager.stop_all_tasks();
    thread_manager.wait_on_task_finish(tracker_task_id);

    info!("Main: Program finished.");
}
