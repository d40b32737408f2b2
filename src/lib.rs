pub mod airspace;
pub mod cli;
pub mod config;
pub mod extrapolator;
pub mod geometry;
pub mod gui;
pub mod ingestor;
pub mod logging;
pub mod parser;
pub mod renderer;
pub mod route;
pub mod scheduler;
pub mod selection;
pub mod thread_manager;
pub mod tracker;
pub mod types;
