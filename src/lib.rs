pub mod cli;
pub mod config;
pub mod field;
pub mod focus;
pub mod model;
pub mod palette;
pub mod parser;
pub mod registry;
pub mod render;
pub mod source;
pub mod state;
pub mod tui;
pub mod ui;
pub mod view;
