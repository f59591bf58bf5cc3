pub mod config;
pub mod diff;
pub mod events;
pub mod git;
pub mod item;
pub mod opener;
pub mod pane;
pub mod presenter;
pub mod root;
pub mod state;
mod toml_file;
pub mod uri;
