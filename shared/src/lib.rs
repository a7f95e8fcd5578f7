// Data models shared by the chart engine and whatever UI layer sits on top of it.
pub mod models;
pub mod utils;
