#![deny(warnings)]
pub mod belief;
pub mod game;
pub mod model;
pub mod path;

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "cluedo"
    }

    pub const fn codename() -> &'static str {
        "Manor Engine"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}
