pub mod args;
pub mod error;
pub mod model;
pub mod storage;

pub mod controller {
    pub mod db_prefill;
    pub mod entry;
    pub mod matches;
    pub mod session;
    pub mod submission;
}

pub mod mvu {
    pub mod entry;
    pub mod runtime;
}

pub mod view {
    pub mod entry;
    pub mod index;
}

pub const HTMX_PATH: &str = "https://cdn.jsdelivr.net/npm/htmx.org@2.0.8/dist/htmx.min.js";

pub use controller::entry::configure;
pub use controller::session::Sessions;
