pub mod template;
pub mod utils;

pub use template::{render_entry, render_entry_page};
