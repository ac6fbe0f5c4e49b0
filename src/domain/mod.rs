mod activity;
mod csv;
mod history;
mod import;
mod slots;
mod stats;
mod types;

pub use activity::*;
pub use csv::*;
pub use history::*;
pub use import::*;
pub use slots::*;
pub use stats::*;
pub use types::*;
