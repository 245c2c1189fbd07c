mod health;
mod redirect;
mod shorten;
mod stats;

pub use health::health_handler;
pub use redirect::redirect_handler;
pub use shorten::{bulk_shorten_handler, shorten_handler};
pub use stats::stats_handler;
