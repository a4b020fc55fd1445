mod link;

pub use link::{history_handler, redirect_handler, shorten_handler, LinkServiceType};
