mod link;

pub use link::{Link, ShortenRequest, ShortenResponse};
