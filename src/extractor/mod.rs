pub mod client;
mod csv;
mod extract;
mod map_url;
mod patterns;
mod short_url;

pub use extract::{ExtractError, Extractor};
