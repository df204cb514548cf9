mod helpers;
mod secret;

pub use helpers::{mask_secret, parse_boolean_flag};
pub use secret::Secret;
