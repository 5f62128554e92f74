// Types shared between the formatting engine and whatever front end drives it.
pub mod models;
pub mod utils;
