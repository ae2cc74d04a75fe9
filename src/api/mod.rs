mod types;
mod client;
mod error;
mod time;


pub use types::*;
pub use client::ScheduleClient;
pub use error::ApiError;
pub use time::{format_date, parse_date, parse_wire_time};
