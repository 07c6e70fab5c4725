mod bounded;
mod clock;
mod error;
mod timeframe;

pub use bounded::BoundedHistory;
pub use clock::{millis_to_datetime, now_millis};
pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
pub use timeframe::Timeframe;
