pub mod date;
mod error;
pub mod occupancy;
pub mod selection;
pub mod series;
pub mod share;

pub use self::error::Error;
