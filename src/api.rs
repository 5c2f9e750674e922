mod client;
mod market;
mod source;

pub use self::{
    market::Api,
    source::{MarketSource, PriceQuery},
};
