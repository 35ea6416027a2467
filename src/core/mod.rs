pub mod currency;
pub mod path;
pub mod rates;
