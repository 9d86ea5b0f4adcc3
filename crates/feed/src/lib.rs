pub mod stream;

pub use stream::BinanceKlineStream;
