mod price;
pub use self::price::{Column, PriceRecord, PriceSeries, SeriesLayout, Timestamp};

mod google;
pub use self::google::{GooglePrice, QuotePagePayload};
