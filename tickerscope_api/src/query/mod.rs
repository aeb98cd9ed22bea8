mod common;
pub use self::common::{earliest_date, Exchange, Interval, Period};

mod history;
pub use self::history::{DateRange, HistoryQuery, Span};
