use chrono::NaiveDate;
use tickerscope_api::types::{
    Column, PriceRecord, PriceSeries, QuotePagePayload, SeriesLayout, Timestamp,
};

fn record(day: u32, close: f64) -> PriceRecord {
    PriceRecord {
        timestamp: Timestamp::Day(NaiveDate::from_ymd_opt(2024, 1, day).unwrap()),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        adj_close: None,
        volume: 1000,
    }
}

#[test]
fn deserialize_payload_with_history() {
    let json = r#"{"symbol":"X","historicalPrices":[{"date":1704153600,"open":1.0,"high":2.0,"low":0.5,"close":1.5,"volume":100}]}"#;
    let payload: QuotePagePayload = serde_json::from_str(json).unwrap();
    let prices = payload.historical_prices.unwrap();
    assert_eq!(prices.len(), 1);
    assert_eq!(prices[0].date, 1704153600.0);
    assert_eq!(prices[0].close, 1.5);
    assert_eq!(prices[0].volume, 100.0);
}

#[test]
fn deserialize_payload_without_history_field() {
    let payload: QuotePagePayload = serde_json::from_str(r#"{"symbol":"X"}"#).unwrap();
    assert!(payload.historical_prices.is_none());
}

#[test]
fn deserialize_payload_missing_volume_defaults_to_zero() {
    let json = r#"{"historicalPrices":[{"date":0,"open":1.0,"high":1.0,"low":1.0,"close":1.0}]}"#;
    let payload: QuotePagePayload = serde_json::from_str(json).unwrap();
    assert_eq!(payload.historical_prices.unwrap()[0].volume, 0.0);
}

#[test]
fn series_sorts_records_ascending() {
    let series = PriceSeries::new(
        SeriesLayout::Flat,
        vec![record(5, 3.0), record(2, 1.0), record(3, 2.0)],
    );
    let closes = series.column_values(Column::Close);
    assert_eq!(closes, vec![1.0, 2.0, 3.0]);
    assert_eq!(series.first_date(), NaiveDate::from_ymd_opt(2024, 1, 2));
    assert_eq!(series.last_date(), NaiveDate::from_ymd_opt(2024, 1, 5));
}

#[test]
fn series_serializes_in_sorted_order() {
    let series = PriceSeries::new(SeriesLayout::Indexed, vec![record(4, 2.0), record(2, 1.0)]);
    let json = serde_json::to_value(&series).unwrap();
    assert_eq!(json["layout"], "Indexed");
    let dates: Vec<&str> = json["records"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["timestamp"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2024-01-02", "2024-01-04"]);
}

#[test]
fn timestamp_serializes_as_plain_strings() {
    let day = Timestamp::Day(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    assert_eq!(serde_json::to_value(day).unwrap(), "2024-01-02");

    let instant = Timestamp::from_epoch(1704205800, true).unwrap();
    assert_eq!(instant.to_string(), "2024-01-02 14:30:00+00:00");
    assert_eq!(instant.date(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
}

#[test]
fn timestamp_from_epoch_daily_drops_time() {
    let ts = Timestamp::from_epoch(1704205800, false).unwrap();
    assert_eq!(ts, Timestamp::Day(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()));
    assert_eq!(ts.to_string(), "2024-01-02");
}

#[test]
fn layout_headers_and_columns() {
    let indexed = SeriesLayout::Indexed;
    assert_eq!(indexed.index(), Some(Column::Date));
    let headers: Vec<&str> = indexed.columns().iter().map(|c| indexed.header(*c)).collect();
    assert_eq!(headers, vec!["Open", "High", "Low", "Close", "Adj Close", "Volume"]);

    let flat = SeriesLayout::Flat;
    assert_eq!(flat.index(), None);
    let headers: Vec<&str> = flat.columns().iter().map(|c| flat.header(*c)).collect();
    assert_eq!(headers, vec!["date", "open", "high", "low", "close", "volume"]);
    assert_eq!(flat.numeric_columns().count(), 5);
}

#[test]
fn missing_adj_close_is_skipped_in_column_values() {
    let mut with_adj = record(2, 10.0);
    with_adj.adj_close = Some(9.5);
    let series = PriceSeries::new(SeriesLayout::Indexed, vec![with_adj, record(3, 11.0)]);
    assert_eq!(series.column_values(Column::AdjClose), vec![9.5]);
    assert_eq!(series.column_values(Column::Volume), vec![1000.0, 1000.0]);
}
