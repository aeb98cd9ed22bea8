//! Closing price line chart, drawn with ratatui into an off-screen buffer
//! and returned as plain text.

use chrono::NaiveTime;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::symbols;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Block, Chart, Dataset, GraphType, Widget};
use tickerscope_lib::types::{PriceSeries, Timestamp};

pub const DEFAULT_WIDTH: u16 = 80;
pub const DEFAULT_HEIGHT: u16 = 20;

fn x_value(ts: &Timestamp) -> f64 {
    match ts {
        Timestamp::Day(d) => d.and_time(NaiveTime::MIN).and_utc().timestamp() as f64,
        Timestamp::Instant(dt) => dt.timestamp() as f64,
    }
}

/// Close price against time. An empty series renders as an empty string.
pub fn render_close_chart(series: &PriceSeries, width: u16, height: u16) -> String {
    let records = series.records();
    let (Some(first), Some(last)) = (records.first(), records.last()) else {
        return String::new();
    };

    let data: Vec<(f64, f64)> = records
        .iter()
        .map(|r| (x_value(&r.timestamp), r.close))
        .collect();

    let min_y = data.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let max_y = data.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
    let padding = ((max_y - min_y).abs() * 0.05).max(0.5);
    let y_min = min_y - padding;
    let y_max = max_y + padding;

    let x_min = data[0].0;
    // A single point still needs a non-empty x range.
    let x_max = data[data.len() - 1].0.max(x_min + 1.0);

    let dataset = Dataset::default()
        .name("Close")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(Block::bordered().title("Closing Price"))
        .x_axis(
            Axis::default()
                .title("Date")
                .bounds([x_min, x_max])
                .labels(vec![
                    Span::raw(first.timestamp.date().to_string()),
                    Span::raw(last.timestamp.date().to_string()),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("Close")
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::raw(format!("{:.2}", y_min)),
                    Span::raw(format!("{:.2}", y_max)),
                ]),
        );

    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    chart.render(area, &mut buf);
    buffer_to_string(&buf, area)
}

fn buffer_to_string(buf: &Buffer, area: Rect) -> String {
    let mut out = String::new();
    for y in area.top()..area.bottom() {
        let mut line = String::new();
        for x in area.left()..area.right() {
            line.push_str(buf.cell((x, y)).map_or(" ", |cell| cell.symbol()));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
