#![forbid(unsafe_code)]

use ratatui::{
    buffer::{Buffer, Cell},
    layout::{Direction, Rect},
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Sparkline, Widget},
};

/// One cell per value, scaled from zero to the largest value. Missing values
/// (and zeros) leave their cell blank.
pub(crate) fn sparkline(values: &[Option<f64>]) -> String {
    let data: Vec<u64> = values.iter().map(|v| v.map_or(0, whole)).collect();
    let max = data.iter().copied().max().unwrap_or(0);
    if max == 0 {
        return " ".repeat(data.len());
    }

    let area = Rect::new(0, 0, cells(data.len()), 1);
    let mut buf = Buffer::empty(area);
    Sparkline::default()
        .data(data.as_slice())
        .max(max)
        .render(area, &mut buf);
    buffer_lines(&buf).concat()
}

/// Horizontal bars on the shared scale `max`, one line per `(label, value)`.
/// Bars get `width` cells after the label column.
pub(crate) fn bars(rows: &[(String, f64)], max: f64, width: u16) -> Vec<String> {
    if rows.is_empty() {
        return Vec::new();
    }
    let label_width = rows
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);
    let data: Vec<Bar> = rows
        .iter()
        .map(|(label, value)| {
            Bar::default()
                .label(Line::from(label.as_str()))
                .value(whole(*value))
                .text_value(String::new())
        })
        .collect();

    let area = Rect::new(
        0,
        0,
        cells(label_width + 1).saturating_add(width),
        cells(rows.len()),
    );
    let mut buf = Buffer::empty(area);
    BarChart::default()
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .max(whole(max).max(1))
        .data(BarGroup::default().bars(&data))
        .render(area, &mut buf);
    buffer_lines(&buf)
}

fn whole(value: f64) -> u64 {
    value.max(0.0).round() as u64
}

fn cells(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

fn buffer_lines(buf: &Buffer) -> Vec<String> {
    let area = buf.area;
    (area.top()..area.bottom())
        .map(|y| {
            (area.left()..area.right())
                .filter_map(|x| buf.cell((x, y)))
                .map(Cell::symbol)
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sparkline_keeps_a_slot_per_value() {
        assert_eq!(sparkline(&[None, Some(1_000.0), Some(2_000.0)]), " ▄█");
        assert_eq!(sparkline(&[Some(2_000.0), None, Some(2_000.0)]), "█ █");
        assert_eq!(sparkline(&[Some(0.0), None]), "  ");
        assert_eq!(sparkline(&[]), "");
    }

    #[test]
    fn bars_share_one_scale() {
        let rows = [("2015".to_string(), 100.0), ("2020*".to_string(), 50.0)];
        let lines = bars(&rows, 100.0, 10);

        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.chars().count() == 5 + 1 + 10));
        assert!(lines[0].starts_with("2015"));
        assert!(lines[1].starts_with("2020*"));
        assert_eq!(lines[0].matches('█').count(), 10);
        assert_eq!(lines[1].matches('█').count(), 5);
    }

    #[test]
    fn bars_without_rows_or_values() {
        assert!(bars(&[], 10.0, 10).is_empty());
        let lines = bars(&[("2015".to_string(), 0.0)], 0.0, 4);
        assert_eq!(lines[0].matches('█').count(), 0);
    }
}
