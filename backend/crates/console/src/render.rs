//! Plain text rendering

use plots::PlotStatus;
use plots::presentation::dto::PlotDto;

const HEADERS: [&str; 5] = ["PLOT", "LOCATION", "SIZE", "PRICE", "STATUS"];

/// Per-status totals shown above the table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub total: usize,
    pub available: usize,
    pub reserved: usize,
    pub sold: usize,
}

impl StatusCounts {
    pub fn of(plots: &[PlotDto]) -> Self {
        plots.iter().fold(Self::default(), |mut counts, plot| {
            counts.total += 1;
            match plot.status {
                PlotStatus::Available => counts.available += 1,
                PlotStatus::Reserved => counts.reserved += 1,
                PlotStatus::Sold => counts.sold += 1,
            }
            counts
        })
    }
}

/// Rupee amount with Indian digit grouping, e.g. `₹12,34,567.5`
pub fn format_price(price: f64) -> String {
    let paise = (price * 100.0).round() as i64;
    let sign = if paise < 0 { "-" } else { "" };
    let paise = paise.abs();

    let digits = (paise / 100).to_string();
    let grouped = if digits.len() <= 3 {
        digits
    } else {
        let (head, tail) = digits.split_at(digits.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut end = head.len();
        while end > 0 {
            let start = end.saturating_sub(2);
            groups.push(&head[start..end]);
            end = start;
        }
        groups.reverse();
        format!("{},{}", groups.join(","), tail)
    };

    let fraction = match paise % 100 {
        0 => String::new(),
        p if p % 10 == 0 => format!(".{}", p / 10),
        p => format!(".{p:02}"),
    };

    format!("{sign}₹{grouped}{fraction}")
}

/// Table of number, location, size, price and status
///
/// With `editable`, the status cell is drawn as a selectable control.
pub fn render_table(plots: &[PlotDto], editable: bool) -> String {
    if plots.is_empty() {
        return "No plots found\n".to_string();
    }

    let rows: Vec<[String; 5]> = plots
        .iter()
        .map(|plot| {
            let status = if editable {
                format!("[{} v]", plot.status)
            } else {
                plot.status.to_string()
            };
            [
                plot.plot_number.clone(),
                plot.location.clone(),
                plot.size.clone(),
                format_price(plot.price),
                status,
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &HEADERS.map(String::from), &widths);
    let rule_len = widths.iter().sum::<usize>() + 2 * (widths.len() - 1);
    out.push_str(&"-".repeat(rule_len));
    out.push('\n');
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width - cell.chars().count();
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price_indian_grouping() {
        assert_eq!(format_price(500.0), "₹500");
        assert_eq!(format_price(50000.0), "₹50,000");
        assert_eq!(format_price(1234567.0), "₹12,34,567");
        assert_eq!(format_price(55000.5), "₹55,000.5");
        assert_eq!(format_price(99.99), "₹99.99");
        assert_eq!(format_price(100000.05), "₹1,00,000.05");
    }
}
