use engine::MoneyCents;
use ratatui::{
    style::{Modifier, Style},
    text::Span,
};

use crate::ui::theme::Theme;

/// Formats an amount with two decimals and thousands separators, e.g.
/// `12,345.60`.
#[must_use]
pub fn format_amount(amount: MoneyCents) -> String {
    let plain = amount.to_string();
    let (sign, digits) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain.as_str()),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}.{fraction}")
}

#[must_use]
pub fn format_major(value: f64) -> String {
    format_amount(MoneyCents::from_major(value))
}

/// Bold amount for totals.
#[must_use]
pub fn styled_total(amount: MoneyCents, theme: &Theme) -> Span<'static> {
    Span::styled(
        format_amount(amount),
        Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_amount(MoneyCents::new(1_234_560)), "12,345.60");
        assert_eq!(format_amount(MoneyCents::new(99_900)), "999.00");
        assert_eq!(format_amount(MoneyCents::new(-100_000_05)), "-100,000.05");
        assert_eq!(format_amount(MoneyCents::new(0)), "0.00");
    }
}
