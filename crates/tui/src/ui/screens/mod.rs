pub mod home;
pub mod items;
pub mod quotations;
pub mod settings;

use ratatui::{style::Style, text::Span};

use api_types::quotation::QuotationStatus;

use super::theme::Theme;

fn quotation_status_span(status: QuotationStatus, theme: &Theme) -> Span<'static> {
    let color = match status {
        QuotationStatus::Pending => theme.warning,
        QuotationStatus::Accepted => theme.positive,
        QuotationStatus::Rejected | QuotationStatus::Expired => theme.error,
    };
    Span::styled(status.as_str(), Style::default().fg(color))
}
