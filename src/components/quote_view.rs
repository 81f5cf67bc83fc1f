use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::centered;
use crate::theme;

pub struct QuoteView;

impl QuoteView {
    pub fn render(frame: &mut Frame, area: Rect, quote: &str, is_favorite: bool) {
        let block = Block::default()
            .title(" Quote of the Day ")
            .title_style(theme::current().header)
            .title_bottom(Line::from(Span::styled(
                if is_favorite { " \u{2605} in favorites " } else { "" },
                theme::current().accent,
            )))
            .borders(Borders::ALL)
            .border_style(theme::current().border);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let top_pad = inner.height.saturating_sub(4) / 2;
        let mut lines: Vec<Line> = (0..top_pad).map(|_| Line::from("")).collect();
        lines.push(Line::from(Span::styled(quote.to_string(), Style::default())));

        let para = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(para, inner);
    }
}

pub struct FavoritesPopup;

impl FavoritesPopup {
    /// `favorites: None` means nothing was ever saved.
    pub fn render(frame: &mut Frame, area: Rect, favorites: Option<&[String]>) {
        let (title, height) = match favorites {
            Some(list) => {
                let rows = u16::try_from(list.len() * 2 + 4).unwrap_or(u16::MAX);
                (" Favorite Quotes ", rows.min(area.height))
            }
            None => (" No Favorites ", 5),
        };
        let popup = centered(area, area.width.saturating_mul(4) / 5, height);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(title)
            .title_style(theme::current().accent)
            .borders(Borders::ALL)
            .border_style(theme::current().border);

        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let mut lines: Vec<Line> = match favorites {
            Some(list) => list
                .iter()
                .flat_map(|q| [Line::from(format!("\u{2022} {q}")), Line::from("")])
                .collect(),
            None => vec![Line::from(Span::styled(
                "No favorite quotes saved.",
                theme::current().dim,
            ))],
        };
        lines.push(Line::from(Span::styled("Press Esc to close", theme::current().dim)));

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }
}
