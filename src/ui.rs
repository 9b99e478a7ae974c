use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::app::App;
use crate::config::ConfigStore;
use crate::display::Visibility;

const HORIZONTAL_MARGIN: u16 = 1;

fn status_style(visibility: Visibility) -> Style {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    match visibility {
        Visibility::Full => bold_style.fg(Color::Green),
        Visibility::Dimmed => bold_style.add_modifier(Modifier::DIM),
        Visibility::Hidden => Style::default(),
    }
}

/// Rows the scratch text occupies once wrapped to `width` columns.
fn wrapped_rows(text: &str, width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let rows: usize = text
        .split('\n')
        .map(|line| line.chars().count().div_ceil(width).max(1))
        .sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

impl<S: ConfigStore> Widget for &App<S> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" typing-speed ")
            .title_bottom(
                Line::from(" esc quit · tab metric · f2 min/max · f3 pause · f4 words ").centered(),
            );
        let inner = block.inner(chunks[0]);
        let scroll = wrapped_rows(&self.scratch, inner.width).saturating_sub(inner.height);

        Paragraph::new(self.scratch.as_str())
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0))
            .render(chunks[0], buf);

        let visibility = self.engine.visibility();
        let status = match visibility {
            Visibility::Hidden => String::new(),
            Visibility::Full | Visibility::Dimmed => self.engine.status_line(),
        };
        Paragraph::new(Line::from(Span::styled(status, status_style(visibility))).right_aligned())
            .render(chunks[1], buf);
    }
}
