//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).
//!
//! ## For contributors
//!
//! * The layout is a three-row split: the connection-status table (one
//!   column per enabled platform), the scrollable feed, and a one-line
//!   status bar.
//! * Each feed item is a small tile of one or two lines, tagged and coloured
//!   by platform.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::source::{FeedItem, Platform};
use crate::widget::ConnectionStatus;

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let table_height = if app.connections.is_empty() { 0 } else { 4 };
    let [table_area, feed_area, status_area] = Layout::vertical([
        Constraint::Length(table_height),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    if table_height > 0 {
        draw_connection_table(app, frame, table_area);
    }
    draw_feed(app, frame, feed_area);
    draw_status_bar(app, frame, status_area);
}

fn platform_color(platform: Platform) -> Color {
    match platform {
        Platform::Twitter => Color::Cyan,
        Platform::Instagram => Color::Magenta,
        Platform::Facebook => Color::Blue,
    }
}

/// Render the per-platform connection table.
fn draw_connection_table(app: &App, frame: &mut Frame, area: Rect) {
    let header = Row::new(app.connections.iter().map(|(platform, _)| {
        Cell::from(platform.display_name()).style(
            Style::default()
                .fg(platform_color(*platform))
                .add_modifier(Modifier::BOLD),
        )
    }));

    let statuses = Row::new(app.connections.iter().map(|(platform, status)| {
        let style = match status {
            ConnectionStatus::NotConnected => Style::default().fg(Color::Yellow),
            ConnectionStatus::Connected { .. } => Style::default().fg(Color::Green),
            ConnectionStatus::Failed(_) => Style::default().fg(Color::Red),
        };
        Cell::from(status.describe(*platform)).style(style)
    }));

    let columns = app.connections.len() as u32;
    let widths = vec![Constraint::Ratio(1, columns); app.connections.len()];

    let table = Table::new(vec![statuses], widths)
        .header(header)
        .block(Block::default().title(" Connections ").borders(Borders::ALL));

    frame.render_widget(table, area);
}

/// Lines making up one feed tile.
pub fn item_lines(item: &FeedItem) -> Vec<Line<'_>> {
    let platform = item.platform();
    let tag = Span::styled(
        format!("{:<12}", format!("[{}]", platform.display_name())),
        Style::default().fg(platform_color(platform)),
    );

    let text_style = Style::default().fg(Color::White);
    match item {
        FeedItem::Instagram { .. } => {
            let image = Span::styled(
                item.image().unwrap_or("(no image)"),
                Style::default().fg(Color::DarkGray),
            );
            let mut lines = vec![Line::from(vec![tag, image])];
            if let Some(caption) = item.text() {
                lines.push(Line::from(vec![
                    Span::raw(" ".repeat(12)),
                    Span::styled(caption, text_style),
                ]));
            }
            lines
        }
        FeedItem::Twitter { .. } | FeedItem::Facebook { .. } => {
            vec![Line::from(vec![
                tag,
                Span::styled(item.text().unwrap_or_default(), text_style),
            ])]
        }
    }
}

/// Render the scrollable feed.
fn draw_feed(app: &mut App, frame: &mut Frame, area: Rect) {
    let list_items: Vec<ListItem> = app
        .items
        .iter()
        .map(|item| ListItem::new(Text::from(item_lines(item))))
        .collect();

    let list = List::new(list_items)
        .block(Block::default().title(" Social Feed ").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let mut spans = vec![
        Span::raw(" "),
        Span::styled(&app.status, Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::styled(
            format!("{} items", app.items.len()),
            Style::default().fg(Color::Green),
        ),
    ];
    if let Some(at) = app.last_fetched {
        spans.push(Span::styled(
            format!("  updated {}", at.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ));
    }
    spans.push(Span::raw("  q: quit  r: refresh  ↑/↓: scroll  Home/End: jump"));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::WidgetMsg;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render(app: &mut App) -> String {
        let backend = TestBackend::new(120, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(app, f)).unwrap();

        let buf = terminal.backend().buffer().clone();
        buf.content()
            .iter()
            .map(|c| c.symbol().chars().next().unwrap_or(' '))
            .collect()
    }

    fn sample_items() -> Vec<FeedItem> {
        vec![
            FeedItem::Twitter { text: "hello world".into() },
            FeedItem::Instagram {
                image: Some("https://img.example/1.jpg".into()),
                caption: Some("sunset".into()),
            },
            FeedItem::Facebook { text: "a post".into() },
        ]
    }

    #[test]
    fn instagram_tile_has_caption_line() {
        let item = FeedItem::Instagram {
            image: None,
            caption: Some("cap".into()),
        };
        let lines = item_lines(&item);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].to_string().contains("(no image)"));
        assert!(lines[1].to_string().contains("cap"));
    }

    #[test]
    fn text_tile_is_one_line_with_tag() {
        let item = FeedItem::Facebook { text: "post".into() };
        let lines = item_lines(&item);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].to_string().starts_with("[Facebook]"));
    }

    #[test]
    fn draw_does_not_panic_with_no_platforms() {
        let mut app = App::new(&[]);
        let text = render(&mut app);
        assert!(!text.contains("Connections"));
    }

    #[test]
    fn draw_shows_connection_statuses() {
        let mut app = App::new(&[Platform::Twitter, Platform::Instagram]);
        app.apply(WidgetMsg::Status(
            Platform::Twitter,
            ConnectionStatus::Connected {
                name: "alice".into(),
                thumbnail: None,
            },
        ));

        let text = render(&mut app);
        assert!(text.contains("Connected to Twitter as alice"));
        assert!(text.contains("Not connected"), "instagram still pending");
    }

    #[test]
    fn draw_shows_items_and_count() {
        let mut app = App::new(&[Platform::Twitter]);
        app.apply(WidgetMsg::Items(sample_items()));

        let text = render(&mut app);
        assert!(text.contains("hello world"));
        assert!(text.contains("sunset"));
        assert!(text.contains("3 items"), "status bar should show item count");
    }
}
