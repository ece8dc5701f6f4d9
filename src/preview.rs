use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, List, ListItem, Paragraph, Row, Table, Wrap},
    Frame,
};
use serde::Deserialize;

/// A renderable preview component. Task modules export one of these as their
/// `default` value; the viewport mounts it full-bleed.
pub trait Preview: Send + Sync + std::fmt::Debug {
    fn render(&self, f: &mut Frame, area: Rect);
}

/// Declarative widget description parsed from a task module's `default`
/// table. The `kind` tag selects the widget; unknown kinds fail the parse.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PreviewSpec {
    Card {
        title: String,
        #[serde(default)]
        body: String,
        #[serde(default)]
        accent: Option<String>,
    },
    List {
        title: String,
        #[serde(default)]
        items: Vec<String>,
        #[serde(default)]
        accent: Option<String>,
    },
    Gauge {
        title: String,
        ratio: f64,
        #[serde(default)]
        label: Option<String>,
        #[serde(default)]
        accent: Option<String>,
    },
    Table {
        title: String,
        #[serde(default)]
        headers: Vec<String>,
        #[serde(default)]
        rows: Vec<Vec<String>>,
        #[serde(default)]
        accent: Option<String>,
    },
    Banner {
        text: String,
        #[serde(default)]
        subtitle: Option<String>,
        #[serde(default)]
        accent: Option<String>,
    },
}

/// Map an accent name from a module document to a terminal color.
/// Unknown names fall back to cyan rather than failing the load.
pub fn accent_color(name: Option<&str>) -> Color {
    match name.map(|n| n.to_ascii_lowercase()).as_deref() {
        Some("red") => Color::Red,
        Some("green") => Color::Green,
        Some("yellow") => Color::Yellow,
        Some("blue") => Color::Blue,
        Some("magenta") => Color::Magenta,
        Some("cyan") | None => Color::Cyan,
        Some("white") => Color::White,
        Some("gray") | Some("grey") => Color::DarkGray,
        Some(_) => Color::Cyan,
    }
}

fn framed(title: &str, accent: Color) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title))
        .border_style(Style::default().fg(accent))
}

impl Preview for PreviewSpec {
    fn render(&self, f: &mut Frame, area: Rect) {
        match self {
            PreviewSpec::Card { title, body, accent } => {
                let accent = accent_color(accent.as_deref());
                let para = Paragraph::new(body.as_str())
                    .block(framed(title, accent))
                    .wrap(Wrap { trim: false });
                f.render_widget(para, area);
            }
            PreviewSpec::List { title, items, accent } => {
                let accent = accent_color(accent.as_deref());
                let items: Vec<ListItem> = items
                    .iter()
                    .map(|item| {
                        ListItem::new(Line::from(vec![
                            Span::styled("- ", Style::default().fg(accent)),
                            Span::raw(item.as_str()),
                        ]))
                    })
                    .collect();
                let list = List::new(items).block(framed(title, accent));
                f.render_widget(list, area);
            }
            PreviewSpec::Gauge { title, ratio, label, accent } => {
                let accent = accent_color(accent.as_deref());
                // Gauge panics outside 0..=1, clamp whatever the module said
                let ratio = ratio.clamp(0.0, 1.0);
                let label = label
                    .clone()
                    .unwrap_or_else(|| format!("{:.0}%", ratio * 100.0));
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3), Constraint::Min(0)])
                    .split(area);
                let gauge = Gauge::default()
                    .block(framed(title, accent))
                    .gauge_style(Style::default().fg(accent))
                    .ratio(ratio)
                    .label(label);
                f.render_widget(gauge, chunks[1]);
            }
            PreviewSpec::Table { title, headers, rows, accent } => {
                let accent = accent_color(accent.as_deref());
                let width_count = headers
                    .len()
                    .max(rows.iter().map(|r| r.len()).max().unwrap_or(0))
                    .max(1);
                let widths = vec![Constraint::Ratio(1, width_count as u32); width_count];
                let body: Vec<Row> = rows
                    .iter()
                    .map(|r| Row::new(r.iter().map(|c| Cell::from(c.as_str()))))
                    .collect();
                let mut table = Table::new(body, widths).block(framed(title, accent));
                if !headers.is_empty() {
                    table = table.header(
                        Row::new(headers.iter().map(|h| Cell::from(h.as_str())))
                            .style(Style::default().fg(accent).add_modifier(Modifier::BOLD)),
                    );
                }
                f.render_widget(table, area);
            }
            PreviewSpec::Banner { text, subtitle, accent } => {
                let accent = accent_color(accent.as_deref());
                let mut lines = vec![Line::from(Span::styled(
                    text.as_str(),
                    Style::default().fg(accent).add_modifier(Modifier::BOLD),
                ))];
                if let Some(sub) = subtitle {
                    lines.push(Line::from(""));
                    lines.push(Line::from(Span::styled(
                        sub.as_str(),
                        Style::default().fg(Color::DarkGray),
                    )));
                }
                let height = lines.len() as u16;
                let top = area.y + area.height.saturating_sub(height) / 2;
                let centered = Rect {
                    x: area.x,
                    y: top,
                    width: area.width,
                    height: height.min(area.height),
                };
                let para = Paragraph::new(lines).alignment(Alignment::Center);
                f.render_widget(para, centered);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn buffer_line(terminal: &Terminal<TestBackend>, y: u16) -> String {
        let buf = terminal.backend().buffer();
        (0..buf.area.width)
            .map(|x| buf.cell((x, y)).map(|c| c.symbol()).unwrap_or(" "))
            .collect()
    }

    #[test]
    fn test_card_parses_from_toml() {
        let spec: PreviewSpec = toml::from_str(
            r#"
            kind = "card"
            title = "Welcome"
            body = "hello"
            accent = "green"
            "#,
        )
        .unwrap();
        assert_eq!(
            spec,
            PreviewSpec::Card {
                title: "Welcome".to_string(),
                body: "hello".to_string(),
                accent: Some("green".to_string()),
            }
        );
    }

    #[test]
    fn test_unknown_kind_is_a_parse_error() {
        let result: Result<PreviewSpec, _> = toml::from_str(
            r#"
            kind = "hologram"
            title = "nope"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_accent_color_fallback() {
        assert_eq!(accent_color(Some("green")), Color::Green);
        assert_eq!(accent_color(Some("Chartreuse")), Color::Cyan);
        assert_eq!(accent_color(None), Color::Cyan);
    }

    #[test]
    fn test_card_renders_title_and_body() {
        let spec = PreviewSpec::Card {
            title: "Demo".to_string(),
            body: "line one".to_string(),
            accent: None,
        };
        let mut terminal = Terminal::new(TestBackend::new(30, 6)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                spec.render(f, area);
            })
            .unwrap();
        assert!(buffer_line(&terminal, 0).contains("Demo"));
        assert!(buffer_line(&terminal, 1).contains("line one"));
    }

    #[test]
    fn test_gauge_out_of_range_ratio_is_clamped() {
        let spec = PreviewSpec::Gauge {
            title: "Progress".to_string(),
            ratio: 1.7,
            label: None,
            accent: None,
        };
        let mut terminal = Terminal::new(TestBackend::new(30, 9)).unwrap();
        // Must not panic even though the module declared ratio > 1
        terminal
            .draw(|f| {
                let area = f.area();
                spec.render(f, area);
            })
            .unwrap();
    }

    #[test]
    fn test_banner_is_vertically_centered() {
        let spec = PreviewSpec::Banner {
            text: "SHIP IT".to_string(),
            subtitle: None,
            accent: None,
        };
        let mut terminal = Terminal::new(TestBackend::new(20, 7)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                spec.render(f, area);
            })
            .unwrap();
        assert!(buffer_line(&terminal, 3).contains("SHIP IT"));
        assert!(!buffer_line(&terminal, 0).contains("SHIP IT"));
    }
}
