use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, ListItem, Paragraph, Wrap};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::state::{App, Resolution};
use crate::tui::TuiState;

const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min, Percentage};

    let layout = Layout::vertical([Length(1), Min(0), Length(1)]);
    let [title_area, main_area, help_area] = layout.areas(frame.area());

    let [list_area, detail_area] =
        Layout::horizontal([Percentage(40), Percentage(60)]).areas(main_area);

    // Title bar
    let title_text = if app.status_message.is_empty() {
        String::from("Atlas")
    } else {
        format!("Atlas | {}", app.status_message)
    };
    frame.render_widget(Span::raw(title_text), title_area);

    draw_country_list(frame, list_area, app, tui, spinner_frame);
    draw_detail_pane(frame, detail_area, app, spinner_frame);

    // Help line
    let help = Line::from(" ↑/↓ Navigate  Enter Select  Esc Clear  q Quit")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, help_area);
}

fn draw_country_list(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    tui: &mut TuiState,
    spinner_frame: usize,
) {
    let block = Block::bordered()
        .title(" Countries ")
        .border_style(Style::default().fg(Color::DarkGray));

    if app.directory.is_empty() {
        let text = if app.directory_error.is_some() {
            "No countries available.".to_string()
        } else {
            format!("{} Loading...", spinner_char(spinner_frame))
        };
        let empty = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let name_width = area.width.saturating_sub(4) as usize; // borders + marker
    let items: Vec<ListItem> = app
        .directory
        .iter()
        .enumerate()
        .map(|(i, country)| {
            let is_selected = app.selected.as_deref() == Some(country.code.as_str());
            let style = if i == tui.cursor {
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else if is_selected {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::Gray)
            };

            let marker = if is_selected { "* " } else { "  " };
            let name = truncate_str(&country.name, name_width);
            ListItem::new(Line::from(vec![
                Span::styled(marker, style),
                Span::styled(name, style),
            ]))
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_stateful_widget(list, area, &mut tui.list_state);
}

fn draw_detail_pane(frame: &mut Frame, area: Rect, app: &App, spinner_frame: usize) {
    let block = Block::bordered()
        .title(" Details ")
        .border_style(Style::default().fg(Color::DarkGray));

    if app.selected.is_none() {
        let placeholder = Paragraph::new("Select a country to see details.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    match &app.resolution {
        Resolution::Resolved(view) => {
            let borders = if view.border_names.is_empty() {
                "none".to_string()
            } else {
                view.border_names.join(", ")
            };
            let label = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
            let lines = vec![
                Line::from(vec![
                    Span::styled("Name:       ", label),
                    Span::raw(view.name.clone()),
                ]),
                Line::from(vec![
                    Span::styled("Capital:    ", label),
                    Span::raw(view.capital.clone()),
                ]),
                Line::from(vec![
                    Span::styled("Population: ", label),
                    Span::raw(format_population(view.population)),
                ]),
                Line::from(vec![
                    Span::styled("Borders:    ", label),
                    Span::raw(borders),
                ]),
            ];
            let detail = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
            frame.render_widget(detail, area);
        }
        // Failed renders exactly like loading: errors go to the log, the
        // pane never shows stale data or error text.
        _ => {
            let text = if app.is_resolving() {
                format!("{} Loading information...", spinner_char(spinner_frame))
            } else {
                "Loading information...".to_string()
            };
            let loading = Paragraph::new(text)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(loading, area);
        }
    }
}

fn spinner_char(frame: usize) -> char {
    SPINNER_FRAMES[frame % SPINNER_FRAMES.len()]
}

/// Formats a population count with thousands separators: 67000000 → "67,000,000".
fn format_population(population: u64) -> String {
    let digits = population.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Truncate a string to fit within `max_width` display columns, adding "..."
/// if needed. Width-aware so wide (CJK) country names don't overflow the pane.
fn truncate_str(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width - 3 {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str("...");
    out
}
