//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use std::collections::BTreeMap;
use std::sync::LazyLock;
use std::time::Instant;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Padding, Paragraph, Wrap},
};

use crate::app::{App, Screen};
use crate::audio::MediaDecoder;
use crate::config::{ControlsSettings, UiSettings};
use crate::player::Transport;
use crate::service::BackgroundStatus;

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("j/k", "up/down");
    map.insert("gg/G", "top/bottom");
    map.insert("enter", "open player");
    map.insert("b", "play in background");
    map.insert("B", "stop background");
    map.insert("space/p", "play/pause");
    map.insert("h/l", "prev/next song");
    // H/L is filled dynamically from config.
    map.insert("esc", "back to list");
    map.insert("q", "quit");
    map
});

/// Render the controls help text for `screen`, incorporating scrub seconds.
fn controls_text(screen: Screen, scrub_seconds: u64) -> String {
    let order: &[&str] = match screen {
        Screen::List => &["j/k", "gg/G", "enter", "b", "B", "q"],
        Screen::Player => &["space/p", "h/l", "H/L", "esc", "q"],
    };
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] scrub -/+{}s", scrub_seconds))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

fn background_text(background: &BackgroundStatus, app: &App) -> String {
    let Some(location) = background.location.as_ref() else {
        return "Background: idle".to_string();
    };
    let title = app
        .tracks()
        .iter()
        .find(|t| t.location() == location)
        .map_or(location.as_str(), |t| t.title());
    if background.playing {
        format!("Background: {title}")
    } else {
        format!("Background: loading {title}")
    }
}

/// Render the entire UI into the provided `frame`.
pub fn draw<D: MediaDecoder>(
    frame: &mut Frame,
    app: &App,
    player: Option<&Transport<D>>,
    background: &BackgroundStatus,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
    now: Instant,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" musicverse ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let status = {
        let mut parts: Vec<String> = Vec::new();
        if let Some(dir) = &app.current_dir {
            parts.push(format!("Dir: {}", dir));
        }
        parts.push(format!("Tracks: {}", app.presenter.len()));
        parts.push(background_text(background, app));
        if let Some(msg) = &app.status {
            parts.push(msg.clone());
        }
        parts.join(" • ")
    };
    let status_par = Paragraph::new(status)
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    match (app.screen, player) {
        (Screen::Player, Some(player)) => draw_player(frame, chunks[2], player, now),
        _ => draw_list(frame, chunks[2], app),
    }

    let footer = Paragraph::new(controls_text(app.screen, controls_settings.scrub_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);
}

fn draw_list(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL).title(" tracks ");

    if let Some(notice) = &app.notice {
        let notice = Paragraph::new(notice.as_str())
            .alignment(Alignment::Center)
            .bold()
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(notice, area);
        return;
    }

    if !app.has_tracks() {
        let empty = Paragraph::new("No music found")
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let rows = app.presenter.rows();
    // Center the selected item when possible by creating a visible window.
    // Only build ListItems for the visible window.
    let total = rows.len();
    let list_height = area.height.saturating_sub(2) as usize;
    let sel_pos = app.selected.min(total - 1);
    let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
        (0, total, sel_pos)
    } else {
        let half = list_height / 2;
        let mut start = sel_pos.saturating_sub(half);
        if start + list_height > total {
            start = total - list_height;
        }
        (start, start + list_height, sel_pos - start)
    };

    let visible_items: Vec<ListItem> = rows[start..end]
        .iter()
        .map(|row| {
            let art = if row.has_artwork { "♪ " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::raw(art),
                Span::raw(row.title.as_str()),
                Span::raw("  "),
                Span::styled(
                    row.duration.as_str(),
                    Style::default().add_modifier(Modifier::DIM),
                ),
            ]))
        })
        .collect();

    let list = List::new(visible_items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ratatui::widgets::ListState::default();
    state.select(Some(selected_pos_in_visible));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_player<D: MediaDecoder>(frame: &mut Frame, area: Rect, player: &Transport<D>, now: Instant) {
    let np = player.now_playing();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" now playing ")
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(3)])
        .split(inner);

    let artwork = match &np.artwork {
        Some(art) => format!(
            "{} ({} bytes)",
            art.mime.as_deref().unwrap_or("embedded image"),
            art.data.len()
        ),
        None => "no artwork".to_string(),
    };
    let position = if player.tracks().is_empty() {
        String::new()
    } else {
        format!("  [{}/{}]", player.current() + 1, player.tracks().len())
    };
    let info = vec![
        Line::from(vec![
            Span::raw(format!("{} ", player.spinner().glyph(now))),
            Span::raw(np.title.as_str()).bold(),
            Span::raw(position),
        ]),
        Line::from(np.artist.as_str()),
        Line::from(Span::styled(
            artwork,
            Style::default().add_modifier(Modifier::DIM),
        )),
        Line::from(player.state().label()),
    ];
    frame.render_widget(Paragraph::new(info).wrap(Wrap { trim: true }), parts[0]);

    let label = if np.total_label.is_empty() {
        np.elapsed_label.clone()
    } else {
        format!("{} / {}", np.elapsed_label, np.total_label)
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .ratio(player.seek_bar().ratio())
        .label(label);
    frame.render_widget(gauge, parts[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::fake::FakeDecoder;
    use ratatui::{Terminal, backend::TestBackend};

    fn render(app: &App) -> String {
        let backend = TestBackend::new(80, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                draw::<FakeDecoder>(
                    f,
                    app,
                    None,
                    &BackgroundStatus::default(),
                    &UiSettings::default(),
                    &ControlsSettings::default(),
                    Instant::now(),
                )
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn controls_text_depends_on_screen() {
        let list = controls_text(Screen::List, 5);
        assert!(list.contains("[b] play in background"));
        assert!(!list.contains("scrub"));

        let player = controls_text(Screen::Player, 7);
        assert!(player.contains("[H/L] scrub -/+7s"));
        assert!(player.contains("[esc] back to list"));
    }

    #[test]
    fn notice_replaces_the_list() {
        let app = App::with_notice("Storage permission required");
        let screen = render(&app);
        assert!(screen.contains("Storage permission required"));
    }

    #[test]
    fn empty_library_says_so() {
        let app = App::new(Default::default());
        assert!(render(&app).contains("No music found"));
    }
}
