use std::io::{self, Write};

use ratatui::layout::{Constraint, Direction, Layout, Margin};
use ratatui::prelude::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::app::AppState;
use crate::catalog::{Catalog, Entry, Filter};
use crate::theme::{color_from_hex, Theme, ThemeMode};

pub const CARD_HEIGHT: u16 = 7;
const CARD_GAP: u16 = 1;
const BODY_MARGIN: u16 = 2;
const REMOVE_LABEL: &str = "[ Remove ]";
const SWITCH_ON: &str = "[ ON ●]";
const SWITCH_OFF: &str = "[● OFF]";
const LIST_HEADING: &str = "Extensions List";

pub fn columns_for_width(width: u16) -> u16 {
    if width < 60 {
        1
    } else if width < 100 {
        2
    } else {
        3
    }
}

pub fn theme_button_label(mode: ThemeMode) -> String {
    format!("[ {} {} ]", mode.glyph(), mode.label())
}

fn filter_button_label(filter: Filter) -> String {
    format!(" {} ", filter.title())
}

fn text_width(text: &str) -> u16 {
    UnicodeWidthStr::width(text) as u16
}

fn hit(rect: Rect, column: u16, row: u16) -> bool {
    rect.width > 0
        && rect.height > 0
        && column >= rect.x
        && column < rect.x + rect.width
        && row >= rect.y
        && row < rect.y + rect.height
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CardLayout {
    /// Position within the current projection.
    pub index: usize,
    pub area: Rect,
    pub remove_button: Rect,
    pub switch: Rect,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelHit {
    Theme,
    Filter(Filter),
    Switch(usize),
    Remove(usize),
    Card(usize),
    Footer,
}

/// Screen geometry for one frame. Drawing and mouse handling both go through
/// this so a click always lands on what was drawn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelLayout {
    pub header: Rect,
    pub theme_button: Rect,
    pub filter_bar: Rect,
    pub filter_buttons: Vec<(Filter, Rect)>,
    pub grid: Rect,
    pub columns: u16,
    pub cards: Vec<CardLayout>,
    pub footer: Rect,
    pub status: Rect,
}

impl PanelLayout {
    pub fn compute(area: Rect, mode: ThemeMode, count: usize, selected: Option<usize>) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);
        let body = |rect: Rect| {
            rect.inner(&Margin {
                horizontal: BODY_MARGIN,
                vertical: 0,
            })
        };
        let header = body(chunks[0]);
        let filter_bar = body(chunks[2]);
        let grid = body(chunks[4]);

        let button_width = text_width(&theme_button_label(mode)).min(header.width);
        let theme_button = Rect {
            x: header.x + header.width - button_width,
            y: header.y,
            width: button_width,
            height: header.height.min(1),
        };

        let labels: Vec<(Filter, u16)> = Filter::ALL
            .iter()
            .map(|filter| (*filter, text_width(&filter_button_label(*filter))))
            .collect();
        let total: u16 = labels.iter().map(|(_, width)| width).sum::<u16>()
            + (labels.len() as u16).saturating_sub(1);
        let mut cursor = filter_bar.x + filter_bar.width.saturating_sub(total);
        let bar_end = filter_bar.x + filter_bar.width;
        let mut filter_buttons = Vec::with_capacity(labels.len());
        for (filter, width) in labels {
            let width = width.min(bar_end.saturating_sub(cursor));
            filter_buttons.push((
                filter,
                Rect {
                    x: cursor,
                    y: filter_bar.y,
                    width,
                    height: filter_bar.height.min(1),
                },
            ));
            cursor = cursor.saturating_add(width + 1).min(bar_end);
        }

        let columns = columns_for_width(grid.width);
        let cards = Self::card_grid(grid, columns, count, selected);

        PanelLayout {
            header,
            theme_button,
            filter_bar,
            filter_buttons,
            grid,
            columns,
            cards,
            footer: chunks[5],
            status: chunks[6],
        }
    }

    fn card_grid(grid: Rect, columns: u16, count: usize, selected: Option<usize>) -> Vec<CardLayout> {
        if grid.width == 0 || grid.height == 0 || count == 0 {
            return Vec::new();
        }
        let cols = usize::from(columns.max(1));
        let card_width = grid
            .width
            .saturating_sub(CARD_GAP * (columns.max(1) - 1))
            / columns.max(1);
        let rows_visible = usize::from((grid.height / CARD_HEIGHT).max(1));
        let selected_row = selected.unwrap_or(0) / cols;
        let first_row = (selected_row + 1).saturating_sub(rows_visible);

        let start = first_row * cols;
        let end = count.min((first_row + rows_visible) * cols);
        let mut cards = Vec::with_capacity(end.saturating_sub(start));
        for index in start..end {
            let row = (index / cols - first_row) as u16;
            let col = (index % cols) as u16;
            let y = grid.y + row * CARD_HEIGHT;
            let height = CARD_HEIGHT.min((grid.y + grid.height).saturating_sub(y));
            if height == 0 {
                continue;
            }
            let area = Rect {
                x: grid.x + col * (card_width + CARD_GAP),
                y,
                width: card_width,
                height,
            };
            let (remove_button, switch) = if height == CARD_HEIGHT {
                let inner = area.inner(&Margin {
                    horizontal: 1,
                    vertical: 1,
                });
                let controls_y = inner.y + inner.height.saturating_sub(1);
                let remove_width = text_width(REMOVE_LABEL).min(inner.width);
                let switch_width = text_width(SWITCH_ON).min(inner.width);
                (
                    Rect::new(inner.x, controls_y, remove_width, 1),
                    Rect::new(
                        inner.x + inner.width - switch_width,
                        controls_y,
                        switch_width,
                        1,
                    ),
                )
            } else {
                (Rect::default(), Rect::default())
            };
            cards.push(CardLayout {
                index,
                area,
                remove_button,
                switch,
            });
        }
        cards
    }

    pub fn hit(&self, column: u16, row: u16) -> Option<PanelHit> {
        if hit(self.theme_button, column, row) {
            return Some(PanelHit::Theme);
        }
        if let Some((filter, _)) = self
            .filter_buttons
            .iter()
            .find(|(_, rect)| hit(*rect, column, row))
        {
            return Some(PanelHit::Filter(*filter));
        }
        for card in &self.cards {
            if hit(card.switch, column, row) {
                return Some(PanelHit::Switch(card.index));
            }
            if hit(card.remove_button, column, row) {
                return Some(PanelHit::Remove(card.index));
            }
            if hit(card.area, column, row) {
                return Some(PanelHit::Card(card.index));
            }
        }
        if hit(self.footer, column, row) {
            return Some(PanelHit::Footer);
        }
        None
    }
}

pub fn render(frame: &mut Frame, app: &AppState) {
    let size = frame.size();
    let theme = &app.theme;
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.background).fg(theme.text)),
        size,
    );

    let layout = PanelLayout::compute(
        size,
        app.theme_mode(),
        app.projection_len(),
        app.selected_index(),
    );

    render_header(frame, &layout, app);
    render_filter_bar(frame, &layout, app);
    render_cards(frame, &layout, app);

    let footer = Paragraph::new(footer_line_data(theme).line)
        .alignment(Alignment::Center)
        .style(Style::default().bg(theme.surface));
    frame.render_widget(footer, layout.footer);

    let status = Paragraph::new(app.status_text())
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .bg(theme.accent)
                .fg(theme.accent_text)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(status, layout.status);
}

fn button_style(theme: &Theme) -> Style {
    Style::default().bg(theme.button).fg(theme.text)
}

/// Bracketed labels get their brackets drawn in the button border color.
fn button_line(label: &str, theme: &Theme) -> Line<'static> {
    let border = Style::default().fg(theme.button_border);
    match label
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        Some(inner) => Line::from(vec![
            Span::styled("[", border),
            Span::raw(inner.to_string()),
            Span::styled("]", border),
        ]),
        None => Line::from(label.to_string()),
    }
}

fn render_header(frame: &mut Frame, layout: &PanelLayout, app: &AppState) {
    let theme = &app.theme;
    let title = Line::from(vec![
        Span::styled("■", Style::default().fg(theme.accent)),
        Span::raw(" "),
        Span::styled(app.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
    ]);
    frame.render_widget(Paragraph::new(title), layout.header);
    frame.render_widget(
        Paragraph::new(button_line(&theme_button_label(app.theme_mode()), theme))
            .style(button_style(theme)),
        layout.theme_button,
    );
}

fn render_filter_bar(frame: &mut Frame, layout: &PanelLayout, app: &AppState) {
    let theme = &app.theme;
    frame.render_widget(
        Paragraph::new(LIST_HEADING).style(Style::default().add_modifier(Modifier::BOLD)),
        layout.filter_bar,
    );
    for (filter, rect) in &layout.filter_buttons {
        let style = if *filter == app.filter {
            Style::default()
                .bg(theme.accent)
                .fg(theme.accent_text)
                .add_modifier(Modifier::BOLD)
        } else {
            button_style(theme)
        };
        frame.render_widget(
            Paragraph::new(filter_button_label(*filter)).style(style),
            *rect,
        );
    }
}

fn render_cards(frame: &mut Frame, layout: &PanelLayout, app: &AppState) {
    let grid = layout.grid;
    if grid.width == 0 || grid.height == 0 {
        return;
    }
    if layout.cards.is_empty() {
        let message_area = Rect {
            y: grid.y + (grid.height / 3).min(2),
            height: 1,
            ..grid
        };
        let message = Paragraph::new(app.filter.empty_message())
            .alignment(Alignment::Center)
            .style(Style::default().fg(app.theme.empty));
        frame.render_widget(message, message_area);
        return;
    }

    let selected = app.selected_index();
    let first = layout.cards[0].index;
    let entries = app.projection().skip(first);
    for (card, entry) in layout.cards.iter().zip(entries) {
        render_card(frame, card, entry, selected == Some(card.index), &app.theme);
    }
}

fn render_card(frame: &mut Frame, card: &CardLayout, entry: &Entry, selected: bool, theme: &Theme) {
    let border_style = if selected {
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.card_border)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style)
        .style(Style::default().bg(theme.card).fg(theme.text));
    let inner = block.inner(card.area);
    frame.render_widget(block, card.area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let item = &entry.item;
    let swatch = color_from_hex(item.accent.hex()).unwrap_or(theme.button);
    let name_line = Line::from(vec![
        Span::styled(
            format!(" {} ", item.icon),
            Style::default().bg(swatch).fg(theme.swatch_text),
        ),
        Span::raw(" "),
        Span::styled(item.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
    ]);
    frame.render_widget(Paragraph::new(name_line), Rect { height: 1, ..inner });

    if inner.height > 1 {
        let description_area = Rect {
            y: inner.y + 1,
            height: (inner.height - 1).min(2),
            ..inner
        };
        let description = Paragraph::new(item.description.clone())
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(theme.muted));
        frame.render_widget(description, description_area);
    }

    if card.remove_button.width == 0 {
        return;
    }
    let divider_area = Rect {
        y: card.remove_button.y - 1,
        height: 1,
        ..inner
    };
    frame.render_widget(
        Paragraph::new("─".repeat(usize::from(inner.width)))
            .style(Style::default().fg(theme.card_border)),
        divider_area,
    );
    frame.render_widget(
        Paragraph::new(button_line(REMOVE_LABEL, theme)).style(button_style(theme)),
        card.remove_button,
    );
    let switch = if entry.active {
        Paragraph::new(SWITCH_ON).style(
            Style::default()
                .bg(theme.accent)
                .fg(theme.accent_text)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Paragraph::new(SWITCH_OFF).style(Style::default().bg(theme.button).fg(theme.muted))
    };
    frame.render_widget(switch, card.switch);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FooterAction {
    Quit,
    Toggle,
    Remove,
    Filter,
    Theme,
}

#[derive(Clone, Copy)]
struct FooterShortcut {
    key: &'static str,
    label: &'static str,
    action: FooterAction,
}

struct FooterSegment {
    start: u16,
    end: u16,
    action: FooterAction,
}

pub struct FooterLineData {
    line: Line<'static>,
    segments: Vec<FooterSegment>,
    total_width: u16,
}

const FOOTER_SHORTCUTS: &[FooterShortcut] = &[
    FooterShortcut {
        key: "q",
        label: " Exit",
        action: FooterAction::Quit,
    },
    FooterShortcut {
        key: "␣",
        label: " Toggle",
        action: FooterAction::Toggle,
    },
    FooterShortcut {
        key: "d",
        label: " Remove",
        action: FooterAction::Remove,
    },
    FooterShortcut {
        key: "f",
        label: " Filter",
        action: FooterAction::Filter,
    },
    FooterShortcut {
        key: "t",
        label: " Theme",
        action: FooterAction::Theme,
    },
];

pub fn footer_line_data(theme: &Theme) -> FooterLineData {
    let shortcut_style = Style::default()
        .fg(theme.accent)
        .bg(theme.surface)
        .add_modifier(Modifier::BOLD);
    let label_style = Style::default().fg(theme.text).bg(theme.surface);
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut segments = Vec::new();
    let mut cursor: u16 = 0;
    for (index, shortcut) in FOOTER_SHORTCUTS.iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled(" | ", label_style));
            cursor = cursor.saturating_add(3);
        }
        let entry_start = cursor;
        spans.push(Span::styled(shortcut.key, shortcut_style));
        spans.push(Span::styled(shortcut.label, label_style));
        let entry_end = entry_start
            .saturating_add(text_width(shortcut.key))
            .saturating_add(text_width(shortcut.label));
        segments.push(FooterSegment {
            start: entry_start,
            end: entry_end,
            action: shortcut.action,
        });
        cursor = entry_end;
    }
    FooterLineData {
        line: Line::from(spans),
        segments,
        total_width: cursor,
    }
}

/// Footer text is centered, so the click column is shifted back before the
/// segment lookup.
pub fn footer_action_at(column: u16, footer_area: Rect, theme: &Theme) -> Option<FooterAction> {
    let line_data = footer_line_data(theme);
    if line_data.segments.is_empty() || line_data.total_width == 0 {
        return None;
    }
    if footer_area.width == 0 || footer_area.height == 0 {
        return None;
    }
    let text_width = line_data.total_width.min(footer_area.width);
    let mut start_x = footer_area.x;
    if footer_area.width > text_width {
        start_x += (footer_area.width - text_width) / 2;
    }
    if column < start_x || column >= start_x + text_width {
        return None;
    }
    let relative = column - start_x;
    line_data
        .segments
        .iter()
        .find(|segment| relative >= segment.start && relative < segment.end)
        .map(|segment| segment.action)
}

/// Plain-text listing used by `--print`, closed by a one-line activation
/// summary over the whole catalog.
pub fn write_listing<W: Write>(out: &mut W, catalog: &Catalog, filter: Filter) -> io::Result<()> {
    let mut projection = catalog.list(filter).peekable();
    if projection.peek().is_none() {
        writeln!(out, "{}", filter.empty_message())?;
    }
    for entry in projection {
        let state = if entry.active { "active" } else { "inactive" };
        writeln!(
            out,
            "{:>4}  {:<16} {:<8}  {}",
            entry.item.id, entry.item.name, state, entry.item.description
        )?;
    }
    let active = catalog.activations().filter(|(_, active)| *active).count();
    writeln!(out, "-- {} of {} extensions active", active, catalog.len())
}
