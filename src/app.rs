use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::prelude::Rect;
use tracing::{debug, info};

use crate::catalog::{Catalog, Entry, Filter};
use crate::render::{footer_action_at, FooterAction, PanelHit, PanelLayout};
use crate::theme::{Theme, ThemeMode};

/// One UI session: the catalog plus the filter and theme cells, and the
/// selection the keyboard acts on.
pub struct AppState {
    pub(crate) catalog: Catalog,
    pub(crate) filter: Filter,
    pub(crate) theme: Theme,
    pub(crate) title: String,
    selected: usize,
    viewport: Rect,
    status_message: Option<String>,
    pub(crate) should_quit: bool,
}

impl AppState {
    pub fn new(title: String, catalog: Catalog, filter: Filter, theme_mode: ThemeMode) -> Self {
        AppState {
            catalog,
            filter,
            theme: Theme::for_mode(theme_mode),
            title,
            selected: 0,
            viewport: Rect::new(0, 0, 80, 24),
            status_message: None,
            should_quit: false,
        }
    }

    pub fn theme_mode(&self) -> ThemeMode {
        self.theme.mode
    }

    pub fn projection(&self) -> impl Iterator<Item = &Entry> + Clone + '_ {
        self.catalog.list(self.filter)
    }

    pub fn projection_len(&self) -> usize {
        self.projection().count()
    }

    pub fn selected_index(&self) -> Option<usize> {
        let len = self.projection_len();
        if len == 0 {
            None
        } else {
            Some(self.selected.min(len - 1))
        }
    }

    pub fn selected_entry(&self) -> Option<&Entry> {
        self.selected_index()
            .and_then(|index| self.projection().nth(index))
    }

    fn entry_id_at(&self, index: usize) -> Option<String> {
        self.projection()
            .nth(index)
            .map(|entry| entry.item.id.clone())
    }

    pub fn set_viewport(&mut self, area: Rect) {
        self.viewport = area;
    }

    pub fn layout(&self) -> PanelLayout {
        PanelLayout::compute(
            self.viewport,
            self.theme.mode,
            self.projection_len(),
            self.selected_index(),
        )
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected_index().unwrap_or(0);
    }

    pub fn toggle(&mut self, id: &str) {
        let Some(active) = self.catalog.toggle(id) else {
            debug!(id, "toggle ignored for unknown extension");
            return;
        };
        let name = self
            .catalog
            .get(id)
            .map(|entry| entry.item.name.clone())
            .unwrap_or_default();
        info!(id, active, "extension toggled");
        let verb = if active { "enabled" } else { "disabled" };
        self.set_status(Some(format!("{name} {verb}")));
        self.clamp_selection();
    }

    pub fn remove(&mut self, id: &str) {
        let Some(item) = self.catalog.remove(id) else {
            debug!(id, "remove ignored for unknown extension");
            return;
        };
        info!(id, remaining = self.catalog.len(), "extension removed");
        self.set_status(Some(format!("{} removed", item.name)));
        self.clamp_selection();
    }

    pub fn set_filter(&mut self, filter: Filter) {
        if self.filter != filter {
            info!(filter = filter.label(), "filter selected");
        }
        self.filter = filter;
        self.clamp_selection();
    }

    pub fn cycle_filter(&mut self) {
        self.set_filter(self.filter.next());
    }

    pub fn toggle_theme(&mut self) {
        self.theme = Theme::for_mode(self.theme.mode.toggle());
        info!(theme = self.theme.mode.label(), "theme switched");
    }

    fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_entry().map(|entry| entry.item.id.clone()) {
            self.toggle(&id);
        }
    }

    fn remove_selected(&mut self) {
        if let Some(id) = self.selected_entry().map(|entry| entry.item.id.clone()) {
            self.remove(&id);
        }
    }

    fn move_selection_left(&mut self) {
        let len = self.projection_len();
        if len == 0 {
            return;
        }
        let current = self.selected.min(len - 1);
        self.selected = if current == 0 { len - 1 } else { current - 1 };
    }

    fn move_selection_right(&mut self) {
        let len = self.projection_len();
        if len == 0 {
            return;
        }
        self.selected = (self.selected.min(len - 1) + 1) % len;
    }

    fn move_selection_up(&mut self) {
        let columns = usize::from(self.layout().columns.max(1));
        if let Some(current) = self.selected_index() {
            self.selected = current.saturating_sub(columns);
        }
    }

    fn move_selection_down(&mut self) {
        let columns = usize::from(self.layout().columns.max(1));
        if let Some(current) = self.selected_index() {
            let len = self.projection_len();
            if current + columns < len {
                self.selected = current + columns;
            } else {
                self.selected = len - 1;
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true
            }
            KeyCode::Left | KeyCode::Char('h') => self.move_selection_left(),
            KeyCode::Right | KeyCode::Char('l') => self.move_selection_right(),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection_up(),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection_down(),
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_selected(),
            KeyCode::Char('d') | KeyCode::Char('x') | KeyCode::Delete => self.remove_selected(),
            KeyCode::Char('a') | KeyCode::Char('1') => self.set_filter(Filter::All),
            KeyCode::Char('2') => self.set_filter(Filter::Active),
            KeyCode::Char('i') | KeyCode::Char('3') => self.set_filter(Filter::Inactive),
            KeyCode::Tab | KeyCode::Char('f') => self.cycle_filter(),
            KeyCode::Char('t') => self.toggle_theme(),
            _ => {}
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {}
            MouseEventKind::ScrollDown => {
                self.move_selection_down();
                return;
            }
            MouseEventKind::ScrollUp => {
                self.move_selection_up();
                return;
            }
            _ => return,
        }
        let layout = self.layout();
        let Some(target) = layout.hit(mouse.column, mouse.row) else {
            return;
        };
        match target {
            PanelHit::Theme => self.toggle_theme(),
            PanelHit::Filter(filter) => self.set_filter(filter),
            PanelHit::Card(index) => self.selected = index,
            PanelHit::Switch(index) => {
                self.selected = index;
                if let Some(id) = self.entry_id_at(index) {
                    self.toggle(&id);
                }
            }
            PanelHit::Remove(index) => {
                if let Some(id) = self.entry_id_at(index) {
                    self.selected = index;
                    self.remove(&id);
                }
            }
            PanelHit::Footer => {
                if let Some(action) = footer_action_at(mouse.column, layout.footer, &self.theme) {
                    self.execute_footer_action(action);
                }
            }
        }
    }

    fn execute_footer_action(&mut self, action: FooterAction) {
        match action {
            FooterAction::Quit => self.should_quit = true,
            FooterAction::Toggle => self.toggle_selected(),
            FooterAction::Remove => self.remove_selected(),
            FooterAction::Filter => self.cycle_filter(),
            FooterAction::Theme => self.toggle_theme(),
        }
    }

    pub fn set_status(&mut self, message: Option<String>) {
        self.status_message = message;
    }

    pub fn status_text(&self) -> String {
        let total = self.projection_len();
        let current = self.selected_index().map(|index| index + 1).unwrap_or(0);
        let mut text = format!(
            "Extension {}/{} | Filter: {} | Theme: {}",
            current,
            total,
            self.filter.label(),
            self.theme.mode.label()
        );
        if let Some(msg) = &self.status_message {
            text.push_str(" | ");
            text.push_str(msg);
        }
        text
    }
}
