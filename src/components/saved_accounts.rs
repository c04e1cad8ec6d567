//! Saved accounts component: the user's local bookmarks.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use tokio::sync::mpsc::UnboundedSender;

use crate::{action::Action, domain::account::format_nqt, infra::store::SavedAccount, tui::Frame};

use super::Component;

pub struct SavedAccountsComponent {
    action_tx: UnboundedSender<Action>,
    pub accounts: Vec<SavedAccount>,
    list_state: ListState,
    pub selected_index: usize,
}

impl SavedAccountsComponent {
    pub fn new(action_tx: UnboundedSender<Action>) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            action_tx,
            accounts: Vec::new(),
            list_state,
            selected_index: 0,
        }
    }

    pub fn set_accounts(&mut self, accounts: Vec<SavedAccount>) {
        self.accounts = accounts;
        if !self.accounts.is_empty() && self.selected_index >= self.accounts.len() {
            self.selected_index = self.accounts.len() - 1;
        }
        self.list_state.select(Some(self.selected_index));
    }

    fn next(&mut self) {
        if self.accounts.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => {
                if i >= self.accounts.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.selected_index = i;
        self.list_state.select(Some(i));
    }

    fn previous(&mut self) {
        if self.accounts.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => {
                if i == 0 {
                    self.accounts.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.selected_index = i;
        self.list_state.select(Some(i));
    }

    fn selected(&self) -> Option<&SavedAccount> {
        self.accounts.get(self.selected_index)
    }
}

impl Component for SavedAccountsComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Up => self.previous(),
            KeyCode::Down => self.next(),
            KeyCode::Enter => {
                if let Some(saved) = self.selected() {
                    self.action_tx.send(Action::ViewAccount(saved.address))?;
                }
            }
            KeyCode::Char('d') => {
                if let Some(saved) = self.selected() {
                    self.action_tx
                        .send(Action::DeleteSavedAccount(saved.address))?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::vertical([Constraint::Min(0), Constraint::Length(2)]).split(area);

        let items: Vec<ListItem> = self
            .accounts
            .iter()
            .enumerate()
            .map(|(i, saved)| {
                let style = if i == self.selected_index {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                let name = saved.last_known_name.as_deref().unwrap_or("-");
                let balance = saved
                    .last_known_balance
                    .map(format_nqt)
                    .unwrap_or_else(|| "-".to_string());
                ListItem::new(Line::from(Span::styled(
                    format!("{:<22} {:<24} {}", saved.address, name, balance),
                    style,
                )))
            })
            .collect();

        let title = format!("Saved accounts ({})", self.accounts.len());
        let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
        f.render_stateful_widget(list, chunks[0], &mut self.list_state);

        let hints = Paragraph::new(Line::from(Span::styled(
            "[Enter] Open  [d] Delete  [Up/Down] Select",
            Style::default().fg(Color::DarkGray),
        )));
        f.render_widget(hints, chunks[1]);
    }
}
