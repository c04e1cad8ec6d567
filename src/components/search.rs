use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use tokio::sync::mpsc::UnboundedSender;

use crate::{
    action::Action,
    domain::{
        account::AccountId,
        block::{BlockId, BlockQuery},
    },
    tui::Frame,
};

use super::Component;

/// What the entered number is looked up as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchTarget {
    Account,
    BlockHeight,
    BlockId,
}

const TARGETS: [(SearchTarget, &str); 3] = [
    (SearchTarget::Account, "Account ID"),
    (SearchTarget::BlockHeight, "Block height"),
    (SearchTarget::BlockId, "Block ID"),
];

pub struct SearchComponent {
    action_tx: UnboundedSender<Action>,
    pub input: String,
    pub target_index: usize,
    list_state: ListState,
}

impl SearchComponent {
    pub fn new(action_tx: UnboundedSender<Action>) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            action_tx,
            input: String::new(),
            target_index: 0,
            list_state,
        }
    }

    pub fn target(&self) -> SearchTarget {
        TARGETS[self.target_index].0
    }

    fn next_target(&mut self) {
        self.target_index = (self.target_index + 1) % TARGETS.len();
        self.list_state.select(Some(self.target_index));
    }

    fn previous_target(&mut self) {
        self.target_index = if self.target_index == 0 {
            TARGETS.len() - 1
        } else {
            self.target_index - 1
        };
        self.list_state.select(Some(self.target_index));
    }

    pub fn paste(&mut self, text: &str) {
        self.input.push_str(text.trim());
    }

    fn submit(&mut self) -> Result<()> {
        let (target, label) = TARGETS[self.target_index];
        let Ok(number) = self.input.trim().parse::<u64>() else {
            self.action_tx
                .send(Action::Error(format!("Not a valid {label}: {}", self.input)))?;
            return Ok(());
        };
        let action = match target {
            SearchTarget::Account => Action::ViewAccount(AccountId(number)),
            SearchTarget::BlockHeight => Action::ViewBlock(BlockQuery::Height(number)),
            SearchTarget::BlockId => Action::ViewBlock(BlockQuery::Id(BlockId(number))),
        };
        self.input.clear();
        self.action_tx.send(action)?;
        Ok(())
    }
}

impl Component for SearchComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Up => self.previous_target(),
            KeyCode::Down => self.next_target(),
            KeyCode::Char(c) if c.is_ascii_digit() => self.input.push(c),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Esc => self.input.clear(),
            KeyCode::Enter => self.submit()?,
            _ => {}
        }
        Ok(())
    }

    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::horizontal([Constraint::Length(24), Constraint::Min(0)]).split(area);

        let items: Vec<ListItem> = TARGETS
            .iter()
            .enumerate()
            .map(|(i, (_, label))| {
                let style = if i == self.target_index {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(Span::styled(*label, style)))
            })
            .collect();
        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Look up"),
        );
        f.render_stateful_widget(list, chunks[0], &mut self.list_state);

        let input_chunks =
            Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).split(chunks[1]);
        let input = Paragraph::new(Line::from(vec![
            Span::raw(self.input.as_str()),
            Span::styled("_", Style::default().fg(Color::DarkGray)),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{} (digits only)", TARGETS[self.target_index].1)),
        );
        f.render_widget(input, input_chunks[0]);

        let hints = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "[Enter] Open  [Esc] Clear  [Up/Down] Target",
                Style::default().fg(Color::DarkGray),
            )),
        ]);
        f.render_widget(hints, input_chunks[1]);
    }
}
