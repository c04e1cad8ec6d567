use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tokio::sync::mpsc::UnboundedSender;

use crate::{
    action::Action,
    domain::account::{format_nqt, AccountWithRewardRecipient},
    viewmodel::{account_details::AccountDetailsViewModel, FetchState},
    tui::Frame,
};

use super::Component;

const NOT_SET: &str = "(not set)";

pub struct AccountDetailsComponent {
    action_tx: UnboundedSender<Action>,
    vm: Option<AccountDetailsViewModel>,
}

impl AccountDetailsComponent {
    pub fn new(action_tx: UnboundedSender<Action>) -> Self {
        Self {
            action_tx,
            vm: None,
        }
    }

    /// Replace the current screen. The previous view-model is dropped, which
    /// aborts its outstanding fetch.
    pub fn show(&mut self, vm: AccountDetailsViewModel) {
        self.vm = Some(vm);
    }

    pub fn view_model(&self) -> Option<&AccountDetailsViewModel> {
        self.vm.as_ref()
    }

    fn field(label: &str, value: String) -> Line<'static> {
        Line::from(vec![
            Span::styled(
                format!("{label:<18}"),
                Style::default().fg(Color::DarkGray),
            ),
            Span::raw(value),
        ])
    }

    fn loaded_lines(account: &AccountWithRewardRecipient) -> Vec<Line<'static>> {
        let subject = &account.account;
        let recipient = match &account.reward_recipient {
            Some(recipient) if account.recipient_is_self() => {
                format!("{} (self)", recipient.display_address())
            }
            Some(recipient) => format!(
                "{} ({})",
                recipient.display_address(),
                recipient.name.as_deref().unwrap_or(NOT_SET)
            ),
            None => NOT_SET.to_string(),
        };

        vec![
            Self::field("Address", subject.display_address()),
            Self::field("Numeric ID", subject.account.to_string()),
            Self::field(
                "Public key",
                subject.public_key.clone().unwrap_or_else(|| NOT_SET.to_string()),
            ),
            Self::field(
                "Name",
                subject.name.clone().unwrap_or_else(|| NOT_SET.to_string()),
            ),
            Self::field(
                "Description",
                subject
                    .description
                    .clone()
                    .unwrap_or_else(|| NOT_SET.to_string()),
            ),
            Self::field("Balance", format_nqt(subject.balance_nqt)),
            Self::field("Forged balance", format_nqt(subject.forged_balance_nqt)),
            Self::field("Reward recipient", recipient),
        ]
    }
}

impl Component for AccountDetailsComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        let Some(vm) = &self.vm else {
            return Ok(());
        };
        match key.code {
            // Toggle only when the store subscription is alive.
            KeyCode::Char('s') if vm.is_saved().is_some() => {
                self.action_tx.send(Action::ToggleSaveAccount)?;
            }
            KeyCode::Char('r') => {
                if let FetchState::Loaded(account) = vm.account()
                    && let Some(recipient) = &account.reward_recipient
                    && !account.recipient_is_self()
                {
                    self.action_tx.send(Action::ViewAccount(recipient.account))?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Account");

        let Some(vm) = &self.vm else {
            let empty = Paragraph::new("No account selected. Use the Search tab to look one up.")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            f.render_widget(empty, area);
            return;
        };

        let mut lines = match vm.account() {
            FetchState::Loading => vec![Line::from(Span::styled(
                "Loading...",
                Style::default().fg(Color::Yellow),
            ))],
            FetchState::Failed => vec![Line::from(Span::styled(
                "Failed to load account. Check the node connection and try again.",
                Style::default().fg(Color::Red),
            ))],
            FetchState::Loaded(account) => Self::loaded_lines(&account),
        };

        lines.push(Line::from(""));
        let mut hints = vec![];
        match vm.is_saved() {
            Some(true) => hints.push("[s] Unsave account"),
            Some(false) => hints.push("[s] Save account"),
            // Subscription failed: the save affordance is hidden entirely.
            None => {}
        }
        if let FetchState::Loaded(account) = vm.account()
            && account.reward_recipient.is_some()
            && !account.recipient_is_self()
        {
            hints.push("[r] View reward recipient");
        }
        if !hints.is_empty() {
            lines.push(Line::from(Span::styled(
                hints.join("  "),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )));
        }

        f.render_widget(Paragraph::new(lines).block(block), area);
    }
}
