//! Block details component.

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
    domain::{account::format_nqt, block::BlockWithGenerator},
    viewmodel::{block_details::BlockDetailsViewModel, FetchState},
    tui::Frame,
};

use super::Component;

const NOT_SET: &str = "(not set)";

pub struct BlockDetailsComponent {
    action_tx: UnboundedSender<Action>,
    vm: Option<BlockDetailsViewModel>,
}

impl BlockDetailsComponent {
    pub fn new(action_tx: UnboundedSender<Action>) -> Self {
        Self {
            action_tx,
            vm: None,
        }
    }

    /// Replace the current screen. The previous view-model is dropped, which
    /// aborts its outstanding fetch.
    pub fn show(&mut self, vm: BlockDetailsViewModel) {
        self.vm = Some(vm);
    }

    pub fn view_model(&self) -> Option<&BlockDetailsViewModel> {
        self.vm.as_ref()
    }

    /// Format a unix timestamp relative to now, falling back to the raw
    /// value for anything older than a week.
    fn format_timestamp(unix: u64) -> String {
        use std::time::{Duration, UNIX_EPOCH};

        let datetime = UNIX_EPOCH + Duration::from_secs(unix);
        if let Ok(elapsed) = std::time::SystemTime::now().duration_since(datetime) {
            let secs = elapsed.as_secs();
            if secs < 60 {
                return "just now".to_string();
            } else if secs < 3600 {
                return format!("{} min ago", secs / 60);
            } else if secs < 86400 {
                return format!("{} hours ago", secs / 3600);
            } else if secs < 604800 {
                return format!("{} days ago", secs / 86400);
            }
        }

        format!("unix {unix}")
    }

    fn format_payload_size(bytes: u32) -> String {
        if bytes < 1024 {
            format!("{bytes} bytes")
        } else {
            format!("{:.2} KB", bytes as f64 / 1024.0)
        }
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

    fn loaded_lines(block: &BlockWithGenerator) -> Vec<Line<'static>> {
        let generator = &block.generator;
        let generator_text = format!(
            "{} ({})",
            generator.account.display_address(),
            generator.account.name.as_deref().unwrap_or(NOT_SET)
        );
        let recipient_text = match &generator.reward_recipient {
            Some(recipient) if generator.recipient_is_self() => {
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
            Self::field("Height", block.block.height.to_string()),
            Self::field("Block ID", block.block.block_id.to_string()),
            Self::field(
                "Timestamp",
                Self::format_timestamp(block.block.unix_timestamp()),
            ),
            Self::field(
                "Transactions",
                block.block.number_of_transactions.to_string(),
            ),
            Self::field("Total", format_nqt(block.block.total_amount_nqt)),
            Self::field("Fee", format_nqt(block.block.total_fee_nqt)),
            Self::field(
                "Size",
                Self::format_payload_size(block.block.payload_length),
            ),
            Self::field("Generator", generator_text),
            Self::field("Reward recipient", recipient_text),
        ]
    }
}

impl Component for BlockDetailsComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        let Some(vm) = &self.vm else {
            return Ok(());
        };
        if key.code == KeyCode::Char('g')
            && let FetchState::Loaded(block) = vm.block()
        {
            self.action_tx
                .send(Action::ViewAccount(block.generator.account.account))?;
        }
        Ok(())
    }

    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let block_widget = Block::default().borders(Borders::ALL).title("Block");

        let Some(vm) = &self.vm else {
            let empty = Paragraph::new("No block selected. Use the Search tab to look one up.")
                .style(Style::default().fg(Color::DarkGray))
                .block(block_widget);
            f.render_widget(empty, area);
            return;
        };

        let mut lines = match vm.block() {
            FetchState::Loading => vec![Line::from(Span::styled(
                "Loading...",
                Style::default().fg(Color::Yellow),
            ))],
            FetchState::Failed => vec![Line::from(Span::styled(
                "Failed to load block. Check the node connection and try again.",
                Style::default().fg(Color::Red),
            ))],
            FetchState::Loaded(block) => Self::loaded_lines(&block),
        };

        if vm.block().loaded().is_some() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "[g] View generator account",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )));
        }

        f.render_widget(Paragraph::new(lines).block(block_widget), area);
    }
}
