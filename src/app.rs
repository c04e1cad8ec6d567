use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{error, info};

use crate::{
    action::Action,
    cli::Args,
    components::{
        account_details::AccountDetailsComponent, block_details::BlockDetailsComponent,
        saved_accounts::SavedAccountsComponent, search::SearchComponent, Component,
    },
    config::Config,
    domain::{
        account::AccountId,
        block::{BlockId, BlockQuery},
    },
    infra::{
        node::NodeClient,
        store::{Store, StoreError},
    },
    tui::{Event, Tui},
    viewmodel::{account_details::AccountDetailsViewModel, block_details::BlockDetailsViewModel},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Search,
    Account,
    Block,
    Saved,
}

impl Tab {
    pub fn all() -> [Tab; 4] {
        [Tab::Search, Tab::Account, Tab::Block, Tab::Saved]
    }

    pub fn title(&self) -> Line<'static> {
        match self {
            Tab::Search => Line::from("Search [1]"),
            Tab::Account => Line::from("Account [2]"),
            Tab::Block => Line::from("Block [3]"),
            Tab::Saved => Line::from("Saved [4]"),
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Search => 0,
            Tab::Account => 1,
            Tab::Block => 2,
            Tab::Saved => 3,
        }
    }

    pub fn from_index(index: usize) -> Tab {
        match index {
            1 => Tab::Account,
            2 => Tab::Block,
            3 => Tab::Saved,
            _ => Tab::Search,
        }
    }
}

pub struct App {
    pub should_quit: bool,
    pub config: Config,
    pub active_tab: Tab,
    pub action_tx: UnboundedSender<Action>,
    pub action_rx: UnboundedReceiver<Action>,
    pub tui: Tui,
    pub node: NodeClient,
    pub store: Store,
    pub search_component: SearchComponent,
    pub account_component: AccountDetailsComponent,
    pub block_component: BlockDetailsComponent,
    pub saved_component: SavedAccountsComponent,
    pub status_message: String,
}

impl App {
    pub fn new(args: &Args) -> Result<Self> {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let config = Config::new(args.network.as_deref(), args.node_url.as_deref());
        let store = Store::new(&config.network.name)?;
        let node = NodeClient::new(&config);

        let search_component = SearchComponent::new(action_tx.clone());
        let account_component = AccountDetailsComponent::new(action_tx.clone());
        let block_component = BlockDetailsComponent::new(action_tx.clone());
        let saved_component = SavedAccountsComponent::new(action_tx.clone());

        let tui = Tui::new()?
            .tick_rate(args.tick_rate)
            .frame_rate(args.frame_rate);

        // Launch parameters: open a detail screen directly when one was
        // requested on the command line.
        if let Some(account) = args.account {
            action_tx.send(Action::ViewAccount(AccountId(account)))?;
        } else if let Some(query) =
            BlockQuery::from_params(args.block_height, args.block_id.map(BlockId))
        {
            action_tx.send(Action::ViewBlock(query))?;
        }

        Ok(Self {
            should_quit: false,
            config,
            active_tab: Tab::Search,
            action_tx,
            action_rx,
            tui,
            node,
            store,
            search_component,
            account_component,
            block_component,
            saved_component,
            status_message: "Ready".to_string(),
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        self.tui.enter()?;

        info!("using node {}", self.node.node_url());
        self.refresh_saved_accounts();

        loop {
            if let Some(event) = self.tui.next().await {
                self.handle_event(event)?;
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.handle_action(action)?;
            }

            if self.should_quit {
                break;
            }
        }

        self.tui.exit()?;
        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Tick => {
                self.action_tx.send(Action::Tick)?;
            }
            Event::Render => {
                self.draw_ui()?;
            }
            Event::Key(key_event) => {
                self.handle_key_event(key_event)?;
            }
            Event::Resize(w, h) => {
                self.action_tx.send(Action::Resize(w, h))?;
            }
            Event::Paste(text) => {
                if self.active_tab == Tab::Search {
                    self.search_component.paste(&text);
                }
            }
            Event::Init => {
                info!("Application initialized");
            }
            Event::Error => {}
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.action_tx.send(Action::Quit)?;
            return Ok(());
        }

        match key.code {
            KeyCode::Tab => {
                let next_index = (self.active_tab.index() + 1) % Tab::all().len();
                self.active_tab = Tab::from_index(next_index);
                return Ok(());
            }
            KeyCode::BackTab => {
                let prev_index = if self.active_tab.index() == 0 {
                    Tab::all().len() - 1
                } else {
                    self.active_tab.index() - 1
                };
                self.active_tab = Tab::from_index(prev_index);
                return Ok(());
            }
            _ => {}
        }

        // The search tab owns all remaining keys while active, so digits and
        // editing keys are never swallowed by global shortcuts.
        if self.active_tab == Tab::Search {
            return self.search_component.handle_key_event(key);
        }

        match key.code {
            KeyCode::Char('q') if key.modifiers.is_empty() => {
                self.action_tx.send(Action::Quit)?;
            }
            KeyCode::Char('1') => self.active_tab = Tab::Search,
            KeyCode::Char('2') => self.active_tab = Tab::Account,
            KeyCode::Char('3') => self.active_tab = Tab::Block,
            KeyCode::Char('4') => self.active_tab = Tab::Saved,
            _ => match self.active_tab {
                Tab::Account => self.account_component.handle_key_event(key)?,
                Tab::Block => self.block_component.handle_key_event(key)?,
                Tab::Saved => self.saved_component.handle_key_event(key)?,
                Tab::Search => {}
            },
        }
        Ok(())
    }

    fn handle_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Tick => {
                self.refresh_saved_accounts();
            }
            Action::Quit => {
                self.should_quit = true;
            }
            Action::Resize(_, _) => {
                self.draw_ui()?;
            }
            Action::Error(message) => {
                self.status_message = message;
            }
            Action::TabSearch => self.active_tab = Tab::Search,
            Action::TabAccount => self.active_tab = Tab::Account,
            Action::TabBlock => self.active_tab = Tab::Block,
            Action::TabSaved => self.active_tab = Tab::Saved,
            Action::ViewAccount(address) => {
                info!(%address, "opening account details");
                let vm = AccountDetailsViewModel::new(
                    self.node.clone(),
                    self.store.clone(),
                    address,
                );
                self.account_component.show(vm);
                self.active_tab = Tab::Account;
                self.status_message = format!("Loading account {address}");
            }
            Action::ViewBlock(query) => {
                info!(%query, "opening block details");
                let vm = BlockDetailsViewModel::new(self.node.clone(), query);
                self.block_component.show(vm);
                self.active_tab = Tab::Block;
                self.status_message = format!("Loading {query}");
            }
            Action::ToggleSaveAccount => {
                self.toggle_save_account();
            }
            Action::DeleteSavedAccount(address) => {
                self.delete_saved_account(address);
            }
            Action::Render => {}
        }
        Ok(())
    }

    /// Save or unsave the account shown on the account screen.
    ///
    /// Expected outcomes (already saved, not saved) become status messages;
    /// anything else goes to the diagnostics log and leaves the screen alone.
    fn toggle_save_account(&mut self) {
        let Some(vm) = self.account_component.view_model() else {
            return;
        };
        match vm.is_saved() {
            Some(false) => match vm.save() {
                Ok(()) => self.status_message = "Account saved".to_string(),
                Err(e @ StoreError::AlreadySaved(_)) => self.status_message = e.to_string(),
                Err(e) => error!("failed to save account: {e}"),
            },
            Some(true) => match vm.unsave() {
                Ok(()) => self.status_message = "Account unsaved".to_string(),
                Err(e @ StoreError::NotFound(_)) => self.status_message = e.to_string(),
                Err(e) => error!("failed to delete saved account: {e}"),
            },
            // The store subscription failed; the affordance is hidden.
            None => {}
        }
        self.refresh_saved_accounts();
    }

    fn delete_saved_account(&mut self, address: AccountId) {
        match self.store.delete_account(address) {
            Ok(()) => self.status_message = format!("Removed saved account {address}"),
            Err(e @ StoreError::NotFound(_)) => self.status_message = e.to_string(),
            Err(e) => error!(%address, "failed to delete saved account: {e}"),
        }
        self.refresh_saved_accounts();
    }

    fn refresh_saved_accounts(&mut self) {
        match self.store.list_accounts() {
            Ok(accounts) => self.saved_component.set_accounts(accounts),
            Err(e) => error!("failed to list saved accounts: {e}"),
        }
    }

    fn draw_ui(&mut self) -> Result<()> {
        let network_name = self.config.network.name.clone();
        let active_tab = self.active_tab;
        let status_message = self.status_message.clone();

        let search = &mut self.search_component;
        let account = &mut self.account_component;
        let block = &mut self.block_component;
        let saved = &mut self.saved_component;

        self.tui.draw(|f| {
            let chunks = Layout::vertical([
                Constraint::Length(3), // Header
                Constraint::Length(3), // Tabs
                Constraint::Min(0),    // Content
                Constraint::Length(3), // Status
            ])
            .split(f.area());

            let header = Paragraph::new(Line::from(vec![
                Span::styled(
                    "Burst Explorer",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(
                    format!("[{network_name}]"),
                    Style::default().fg(Color::Yellow),
                ),
            ]))
            .block(Block::default().borders(Borders::ALL));
            f.render_widget(header, chunks[0]);

            let titles: Vec<Line> = Tab::all().iter().map(Tab::title).collect();
            let tabs = Tabs::new(titles)
                .select(active_tab.index())
                .highlight_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(tabs, chunks[1]);

            match active_tab {
                Tab::Search => search.draw(f, chunks[2]),
                Tab::Account => account.draw(f, chunks[2]),
                Tab::Block => block.draw(f, chunks[2]),
                Tab::Saved => saved.draw(f, chunks[2]),
            }

            let status = Paragraph::new(Line::from(vec![
                Span::styled("Status: ", Style::default().fg(Color::DarkGray)),
                Span::styled(status_message.as_str(), Style::default().fg(Color::Green)),
                Span::raw("  |  "),
                Span::styled(
                    "[q]Quit [Tab]Switch [1-4]Tabs",
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
            f.render_widget(status, chunks[3]);
        })?;
        Ok(())
    }
}
