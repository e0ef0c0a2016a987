// Currency Basics - Home Screen Controller
// Button actions, server status and notices, independent of rendering

use crate::api::CurrencyFeed;
use crate::currency::CurrencyCategory;
use crate::list_view::CurrencyListView;
use crate::source::CurrencySource;
use std::fmt;
use tracing::{error, warn};

pub const APP_TITLE: &str = "Currency Basics";
pub const LOADING_LABEL: &str = "Loading...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerStatus {
    Checking,
    Online,
    Offline,
}

impl ServerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServerStatus::Checking => "checking",
            ServerStatus::Online => "online",
            ServerStatus::Offline => "offline",
        }
    }
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the home screen buttons do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeAction {
    ClearDatabase,
    InsertData,
    ShowList(CurrencyCategory),
    RefreshStatus,
}

impl HomeAction {
    /// Buttons in display order
    pub const BUTTONS: [HomeAction; 5] = [
        HomeAction::ClearDatabase,
        HomeAction::InsertData,
        HomeAction::ShowList(CurrencyCategory::Crypto),
        HomeAction::ShowList(CurrencyCategory::Fiat),
        HomeAction::ShowList(CurrencyCategory::All),
    ];

    pub fn label(&self) -> &'static str {
        match self {
            HomeAction::ClearDatabase => "Clear Database",
            HomeAction::InsertData => "Insert Data",
            HomeAction::ShowList(CurrencyCategory::Crypto) => "Show Crypto List",
            HomeAction::ShowList(CurrencyCategory::Fiat) => "Show Fiat List",
            HomeAction::ShowList(CurrencyCategory::All) => "Show Purchasable",
            HomeAction::RefreshStatus => "Refresh Status",
        }
    }
}

/// A user-facing alert: one per finished operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
    pub is_error: bool,
}

impl Notice {
    fn info(title: &str, message: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            message: message.into(),
            is_error: false,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            message: message.into(),
            is_error: true,
        }
    }
}

/// State behind the home screen.
///
/// Operations run one at a time: `request` queues an action and raises the
/// loading flag, `run_pending` executes it. Requests made while loading are
/// dropped.
pub struct HomeScreen<F> {
    source: CurrencySource<F>,
    server_status: ServerStatus,
    database_count: usize,
    loading: bool,
    pending: Option<HomeAction>,
    notice: Option<Notice>,
    modal: Option<CurrencyListView>,
}

impl<F: CurrencyFeed> HomeScreen<F> {
    pub fn new(source: CurrencySource<F>) -> Self {
        let database_count = source.record_count();

        Self {
            source,
            server_status: ServerStatus::Checking,
            database_count,
            loading: false,
            pending: None,
            notice: None,
            modal: None,
        }
    }

    pub fn server_status(&self) -> ServerStatus {
        self.server_status
    }

    pub fn database_count(&self) -> usize {
        self.database_count
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// `Database: N records | Server: status`
    pub fn status_line(&self) -> String {
        format!(
            "Database: {} records | Server: {}",
            self.database_count, self.server_status
        )
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn modal(&self) -> Option<&CurrencyListView> {
        self.modal.as_ref()
    }

    pub fn modal_mut(&mut self) -> Option<&mut CurrencyListView> {
        self.modal.as_mut()
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    // ========================================================================
    // SINGLE-FLIGHT DISPATCH
    // ========================================================================

    /// Queue an action. Returns false when another one is still running.
    pub fn request(&mut self, action: HomeAction) -> bool {
        if self.loading {
            return false;
        }
        self.loading = true;
        if action == HomeAction::RefreshStatus {
            self.server_status = ServerStatus::Checking;
        }
        self.pending = Some(action);
        true
    }

    /// Execute the queued action, if any
    pub async fn run_pending(&mut self) -> Option<Notice> {
        let action = self.pending.take()?;
        let notice = self.execute(action).await;
        self.loading = false;
        notice
    }

    /// Request and run in one step
    pub async fn perform(&mut self, action: HomeAction) -> Option<Notice> {
        if !self.request(action) {
            return None;
        }
        self.run_pending().await
    }

    async fn execute(&mut self, action: HomeAction) -> Option<Notice> {
        let notice = match action {
            HomeAction::ClearDatabase => Some(self.clear_database()),
            HomeAction::InsertData => Some(self.insert_data().await),
            HomeAction::ShowList(category) => self.show_list(category),
            HomeAction::RefreshStatus => {
                self.check_server_status().await;
                None
            }
        };

        if notice.is_some() {
            self.notice = notice.clone();
        }
        notice
    }

    // ========================================================================
    // ACTIONS
    // ========================================================================

    pub async fn check_server_status(&mut self) {
        self.server_status = if self.source.feed().is_available().await {
            ServerStatus::Online
        } else {
            ServerStatus::Offline
        };
    }

    fn update_database_count(&mut self) {
        self.database_count = self.source.record_count();
    }

    fn clear_database(&mut self) -> Notice {
        let result = self.source.clear_all();
        self.update_database_count();

        match result {
            Ok(()) => Notice::info(
                "Database Cleared",
                "All data has been removed from the local database.",
            ),
            Err(e) => {
                error!(error = %e, "Clear database failed");
                Notice::error("Failed to clear database.")
            }
        }
    }

    async fn insert_data(&mut self) -> Notice {
        if self.server_status == ServerStatus::Offline {
            return Notice::info(
                "Server Offline",
                "Please start the server first using 'currency-server'",
            );
        }

        match self.source.insert_all().await {
            Ok(count) => {
                self.update_database_count();
                Notice::info(
                    "Data Inserted",
                    format!("{} currency records have been inserted into the local database.", count),
                )
            }
            Err(e) => {
                error!(error = %e, "Insert data failed");
                Notice::error("Failed to insert data. Make sure the server is running.")
            }
        }
    }

    /// Open the list modal; `None` when it opened without a notice
    fn show_list(&mut self, category: CurrencyCategory) -> Option<Notice> {
        if self.database_count == 0 {
            return Some(Notice::info(
                "No Data",
                "Please insert data first using the 'Insert Data' button.",
            ));
        }

        match self.source.list(category) {
            Ok(records) => {
                self.modal = Some(CurrencyListView::new(category.title(), records));
                None
            }
            Err(e) => {
                warn!(%category, error = %e, "Loading currency list failed");
                Some(Notice::error(category.load_error()))
            }
        }
    }
}
