// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use currency_basics::config::{ClientArgs, ClientCommand, ClientConfig};
use currency_basics::logging::{self, LogTarget};
use currency_basics::{
    ApiClient, CurrencyCategory, CurrencyListView, CurrencySource, HomeAction, HomeScreen,
    SnapshotStore,
};
use tokio::runtime::Runtime;

fn main() -> Result<()> {
    let args = ClientArgs::parse();
    let config = ClientConfig::from_options(&args.options)?;
    let command = args.command.unwrap_or(ClientCommand::Ui);

    // The UI owns the terminal, so its logs go to a file
    let target = match command {
        ClientCommand::Ui => LogTarget::File(config.log_path()),
        _ => LogTarget::Stderr,
    };
    logging::init(target)?;

    let runtime = Runtime::new().context("Failed to start async runtime")?;
    let store = SnapshotStore::open(&config.db_path)
        .with_context(|| format!("Failed to open database {}", config.db_path.display()))?;
    let client = ApiClient::new(config.api_url.clone(), config.timeout)?;
    let source = CurrencySource::open(store, client)?;

    match command {
        ClientCommand::Ui => run_ui_mode(HomeScreen::new(source), &runtime),
        ClientCommand::Insert => {
            let mut home = HomeScreen::new(source);
            runtime.block_on(home.check_server_status());
            print_notice(runtime.block_on(home.perform(HomeAction::InsertData)));
            Ok(())
        }
        ClientCommand::Clear => {
            let mut home = HomeScreen::new(source);
            print_notice(runtime.block_on(home.perform(HomeAction::ClearDatabase)));
            Ok(())
        }
        ClientCommand::List { category, query } => run_list(&source, category, &query),
        ClientCommand::Status => {
            let mut home = HomeScreen::new(source);
            runtime.block_on(home.check_server_status());
            println!("{}", home.status_line());
            Ok(())
        }
    }
}

fn print_notice(notice: Option<currency_basics::Notice>) {
    if let Some(notice) = notice {
        if notice.is_error {
            eprintln!("{}: {}", notice.title, notice.message);
        } else {
            println!("{}: {}", notice.title, notice.message);
        }
    }
}

fn run_list(source: &CurrencySource<ApiClient>, category: CurrencyCategory, query: &str) -> Result<()> {
    if source.record_count() == 0 {
        eprintln!("No Data: Please insert data first using 'currency-basics insert'.");
        return Ok(());
    }

    let records = source.list(category)?;
    let mut view = CurrencyListView::new(category.title(), records);
    view.handle_search(query);

    println!("{}", view.title());
    println!("{}", "─".repeat(view.title().chars().count()));

    match view.empty_state() {
        Some(empty) => {
            println!("{}", empty.headline());
            println!("{}", empty.hint());
        }
        None => {
            for record in view.filtered() {
                match &record.code {
                    Some(code) => println!("{:<32} {:<8} {}", record.name, record.symbol, code),
                    None => println!("{:<32} {}", record.name, record.symbol),
                }
            }
        }
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(home: HomeScreen<ApiClient>, runtime: &Runtime) -> Result<()> {
    let mut app = ui::App::new(home);
    ui::run_ui(&mut app, runtime)
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_home: HomeScreen<ApiClient>, _runtime: &Runtime) -> Result<()> {
    eprintln!("TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the list command: currency-basics list crypto");
    std::process::exit(1);
}
