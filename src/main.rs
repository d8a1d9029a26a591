// src/main.rs
mod app;
mod fmp;
mod pipeline;
mod storage;
mod utils;

use app::{Action, AppState, Command, FetchState, PageView};
use clap::Parser;
use fmp::client;
use fmp::models::IncomeRecord;
use pipeline::sort::Direction;
use pipeline::{FilterSpec, SortField};
use std::io::Write;
use storage::ThemeStore;
use utils::AppError;

/// Command Line Interface for the FMP income-statement dashboard
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Ticker symbol of the company
    #[arg(short, long, default_value = "AAPL")]
    symbol: String,

    /// Directory holding persisted dashboard state (theme preference)
    #[arg(long, default_value = "./.fmp_dashboard")]
    state_dir: String,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting dashboard for args: {:?}", args);

    // 3. Credential comes from the environment, never from a flag
    let api_key = std::env::var("FMP_API_KEY").ok();

    // 4. Restore the persisted theme
    let store = ThemeStore::new(&args.state_dir)?;
    let mut state = AppState::new(store.load());

    // 5. Initial fetch, then hand control to the user
    dispatch_fetch(&mut state, &args.symbol, api_key.as_deref()).await;
    render(&state);

    // 6. Command loop: one event at a time, each reduced into the state
    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break; // EOF
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(&command) = tokens.first() else {
            continue;
        };

        match command {
            "quit" | "q" | "exit" => break,
            "help" | "h" => print_help(),
            "retry" => {
                dispatch_fetch(&mut state, &args.symbol, api_key.as_deref()).await;
                render(&state);
            }
            "filter" => {
                match parse_filter(&tokens[1..]) {
                    Some(spec) => {
                        state.apply(Action::ApplyFilters(spec));
                        println!("Filters applied.");
                        render(&state);
                    }
                    None => println!(
                        "usage: filter [<start-year> <end-year> [rev-min rev-max ni-min ni-max]] ('-' = no limit; no args resets)"
                    ),
                }
            }
            "sort" => match tokens.get(1).and_then(|name| parse_sort_field(name)) {
                Some(field) => {
                    state.apply(Action::SetSort(field));
                    render(&state);
                }
                None => println!("usage: sort date|revenue|net|op"),
            },
            "search" => {
                let query = tokens[1..].join(" ");
                state.apply(Action::SetSearch(query));
                render(&state);
            }
            "page" => match tokens.get(1).and_then(|n| n.parse::<usize>().ok()) {
                Some(page) => {
                    state.apply(Action::GoToPage(page));
                    render(&state);
                }
                None => println!("usage: page <n>"),
            },
            "next" => {
                state.apply(Action::GoToPage(state.current_page + 1));
                render(&state);
            }
            "prev" => {
                state.apply(Action::GoToPage(state.current_page.saturating_sub(1)));
                render(&state);
            }
            "select" => {
                let row = tokens.get(1).and_then(|n| n.parse::<usize>().ok());
                let record = row.and_then(|n| {
                    state
                        .visible_page()
                        .and_then(|view| view.records.get(n.saturating_sub(1)).cloned())
                });
                match record {
                    Some(record) => {
                        render_detail(&record);
                        state.apply(Action::Select(record));
                    }
                    None => println!("usage: select <row-number> (from the current page)"),
                }
            }
            "close" => {
                state.apply(Action::CloseDetail);
                render(&state);
            }
            "theme" => {
                if let Some(Command::PersistTheme(theme)) = state.apply(Action::ToggleTheme) {
                    // A failed write keeps the in-memory theme; it just
                    // won't survive a restart.
                    if let Err(e) = store.save(theme) {
                        tracing::warn!("Could not persist theme: {}", e);
                    }
                }
                println!("Theme: {}", state.theme.as_str());
            }
            other => println!("Unknown command '{}'. Type 'help' for commands.", other),
        }
    }

    Ok(())
}

/// Starts a fetch through the reducer and feeds the tagged outcome back
/// in, so a response from a superseded attempt can never win.
async fn dispatch_fetch(state: &mut AppState, symbol: &str, api_key: Option<&str>) {
    let Some(Command::Fetch { generation }) = state.apply(Action::Retry) else {
        return;
    };
    let result = client::fetch_income_statements(symbol, api_key)
        .await
        .map_err(|e| e.to_string());
    state.apply(Action::FetchFinished { generation, result });
}

fn parse_bound(token: &str) -> Option<Option<f64>> {
    if token == "-" {
        return Some(None);
    }
    token.parse::<f64>().ok().map(Some)
}

/// `filter` with no arguments resets to the defaults, mirroring the
/// form's reset button. Otherwise: start end [rmin rmax nmin nmax].
fn parse_filter(tokens: &[&str]) -> Option<FilterSpec> {
    if tokens.is_empty() {
        return Some(FilterSpec::default());
    }
    if tokens.len() != 2 && tokens.len() != 6 {
        return None;
    }
    let mut spec = FilterSpec {
        start_year: tokens[0].parse().ok()?,
        end_year: tokens[1].parse().ok()?,
        revenue_min: None,
        revenue_max: None,
        net_income_min: None,
        net_income_max: None,
    };
    if tokens.len() == 6 {
        spec.revenue_min = parse_bound(tokens[2])?;
        spec.revenue_max = parse_bound(tokens[3])?;
        spec.net_income_min = parse_bound(tokens[4])?;
        spec.net_income_max = parse_bound(tokens[5])?;
    }
    Some(spec)
}

fn parse_sort_field(name: &str) -> Option<SortField> {
    match name.to_lowercase().as_str() {
        "date" => Some(SortField::Date),
        "revenue" | "rev" => Some(SortField::Revenue),
        "net" | "netincome" => Some(SortField::NetIncome),
        "op" | "operating" => Some(SortField::OperatingIncome),
        _ => None,
    }
}

fn sort_indicator(state: &AppState, field: SortField) -> &'static str {
    match state.sort {
        Some(spec) if spec.field == field => match spec.direction {
            Direction::Ascending => " ^",
            Direction::Descending => " v",
        },
        _ => "",
    }
}

fn money(value: f64) -> String {
    format!("${}", value)
}

fn render(state: &AppState) {
    match &state.fetch {
        FetchState::Idle | FetchState::Loading => println!("Loading..."),
        FetchState::Failure(message) => {
            println!("Error: {}", message);
            println!("Type 'retry' to try again.");
        }
        FetchState::Success(_) => {
            let view = state.visible_page().unwrap_or(PageView {
                records: Vec::new(),
                current_page: 1,
                total_pages: 1,
            });
            render_table(state, &view);
        }
    }
}

fn render_table(state: &AppState, view: &PageView) {
    println!();
    println!(
        "{:>3}  {:<12} {:>18} {:>18} {:>18} {:>8} {:>18}",
        "#",
        format!("Date{}", sort_indicator(state, SortField::Date)),
        format!("Revenue{}", sort_indicator(state, SortField::Revenue)),
        format!("Net Income{}", sort_indicator(state, SortField::NetIncome)),
        "Gross Profit",
        "EPS",
        format!(
            "Operating Income{}",
            sort_indicator(state, SortField::OperatingIncome)
        ),
    );
    if view.records.is_empty() {
        println!("  No data available.");
    }
    for (i, record) in view.records.iter().enumerate() {
        println!(
            "{:>3}  {:<12} {:>18} {:>18} {:>18} {:>8} {:>18}",
            i + 1,
            record.date,
            money(record.revenue),
            money(record.net_income),
            money(record.gross_profit),
            record.eps,
            money(record.operating_income),
        );
    }
    println!();
    println!(
        "Page {} of {}   (search: {:?}, theme: {})",
        view.current_page,
        view.total_pages,
        state.query,
        state.theme.as_str()
    );
}

fn render_detail(record: &IncomeRecord) {
    println!();
    println!("Income Statement Details - {}", record.calendar_year);
    println!("--- Basic Information ---");
    println!("Date:               {}", record.date);
    println!("Symbol:             {}", record.symbol);
    println!("Reported Currency:  {}", record.reported_currency);
    println!("CIK:                {}", record.cik);
    println!("Filing Date:        {}", record.filling_date);
    println!("Accepted Date:      {}", record.accepted_date);
    println!("Calendar Year:      {}", record.calendar_year);
    println!("Period:             {}", record.period);
    println!("--- Financial Metrics ---");
    println!("Revenue:            {}", money(record.revenue));
    println!("Cost of Revenue:    {}", money(record.cost_of_revenue));
    println!("Gross Profit:       {}", money(record.gross_profit));
    println!("Gross Profit Ratio: {:.2}%", record.gross_profit_ratio * 100.0);
    println!("R&D Expenses:       {}", money(record.research_and_development_expenses));
    println!("SG&A Expenses:      {}", money(record.selling_general_and_administrative_expenses));
    println!("Operating Expenses: {}", money(record.operating_expenses));
    println!("Operating Income:   {}", money(record.operating_income));
    println!("Op. Income Ratio:   {:.2}%", record.operating_income_ratio * 100.0);
    println!("Net Income:         {}", money(record.net_income));
    println!("Net Income Ratio:   {:.2}%", record.net_income_ratio * 100.0);
    println!("EPS:                {}", record.eps);
    println!("EPS Diluted:        {}", record.eps_diluted);
    println!("--- Additional Information ---");
    println!("EBITDA:             {}", money(record.ebitda));
    println!("EBITDA Ratio:       {:.2}%", record.ebitda_ratio * 100.0);
    println!("Income Before Tax:  {}", money(record.income_before_tax));
    println!("Pre-Tax Ratio:      {:.2}%", record.income_before_tax_ratio * 100.0);
    println!("Income Tax Expense: {}", money(record.income_tax_expense));
    println!("Wtd Avg Shares:     {}", record.weighted_average_shs_out);
    println!("Wtd Avg Shares Dil: {}", record.weighted_average_shs_out_dil);
    println!("Link:               {}", record.link);
    println!("Final Link:         {}", record.final_link);
    println!();
    println!("Type 'close' to return to the table.");
}

fn print_help() {
    println!("Commands:");
    println!("  filter [start end [rmin rmax nmin nmax]]  apply bounds ('-' = no limit; no args resets)");
    println!("  sort date|revenue|net|op                  order by column (repeat to flip direction)");
    println!("  search [text]                             case-insensitive match on any field");
    println!("  page <n> | next | prev                    navigate pages of 10");
    println!("  select <row> | close                      open/close the detail view");
    println!("  retry                                     refetch from the API");
    println!("  theme                                     toggle light/dark preference");
    println!("  quit                                      exit");
}
