// src/app/mod.rs
//
// Explicit application state owned by the command loop. Every user
// interaction becomes an `Action` fed through `AppState::apply`, which
// mutates exactly the state the action addresses and hands any side
// effect back to the driver as a `Command`. Derived views are
// recomputed in full from the base record set on each render; at tens
// of annual records there is nothing worth memoizing.
use crate::fmp::models::IncomeRecord;
use crate::pipeline::{filter, search, sort};
use crate::pipeline::{FilterSpec, SortField, SortSpec};
use serde::{Deserialize, Serialize};

/// Persisted display preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Parses a persisted value; anything unrecognized falls back to light.
    pub fn from_stored(value: &str) -> Self {
        match value.trim() {
            "dark" => Theme::Dark,
            _ => Theme::Light,
        }
    }
}

/// Lifecycle of the one outbound request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FetchState {
    Idle,
    Loading,
    Success(Vec<IncomeRecord>),
    Failure(String),
}

/// One user interaction or fetch completion.
#[derive(Debug, Clone)]
pub enum Action {
    ApplyFilters(FilterSpec),
    SetSort(SortField),
    SetSearch(String),
    GoToPage(usize),
    Select(IncomeRecord),
    CloseDetail,
    Retry,
    FetchFinished {
        generation: u64,
        result: Result<Vec<IncomeRecord>, String>,
    },
    ToggleTheme,
}

/// Side effect the driver must carry out after a reduction.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Issue the fetch tagged with this generation and feed the outcome
    /// back in via `Action::FetchFinished`.
    Fetch { generation: u64 },
    /// Write the new theme preference to the store.
    PersistTheme(Theme),
}

/// One displayable page plus its position in the paged set.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub records: Vec<IncomeRecord>,
    pub current_page: usize,
    pub total_pages: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub fetch: FetchState,
    /// Monotonic counter distinguishing successive fetch attempts so a
    /// stale response can never overwrite a newer one.
    pub generation: u64,
    pub filters: FilterSpec,
    pub sort: Option<SortSpec>,
    pub query: String,
    pub current_page: usize,
    pub selected: Option<IncomeRecord>,
    pub theme: Theme,
}

impl AppState {
    pub fn new(theme: Theme) -> Self {
        Self {
            fetch: FetchState::Idle,
            generation: 0,
            filters: FilterSpec::default(),
            sort: None,
            query: String::new(),
            current_page: 1,
            selected: None,
            theme,
        }
    }

    /// Reduces one action. Pure apart from the returned `Command`.
    pub fn apply(&mut self, action: Action) -> Option<Command> {
        match action {
            Action::ApplyFilters(spec) => {
                self.filters = spec;
                // Land back on page 1 so a narrowed set can't strand the
                // user past its last page.
                self.current_page = 1;
                None
            }
            Action::SetSort(field) => {
                self.sort = Some(sort::toggle(self.sort, field));
                None
            }
            Action::SetSearch(query) => {
                self.query = query;
                self.current_page = 1;
                None
            }
            Action::GoToPage(page) => {
                // Out-of-range navigation is a no-op, not an error.
                if page >= 1 && page <= self.total_pages() {
                    self.current_page = page;
                }
                None
            }
            Action::Select(record) => {
                self.selected = Some(record);
                None
            }
            Action::CloseDetail => {
                self.selected = None;
                None
            }
            Action::Retry => {
                self.generation += 1;
                self.fetch = FetchState::Loading; // clears any prior error
                Some(Command::Fetch {
                    generation: self.generation,
                })
            }
            Action::FetchFinished { generation, result } => {
                if generation != self.generation {
                    tracing::debug!(
                        "Discarding stale fetch response (generation {} < {})",
                        generation,
                        self.generation
                    );
                    return None;
                }
                self.fetch = match result {
                    Ok(records) => FetchState::Success(records),
                    Err(message) => FetchState::Failure(message),
                };
                None
            }
            Action::ToggleTheme => {
                self.theme = self.theme.toggled();
                Some(Command::PersistTheme(self.theme))
            }
        }
    }

    /// Filter -> sort -> search over the fetched records. Empty unless
    /// the fetch has succeeded.
    fn matching(&self) -> Vec<IncomeRecord> {
        let FetchState::Success(records) = &self.fetch else {
            return Vec::new();
        };
        let filtered = filter::filter(records, &self.filters);
        let sorted = sort::sort(&filtered, self.sort.as_ref());
        search::search(&sorted, &self.query)
    }

    fn total_pages(&self) -> usize {
        search::total_pages(self.matching().len())
    }

    /// The page currently on screen, or `None` while loading or failed.
    pub fn visible_page(&self) -> Option<PageView> {
        if !matches!(self.fetch, FetchState::Success(_)) {
            return None;
        }
        let matching = self.matching();
        let total_pages = search::total_pages(matching.len());
        let records = search::page_slice(&matching, self.current_page).to_vec();
        Some(PageView {
            records,
            current_page: self.current_page,
            total_pages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, revenue: f64, net_income: f64) -> IncomeRecord {
        IncomeRecord {
            date: date.to_string(),
            revenue,
            net_income,
            operating_income: revenue / 4.0,
            ..Default::default()
        }
    }

    /// One record per year starting at `first_year`, revenue growing by
    /// 10 per year.
    fn yearly_records(first_year: i32, count: usize) -> Vec<IncomeRecord> {
        (0..count)
            .map(|i| {
                let year = first_year + i as i32;
                record(&format!("{year}-09-28"), 100.0 + 10.0 * i as f64, 10.0)
            })
            .collect()
    }

    fn loaded_state(records: Vec<IncomeRecord>) -> AppState {
        let mut state = AppState::new(Theme::Light);
        let cmd = state.apply(Action::Retry).expect("retry issues a fetch");
        let Command::Fetch { generation } = cmd else {
            panic!("expected a fetch command");
        };
        state.apply(Action::FetchFinished {
            generation,
            result: Ok(records),
        });
        state
    }

    #[test]
    fn retry_enters_loading_and_bumps_generation() {
        let mut state = AppState::new(Theme::Light);
        state.fetch = FetchState::Failure("HTTP error! status: 500".to_string());

        let cmd = state.apply(Action::Retry);
        assert_eq!(state.fetch, FetchState::Loading);
        assert_eq!(cmd, Some(Command::Fetch { generation: 1 }));

        let cmd = state.apply(Action::Retry);
        assert_eq!(cmd, Some(Command::Fetch { generation: 2 }));
    }

    #[test]
    fn stale_fetch_response_is_discarded() {
        let mut state = AppState::new(Theme::Light);
        state.apply(Action::Retry); // generation 1
        state.apply(Action::Retry); // generation 2, still in flight

        // The first request completes late; it must not win.
        state.apply(Action::FetchFinished {
            generation: 1,
            result: Ok(vec![record("2015-09-26", 1.0, 1.0)]),
        });
        assert_eq!(state.fetch, FetchState::Loading);

        state.apply(Action::FetchFinished {
            generation: 2,
            result: Err("HTTP error! status: 500".to_string()),
        });
        assert!(matches!(&state.fetch, FetchState::Failure(m) if m.contains("500")));
    }

    #[test]
    fn failure_then_retry_clears_the_error() {
        let mut state = AppState::new(Theme::Light);
        state.apply(Action::Retry);
        state.apply(Action::FetchFinished {
            generation: 1,
            result: Err("Network request failed".to_string()),
        });
        assert!(matches!(state.fetch, FetchState::Failure(_)));

        state.apply(Action::Retry);
        assert_eq!(state.fetch, FetchState::Loading);
    }

    #[test]
    fn no_page_view_while_loading_or_failed() {
        let mut state = AppState::new(Theme::Light);
        assert!(state.visible_page().is_none());
        state.apply(Action::Retry);
        assert!(state.visible_page().is_none());
        state.apply(Action::FetchFinished {
            generation: 1,
            result: Err("boom".to_string()),
        });
        assert!(state.visible_page().is_none());
    }

    #[test]
    fn filter_then_sort_descending_puts_max_revenue_first() {
        // 25 records; years 2015-2020 hold 6 of them.
        let mut state = loaded_state(yearly_records(2000, 25));
        state.apply(Action::ApplyFilters(FilterSpec {
            start_year: 2015,
            end_year: 2020,
            revenue_min: None,
            revenue_max: None,
            net_income_min: None,
            net_income_max: None,
        }));
        state.apply(Action::SetSort(SortField::Revenue)); // ascending
        state.apply(Action::SetSort(SortField::Revenue)); // toggles to descending

        let view = state.visible_page().expect("success state has a view");
        assert_eq!(view.records.len(), 6);
        let max = view
            .records
            .iter()
            .map(|r| r.revenue)
            .fold(f64::MIN, f64::max);
        assert_eq!(view.records[0].revenue, max);
    }

    #[test]
    fn search_narrows_and_resets_page() {
        let mut state = loaded_state(yearly_records(2000, 25));
        state.apply(Action::ApplyFilters(FilterSpec {
            start_year: 1990,
            end_year: 2030,
            revenue_min: None,
            revenue_max: None,
            net_income_min: None,
            net_income_max: None,
        }));
        state.apply(Action::GoToPage(3));
        assert_eq!(state.current_page, 3);

        state.apply(Action::SetSearch("2019-09-28".to_string()));
        assert_eq!(state.current_page, 1);
        let view = state.visible_page().expect("view");
        assert_eq!(view.records.len(), 1);
        assert_eq!(view.records[0].date, "2019-09-28");
        assert_eq!(view.total_pages, 1);
    }

    #[test]
    fn out_of_range_navigation_is_a_no_op() {
        let mut state = loaded_state(yearly_records(2010, 15));
        // 15 records within the default 2010..now filter: 2 pages.
        state.apply(Action::GoToPage(0));
        assert_eq!(state.current_page, 1);
        state.apply(Action::GoToPage(3));
        assert_eq!(state.current_page, 1);
        state.apply(Action::GoToPage(2));
        assert_eq!(state.current_page, 2);

        let view = state.visible_page().expect("view");
        assert_eq!(view.total_pages, 2);
        assert_eq!(view.records.len(), 5);
    }

    #[test]
    fn empty_result_still_has_one_page() {
        let mut state = loaded_state(Vec::new());
        let view = state.visible_page().expect("view");
        assert_eq!(view.total_pages, 1);
        assert!(view.records.is_empty());
        // Paging anywhere else stays a no-op.
        state.apply(Action::GoToPage(2));
        assert_eq!(state.current_page, 1);
    }

    #[test]
    fn selection_survives_filters_excluding_it() {
        let records = yearly_records(2010, 10);
        let chosen = records[0].clone(); // dated 2010-09-28
        let mut state = loaded_state(records);

        state.apply(Action::Select(chosen.clone()));
        assert_eq!(state.selected.as_ref(), Some(&chosen));

        // Filter the selected record out of the visible set.
        state.apply(Action::ApplyFilters(FilterSpec {
            start_year: 2015,
            end_year: 2020,
            revenue_min: None,
            revenue_max: None,
            net_income_min: None,
            net_income_max: None,
        }));
        let view = state.visible_page().expect("view");
        assert!(view.records.iter().all(|r| r.date != chosen.date));
        assert_eq!(state.selected.as_ref(), Some(&chosen));

        state.apply(Action::CloseDetail);
        assert!(state.selected.is_none());
    }

    #[test]
    fn selecting_again_overwrites_previous_selection() {
        let records = yearly_records(2015, 3);
        let mut state = loaded_state(records.clone());
        state.apply(Action::Select(records[0].clone()));
        state.apply(Action::Select(records[1].clone()));
        assert_eq!(state.selected.as_ref(), Some(&records[1]));
    }

    #[test]
    fn theme_toggle_flips_and_requests_persistence() {
        let mut state = AppState::new(Theme::Light);
        let cmd = state.apply(Action::ToggleTheme);
        assert_eq!(state.theme, Theme::Dark);
        assert_eq!(cmd, Some(Command::PersistTheme(Theme::Dark)));
        state.apply(Action::ToggleTheme);
        assert_eq!(state.theme, Theme::Light);
    }

    #[test]
    fn theme_round_trips_through_storage_strings() {
        assert_eq!(Theme::from_stored("dark"), Theme::Dark);
        assert_eq!(Theme::from_stored("light"), Theme::Light);
        assert_eq!(Theme::from_stored("blue"), Theme::Light);
        assert_eq!(Theme::from_stored(Theme::Dark.as_str()), Theme::Dark);
    }
}
