// src/fmp/client.rs
use crate::fmp::models::IncomeRecord;
use crate::utils::error::FetchError;

const FMP_BASE_URL: &str = "https://financialmodelingprep.com/api/v3";

/// Creates a reqwest client configured for FMP interaction.
fn build_fmp_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
}

/// URL of the annual income-statement endpoint for a symbol.
fn income_statement_url(symbol: &str, api_key: &str) -> String {
    format!(
        "{}/income-statement/{}?period=annual&apikey={}",
        FMP_BASE_URL,
        symbol.to_uppercase(),
        api_key
    )
}

/// Fetches all annual income-statement records for `symbol`.
///
/// Exactly one outbound request per call; nothing is cached. If the
/// credential is absent, fails with `FetchError::MissingApiKey` before
/// any network activity. A non-2xx status maps to `FetchError::Http`
/// carrying the status code; transport failures surface as
/// `FetchError::Network`.
pub async fn fetch_income_statements(
    symbol: &str,
    api_key: Option<&str>,
) -> Result<Vec<IncomeRecord>, FetchError> {
    let api_key = match api_key {
        Some(key) if !key.is_empty() => key,
        _ => {
            tracing::warn!("FMP_API_KEY not set; refusing to issue request");
            return Err(FetchError::MissingApiKey);
        }
    };

    let client = build_fmp_client()?;
    let url = income_statement_url(symbol, api_key);

    tracing::info!("Fetching annual income statements for {}", symbol);
    let response = client.get(&url).send().await?; // Propagates reqwest::Error as FetchError::Network

    // Check if the request was successful (status code 2xx)
    let status = response.status();
    if !status.is_success() {
        tracing::error!("HTTP error status: {} for symbol {}", status, symbol);
        return Err(FetchError::Http(status));
    }

    // Raw JSON array, mapped field-by-field by serde
    let records: Vec<IncomeRecord> = response.json().await?;
    tracing::debug!("Fetched {} income statement records", records.len());

    Ok(records)
}
