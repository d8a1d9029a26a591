// src/fmp/models.rs
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One annual income-statement filing as returned by the FMP API.
/// Example: https://financialmodelingprep.com/api/v3/income-statement/AAPL?period=annual
///
/// Records are immutable once fetched and uniquely identified by `date`
/// (one annual record per date). Absent fields deserialize to their
/// defaults; no range validation is applied to the numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IncomeRecord {
    pub date: String, // "YYYY-MM-DD"
    pub symbol: String,
    pub reported_currency: String,
    pub cik: String,
    // FMP really does spell it with two l's.
    pub filling_date: String,
    pub accepted_date: String,
    pub calendar_year: String,
    pub period: String,

    pub revenue: f64,
    pub cost_of_revenue: f64,
    pub gross_profit: f64,
    pub gross_profit_ratio: f64,
    pub research_and_development_expenses: f64,
    pub general_and_administrative_expenses: f64,
    pub selling_and_marketing_expenses: f64,
    pub selling_general_and_administrative_expenses: f64,
    pub other_expenses: f64,
    pub operating_expenses: f64,
    pub cost_and_expenses: f64,
    pub interest_income: f64,
    pub interest_expense: f64,
    pub depreciation_and_amortization: f64,
    pub ebitda: f64,
    #[serde(rename = "ebitdaratio")]
    pub ebitda_ratio: f64,
    pub operating_income: f64,
    pub operating_income_ratio: f64,
    pub total_other_income_expenses_net: f64,
    pub income_before_tax: f64,
    pub income_before_tax_ratio: f64,
    pub income_tax_expense: f64,
    pub net_income: f64,
    pub net_income_ratio: f64,
    pub eps: f64,
    #[serde(rename = "epsdiluted")]
    pub eps_diluted: f64,
    pub weighted_average_shs_out: f64,
    pub weighted_average_shs_out_dil: f64,

    pub link: String,
    pub final_link: String,
}

impl IncomeRecord {
    /// Year component of the record date, or `None` if the date does not
    /// parse as YYYY-MM-DD. Callers treat an unparseable date as
    /// failing every year-range comparison.
    pub fn year(&self) -> Option<i32> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .map(|d| d.year())
            .ok()
    }

    /// True if any field's string form contains `needle` (already
    /// lowercased) as a substring.
    pub fn matches(&self, needle: &str) -> bool {
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }

    /// String form of every field, in declaration order. Numeric fields
    /// use their plain `Display` form ("391035000000", "0.4621").
    fn search_fields(&self) -> Vec<String> {
        vec![
            self.date.clone(),
            self.symbol.clone(),
            self.reported_currency.clone(),
            self.cik.clone(),
            self.filling_date.clone(),
            self.accepted_date.clone(),
            self.calendar_year.clone(),
            self.period.clone(),
            self.revenue.to_string(),
            self.cost_of_revenue.to_string(),
            self.gross_profit.to_string(),
            self.gross_profit_ratio.to_string(),
            self.research_and_development_expenses.to_string(),
            self.general_and_administrative_expenses.to_string(),
            self.selling_and_marketing_expenses.to_string(),
            self.selling_general_and_administrative_expenses.to_string(),
            self.other_expenses.to_string(),
            self.operating_expenses.to_string(),
            self.cost_and_expenses.to_string(),
            self.interest_income.to_string(),
            self.interest_expense.to_string(),
            self.depreciation_and_amortization.to_string(),
            self.ebitda.to_string(),
            self.ebitda_ratio.to_string(),
            self.operating_income.to_string(),
            self.operating_income_ratio.to_string(),
            self.total_other_income_expenses_net.to_string(),
            self.income_before_tax.to_string(),
            self.income_before_tax_ratio.to_string(),
            self.income_tax_expense.to_string(),
            self.net_income.to_string(),
            self.net_income_ratio.to_string(),
            self.eps.to_string(),
            self.eps_diluted.to_string(),
            self.weighted_average_shs_out.to_string(),
            self.weighted_average_shs_out_dil.to_string(),
            self.link.clone(),
            self.final_link.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_year_from_iso_date() {
        let record = IncomeRecord {
            date: "2019-09-28".to_string(),
            ..Default::default()
        };
        assert_eq!(record.year(), Some(2019));
    }

    #[test]
    fn malformed_date_yields_no_year() {
        let record = IncomeRecord {
            date: "not-a-date".to_string(),
            ..Default::default()
        };
        assert_eq!(record.year(), None);
    }

    #[test]
    fn deserializes_fmp_payload_with_absent_fields() {
        // A trimmed payload: everything not present must fall back to
        // its default rather than failing the whole response.
        let json = r#"{
            "date": "2024-09-28",
            "symbol": "AAPL",
            "calendarYear": "2024",
            "period": "FY",
            "revenue": 391035000000,
            "netIncome": 93736000000,
            "ebitdaratio": 0.345,
            "epsdiluted": 6.08,
            "fillingDate": "2024-11-01"
        }"#;
        let record: IncomeRecord = serde_json::from_str(json).expect("must deserialize");
        assert_eq!(record.date, "2024-09-28");
        assert_eq!(record.revenue, 391035000000.0);
        assert_eq!(record.net_income, 93736000000.0);
        assert_eq!(record.ebitda_ratio, 0.345);
        assert_eq!(record.eps_diluted, 6.08);
        assert_eq!(record.filling_date, "2024-11-01");
        assert_eq!(record.gross_profit, 0.0);
        assert_eq!(record.link, "");
    }

    #[test]
    fn search_covers_numeric_and_string_fields() {
        let record = IncomeRecord {
            date: "2019-09-28".to_string(),
            symbol: "AAPL".to_string(),
            revenue: 260174000000.0,
            ..Default::default()
        };
        assert!(record.matches("2019"));
        assert!(record.matches("aapl"));
        assert!(record.matches("260174000000"));
        assert!(!record.matches("msft"));
    }
}
