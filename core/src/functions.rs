//! Locally executed functions exposed to the function-call agent. The agent
//! decides when to call them; the adapter executes the call here and feeds
//! the JSON result back into the conversation.

use chrono::Utc;
use explorer_protocol::wire::FunctionSpec;
use serde_json::Value;
use serde_json::json;

use crate::error::ExplorerErr;
use crate::error::Result;

#[derive(Clone, Debug, Default)]
pub struct FunctionRegistry;

impl FunctionRegistry {
    /// JSON-schema descriptions of every callable function, attached to the
    /// function agent at creation time.
    pub fn specs(&self) -> Vec<FunctionSpec> {
        vec![
            FunctionSpec {
                name: "get_interest_rate".to_string(),
                description: "Get the current interest rate for a specific region or central bank."
                    .to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "region": {
                            "type": "string",
                            "description": "The region or central bank to get the interest rate for (e.g., US, ECB, UK, Japan)"
                        },
                        "date": {
                            "type": "string",
                            "description": "The date for which to fetch the rate, in YYYY-MM-DD format"
                        }
                    },
                    "required": ["region"]
                }),
            },
            FunctionSpec {
                name: "calculate_loan_payment".to_string(),
                description: "Calculate monthly payment for a loan with given parameters."
                    .to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "principal": {
                            "type": "number",
                            "description": "The loan amount (principal)"
                        },
                        "annual_interest_rate": {
                            "type": "number",
                            "description": "Annual interest rate as a percentage (e.g., 5.2 for 5.2%)"
                        },
                        "term_years": {
                            "type": "number",
                            "description": "Loan term in years"
                        }
                    },
                    "required": ["principal", "annual_interest_rate", "term_years"]
                }),
            },
        ]
    }

    /// Execute `name` with the parsed arguments the agent supplied. Unknown
    /// names are a validation error: the agent asked for something we never
    /// advertised.
    pub fn execute(&self, name: &str, args: &Value) -> Result<Value> {
        match name {
            "get_interest_rate" => {
                let region = args.get("region").and_then(Value::as_str).unwrap_or("");
                let date = args.get("date").and_then(Value::as_str);
                Ok(get_interest_rate(region, date))
            }
            "calculate_loan_payment" => {
                let principal = args
                    .get("principal")
                    .and_then(Value::as_f64)
                    .unwrap_or(0.0);
                let annual_interest_rate = args
                    .get("annual_interest_rate")
                    .and_then(Value::as_f64)
                    .unwrap_or(0.0);
                let term_years = args
                    .get("term_years")
                    .and_then(Value::as_f64)
                    .unwrap_or(0.0);
                Ok(calculate_loan_payment(
                    principal,
                    annual_interest_rate,
                    term_years,
                ))
            }
            other => Err(ExplorerErr::Validation(format!(
                "unknown function: {other}"
            ))),
        }
    }
}

fn get_interest_rate(region: &str, date: Option<&str>) -> Value {
    let date = date
        .map(str::to_string)
        .unwrap_or_else(|| Utc::now().format("%Y-%m-%d").to_string());

    let rates: &[(&str, f64, &str, &str)] = &[
        ("us", 5.5, "Federal Reserve", "2023-12-13"),
        ("ecb", 4.0, "European Central Bank", "2023-12-14"),
        ("uk", 5.25, "Bank of England", "2023-12-15"),
        ("japan", -0.1, "Bank of Japan", "2023-12-10"),
        ("australia", 4.35, "Reserve Bank of Australia", "2023-12-05"),
        ("canada", 5.0, "Bank of Canada", "2023-12-06"),
    ];

    let region_lower = region.to_lowercase();
    match rates.iter().find(|(key, ..)| *key == region_lower) {
        Some((_, rate, bank, last_updated)) => json!({
            "region": region,
            "date": date,
            "interest_rate": format!("{rate}%"),
            "central_bank": bank,
            "last_updated": last_updated,
        }),
        None => json!({
            "error": format!("No interest rate data available for {region}"),
            "available_regions": rates.iter().map(|(key, ..)| *key).collect::<Vec<_>>(),
        }),
    }
}

fn calculate_loan_payment(principal: f64, annual_interest_rate: f64, term_years: f64) -> Value {
    let monthly_rate = annual_interest_rate / 100.0 / 12.0;
    let payments = term_years * 12.0;

    let monthly_payment = if monthly_rate == 0.0 {
        principal / payments
    } else {
        principal * (monthly_rate * (1.0 + monthly_rate).powf(payments))
            / ((1.0 + monthly_rate).powf(payments) - 1.0)
    };

    let total_payment = monthly_payment * payments;
    let total_interest = total_payment - principal;

    json!({
        "principal": principal,
        "annual_interest_rate": format!("{annual_interest_rate}%"),
        "term_years": term_years,
        "monthly_payment": round2(monthly_payment),
        "total_payment": round2(total_payment),
        "total_interest": round2(total_interest),
        "number_of_payments": payments,
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn interest_rate_lookup_is_case_insensitive() {
        let registry = FunctionRegistry;
        let result = registry
            .execute(
                "get_interest_rate",
                &json!({ "region": "US", "date": "2024-01-02" }),
            )
            .unwrap();
        assert_eq!(result["interest_rate"], "5.5%");
        assert_eq!(result["central_bank"], "Federal Reserve");
        assert_eq!(result["date"], "2024-01-02");
    }

    #[test]
    fn unknown_region_reports_available_regions() {
        let registry = FunctionRegistry;
        let result = registry
            .execute("get_interest_rate", &json!({ "region": "atlantis" }))
            .unwrap();
        assert!(result["error"].as_str().unwrap().contains("atlantis"));
        assert_eq!(result["available_regions"][0], "us");
    }

    #[test]
    fn loan_payment_matches_the_amortization_formula() {
        let registry = FunctionRegistry;
        let result = registry
            .execute(
                "calculate_loan_payment",
                &json!({ "principal": 300000.0, "annual_interest_rate": 5.2, "term_years": 30.0 }),
            )
            .unwrap();
        assert_eq!(result["monthly_payment"], 1647.33);
        assert_eq!(result["number_of_payments"], 360.0);
    }

    #[test]
    fn zero_rate_loan_divides_evenly() {
        let registry = FunctionRegistry;
        let result = registry
            .execute(
                "calculate_loan_payment",
                &json!({ "principal": 1200.0, "annual_interest_rate": 0.0, "term_years": 1.0 }),
            )
            .unwrap();
        assert_eq!(result["monthly_payment"], 100.0);
        assert_eq!(result["total_interest"], 0.0);
    }

    #[test]
    fn unknown_function_is_a_validation_error() {
        let registry = FunctionRegistry;
        let err = registry.execute("launch_rocket", &json!({})).unwrap_err();
        assert!(matches!(err, ExplorerErr::Validation(_)));
    }
}
