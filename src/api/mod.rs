use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    BuyingParameters, ContributionParameters, ErosionParameters, FireParameters, FireVariant,
    LoanParameters, OwnershipParameters, Prepayment, PrepaymentFrequency,
    RETIREMENT_HORIZON_AGE, RentingParameters, TaxInputs, compare_loan_scenarios,
    compare_tax_regimes, simulate_erosion, simulate_fire, simulate_ownership,
    simulate_step_up_growth,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ApiPrepaymentFrequency {
    Monthly,
    Quarterly,
    Yearly,
}

impl From<ApiPrepaymentFrequency> for PrepaymentFrequency {
    fn from(value: ApiPrepaymentFrequency) -> Self {
        match value {
            ApiPrepaymentFrequency::Monthly => PrepaymentFrequency::Monthly,
            ApiPrepaymentFrequency::Quarterly => PrepaymentFrequency::Quarterly,
            ApiPrepaymentFrequency::Yearly => PrepaymentFrequency::Yearly,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ApiFireVariant {
    Lean,
    Standard,
    Fat,
}

impl From<ApiFireVariant> for FireVariant {
    fn from(value: ApiFireVariant) -> Self {
        match value {
            ApiFireVariant::Lean => FireVariant::Lean,
            ApiFireVariant::Standard => FireVariant::Standard,
            ApiFireVariant::Fat => FireVariant::Fat,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LoanPayload {
    loan_amount: Option<f64>,
    interest_rate: Option<f64>,
    tenure_years: Option<u32>,
    prepayment_enabled: Option<bool>,
    prepayment_amount: Option<f64>,
    prepayment_frequency: Option<ApiPrepaymentFrequency>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SipPayload {
    monthly_investment: Option<f64>,
    #[serde(alias = "stepUpPercent")]
    annual_step_up: Option<f64>,
    #[serde(alias = "returnRate")]
    expected_return: Option<f64>,
    #[serde(alias = "timePeriod")]
    years: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct InflationPayload {
    initial_amount: Option<f64>,
    inflation_rate: Option<f64>,
    years: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct FirePayload {
    current_age: Option<u32>,
    monthly_expenses: Option<f64>,
    current_savings: Option<f64>,
    monthly_investment: Option<f64>,
    #[serde(alias = "stepUpPercent")]
    annual_step_up: Option<f64>,
    #[serde(alias = "returnRate")]
    expected_return: Option<f64>,
    inflation_rate: Option<f64>,
    #[serde(alias = "fireType")]
    variant: Option<ApiFireVariant>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RentVsBuyPayload {
    #[serde(alias = "timeHorizon")]
    horizon_years: Option<u32>,
    monthly_rent: Option<f64>,
    #[serde(alias = "rentIncrease")]
    annual_rent_increase: Option<f64>,
    investment_return: Option<f64>,
    property_price: Option<f64>,
    down_payment_percent: Option<f64>,
    #[serde(alias = "loanInterest")]
    loan_rate: Option<f64>,
    #[serde(alias = "loanTenure")]
    loan_tenure_years: Option<u32>,
    #[serde(alias = "appreciation")]
    annual_appreciation: Option<f64>,
    #[serde(alias = "buyingCosts")]
    buying_cost_percent: Option<f64>,
    monthly_maintenance: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct TaxPayload {
    gross_salary: Option<f64>,
    other_income: Option<f64>,
    #[serde(alias = "deduction80C")]
    deduction_80c: Option<f64>,
    #[serde(alias = "deduction80D")]
    deduction_80d: Option<f64>,
    #[serde(alias = "hra")]
    hra_exemption: Option<f64>,
    home_loan_interest: Option<f64>,
    other_deductions: Option<f64>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn require_money(name: &str, value: f64) -> Result<f64, String> {
    if !value.is_finite() || value < 0.0 {
        return Err(format!("{name} must be a finite amount >= 0"));
    }
    Ok(value)
}

fn require_positive_money(name: &str, value: f64) -> Result<f64, String> {
    if !value.is_finite() || value <= 0.0 {
        return Err(format!("{name} must be a finite amount > 0"));
    }
    Ok(value)
}

fn require_percent(name: &str, value: f64) -> Result<f64, String> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(format!("{name} must be between 0 and 100"));
    }
    Ok(value)
}

fn require_years(name: &str, value: u32) -> Result<u32, String> {
    if value == 0 || value > 100 {
        return Err(format!("{name} must be between 1 and 100"));
    }
    Ok(value)
}

fn build_loan_params(payload: LoanPayload) -> Result<LoanParameters, String> {
    let principal =
        require_positive_money("loanAmount", payload.loan_amount.unwrap_or(5_000_000.0))?;
    let annual_rate = require_percent("interestRate", payload.interest_rate.unwrap_or(8.5))?;
    let tenure_years = require_years("tenureYears", payload.tenure_years.unwrap_or(20))?;

    let prepayment = if payload.prepayment_enabled.unwrap_or(false) {
        let amount =
            require_money("prepaymentAmount", payload.prepayment_amount.unwrap_or(5_000.0))?;
        Some(Prepayment {
            amount,
            frequency: payload
                .prepayment_frequency
                .unwrap_or(ApiPrepaymentFrequency::Monthly)
                .into(),
        })
    } else {
        None
    };

    Ok(LoanParameters {
        principal,
        annual_rate,
        tenure_years,
        prepayment,
    })
}

fn build_sip_params(payload: SipPayload) -> Result<ContributionParameters, String> {
    Ok(ContributionParameters {
        monthly_amount: require_money(
            "monthlyInvestment",
            payload.monthly_investment.unwrap_or(5_000.0),
        )?,
        annual_step_up: require_percent("annualStepUp", payload.annual_step_up.unwrap_or(10.0))?,
        annual_return: require_percent("expectedReturn", payload.expected_return.unwrap_or(12.0))?,
        years: require_years("years", payload.years.unwrap_or(10))?,
    })
}

fn build_erosion_params(payload: InflationPayload) -> Result<ErosionParameters, String> {
    Ok(ErosionParameters {
        initial_amount: require_positive_money(
            "initialAmount",
            payload.initial_amount.unwrap_or(10_000.0),
        )?,
        annual_inflation: require_percent(
            "inflationRate",
            payload.inflation_rate.unwrap_or(6.0),
        )?,
        years: require_years("years", payload.years.unwrap_or(10))?,
    })
}

fn build_fire_params(payload: FirePayload) -> Result<FireParameters, String> {
    let current_age = payload.current_age.unwrap_or(25);
    if current_age == 0 || current_age >= RETIREMENT_HORIZON_AGE {
        return Err(format!(
            "currentAge must be between 1 and {}",
            RETIREMENT_HORIZON_AGE - 1
        ));
    }

    Ok(FireParameters {
        current_age,
        monthly_expenses: require_positive_money(
            "monthlyExpenses",
            payload.monthly_expenses.unwrap_or(50_000.0),
        )?,
        current_savings: require_money(
            "currentSavings",
            payload.current_savings.unwrap_or(500_000.0),
        )?,
        monthly_investment: require_money(
            "monthlyInvestment",
            payload.monthly_investment.unwrap_or(20_000.0),
        )?,
        annual_step_up: require_percent("annualStepUp", payload.annual_step_up.unwrap_or(10.0))?,
        annual_return: require_percent("expectedReturn", payload.expected_return.unwrap_or(12.0))?,
        annual_inflation: require_percent(
            "inflationRate",
            payload.inflation_rate.unwrap_or(6.0),
        )?,
        variant: payload.variant.unwrap_or(ApiFireVariant::Standard).into(),
    })
}

fn build_ownership_params(payload: RentVsBuyPayload) -> Result<OwnershipParameters, String> {
    Ok(OwnershipParameters {
        horizon_years: require_years("horizonYears", payload.horizon_years.unwrap_or(10))?,
        renting: RentingParameters {
            monthly_rent: require_money("monthlyRent", payload.monthly_rent.unwrap_or(25_000.0))?,
            annual_rent_increase: require_percent(
                "annualRentIncrease",
                payload.annual_rent_increase.unwrap_or(5.0),
            )?,
            annual_investment_return: require_percent(
                "investmentReturn",
                payload.investment_return.unwrap_or(7.0),
            )?,
        },
        buying: BuyingParameters {
            property_price: require_positive_money(
                "propertyPrice",
                payload.property_price.unwrap_or(5_000_000.0),
            )?,
            down_payment_percent: require_percent(
                "downPaymentPercent",
                payload.down_payment_percent.unwrap_or(20.0),
            )?,
            loan_rate: require_percent("loanRate", payload.loan_rate.unwrap_or(8.5))?,
            loan_tenure_years: require_years(
                "loanTenureYears",
                payload.loan_tenure_years.unwrap_or(20),
            )?,
            annual_appreciation: require_percent(
                "annualAppreciation",
                payload.annual_appreciation.unwrap_or(6.0),
            )?,
            buying_cost_percent: require_percent(
                "buyingCostPercent",
                payload.buying_cost_percent.unwrap_or(7.0),
            )?,
            monthly_maintenance: require_money(
                "monthlyMaintenance",
                payload.monthly_maintenance.unwrap_or(2_000.0),
            )?,
        },
    })
}

fn build_tax_inputs(payload: TaxPayload) -> Result<TaxInputs, String> {
    Ok(TaxInputs {
        gross_salary: require_money("grossSalary", payload.gross_salary.unwrap_or(1_500_000.0))?,
        other_income: require_money("otherIncome", payload.other_income.unwrap_or(50_000.0))?,
        deduction_80c: require_money("deduction80C", payload.deduction_80c.unwrap_or(150_000.0))?,
        deduction_80d: require_money("deduction80D", payload.deduction_80d.unwrap_or(25_000.0))?,
        hra_exemption: require_money("hra", payload.hra_exemption.unwrap_or(0.0))?,
        home_loan_interest: require_money(
            "homeLoanInterest",
            payload.home_loan_interest.unwrap_or(0.0),
        )?,
        other_deductions: require_money(
            "otherDeductions",
            payload.other_deductions.unwrap_or(0.0),
        )?,
    })
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/api/loan", get(loan_get_handler).post(loan_post_handler))
        .route("/api/sip", get(sip_get_handler).post(sip_post_handler))
        .route(
            "/api/inflation",
            get(inflation_get_handler).post(inflation_post_handler),
        )
        .route("/api/fire", get(fire_get_handler).post(fire_post_handler))
        .route(
            "/api/rent-vs-buy",
            get(rent_vs_buy_get_handler).post(rent_vs_buy_post_handler),
        )
        .route("/api/tax", get(tax_get_handler).post(tax_post_handler))
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("calculator API listening on http://{addr}");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn loan_get_handler(Query(payload): Query<LoanPayload>) -> Response {
    loan_handler_impl(payload)
}

async fn loan_post_handler(Json(payload): Json<LoanPayload>) -> Response {
    loan_handler_impl(payload)
}

fn loan_handler_impl(payload: LoanPayload) -> Response {
    match build_loan_params(payload) {
        Ok(params) => json_response(StatusCode::OK, compare_loan_scenarios(&params)),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

async fn sip_get_handler(Query(payload): Query<SipPayload>) -> Response {
    sip_handler_impl(payload)
}

async fn sip_post_handler(Json(payload): Json<SipPayload>) -> Response {
    sip_handler_impl(payload)
}

fn sip_handler_impl(payload: SipPayload) -> Response {
    match build_sip_params(payload) {
        Ok(params) => json_response(StatusCode::OK, simulate_step_up_growth(&params)),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

async fn inflation_get_handler(Query(payload): Query<InflationPayload>) -> Response {
    inflation_handler_impl(payload)
}

async fn inflation_post_handler(Json(payload): Json<InflationPayload>) -> Response {
    inflation_handler_impl(payload)
}

fn inflation_handler_impl(payload: InflationPayload) -> Response {
    match build_erosion_params(payload) {
        Ok(params) => json_response(StatusCode::OK, simulate_erosion(&params)),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

async fn fire_get_handler(Query(payload): Query<FirePayload>) -> Response {
    fire_handler_impl(payload)
}

async fn fire_post_handler(Json(payload): Json<FirePayload>) -> Response {
    fire_handler_impl(payload)
}

fn fire_handler_impl(payload: FirePayload) -> Response {
    match build_fire_params(payload) {
        Ok(params) => json_response(StatusCode::OK, simulate_fire(&params)),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

async fn rent_vs_buy_get_handler(Query(payload): Query<RentVsBuyPayload>) -> Response {
    rent_vs_buy_handler_impl(payload)
}

async fn rent_vs_buy_post_handler(Json(payload): Json<RentVsBuyPayload>) -> Response {
    rent_vs_buy_handler_impl(payload)
}

fn rent_vs_buy_handler_impl(payload: RentVsBuyPayload) -> Response {
    match build_ownership_params(payload) {
        Ok(params) => json_response(StatusCode::OK, simulate_ownership(&params)),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

async fn tax_get_handler(Query(payload): Query<TaxPayload>) -> Response {
    tax_handler_impl(payload)
}

async fn tax_post_handler(Json(payload): Json<TaxPayload>) -> Response {
    tax_handler_impl(payload)
}

fn tax_handler_impl(payload: TaxPayload) -> Response {
    match build_tax_inputs(payload) {
        Ok(inputs) => json_response(StatusCode::OK, compare_tax_regimes(&inputs)),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TaxRegime;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn loan_payload_from_json(json: &str) -> Result<LoanParameters, String> {
        let payload = serde_json::from_str::<LoanPayload>(json)
            .map_err(|e| format!("Invalid JSON payload: {e}"))?;
        build_loan_params(payload)
    }

    #[test]
    fn loan_defaults_match_the_calculator_ui() {
        let params = build_loan_params(LoanPayload::default()).expect("valid defaults");

        assert_approx(params.principal, 5_000_000.0);
        assert_approx(params.annual_rate, 8.5);
        assert_eq!(params.tenure_years, 20);
        assert!(params.prepayment.is_none());
    }

    #[test]
    fn loan_payload_parses_web_keys() {
        let params = loan_payload_from_json(
            r#"{
              "loanAmount": 2500000,
              "interestRate": 9.25,
              "tenureYears": 15,
              "prepaymentEnabled": true,
              "prepaymentAmount": 10000,
              "prepaymentFrequency": "quarterly"
            }"#,
        )
        .expect("json should parse");

        assert_approx(params.principal, 2_500_000.0);
        assert_approx(params.annual_rate, 9.25);
        assert_eq!(params.tenure_years, 15);
        let prepayment = params.prepayment.expect("prepayment configured");
        assert_approx(prepayment.amount, 10_000.0);
        assert_eq!(prepayment.frequency, PrepaymentFrequency::Quarterly);
    }

    #[test]
    fn loan_prepayment_fields_ignored_when_disabled() {
        let params = loan_payload_from_json(
            r#"{"prepaymentAmount": 10000, "prepaymentFrequency": "yearly"}"#,
        )
        .expect("json should parse");

        assert!(params.prepayment.is_none());
    }

    #[test]
    fn loan_rejects_zero_amount() {
        let err = build_loan_params(LoanPayload {
            loan_amount: Some(0.0),
            ..LoanPayload::default()
        })
        .expect_err("must reject zero principal");
        assert!(err.contains("loanAmount"));
    }

    #[test]
    fn loan_rejects_non_finite_rate() {
        let err = build_loan_params(LoanPayload {
            interest_rate: Some(f64::NAN),
            ..LoanPayload::default()
        })
        .expect_err("must reject NaN rate");
        assert!(err.contains("interestRate"));
    }

    #[test]
    fn sip_payload_accepts_legacy_aliases() {
        let payload = serde_json::from_str::<SipPayload>(
            r#"{"monthlyInvestment": 7500, "stepUpPercent": 5, "returnRate": 11, "timePeriod": 15}"#,
        )
        .expect("json should parse");
        let params = build_sip_params(payload).expect("valid params");

        assert_approx(params.monthly_amount, 7_500.0);
        assert_approx(params.annual_step_up, 5.0);
        assert_approx(params.annual_return, 11.0);
        assert_eq!(params.years, 15);
    }

    #[test]
    fn inflation_rejects_zero_initial_amount() {
        let err = build_erosion_params(InflationPayload {
            initial_amount: Some(0.0),
            ..InflationPayload::default()
        })
        .expect_err("must reject zero amount");
        assert!(err.contains("initialAmount"));
    }

    #[test]
    fn fire_rejects_ages_at_or_past_the_horizon() {
        let err = build_fire_params(FirePayload {
            current_age: Some(RETIREMENT_HORIZON_AGE),
            ..FirePayload::default()
        })
        .expect_err("must reject horizon age");
        assert!(err.contains("currentAge"));
    }

    #[test]
    fn fire_payload_parses_variant_spellings() {
        let payload = serde_json::from_str::<FirePayload>(r#"{"fireType": "fat"}"#)
            .expect("json should parse");
        let params = build_fire_params(payload).expect("valid params");
        assert_eq!(params.variant, FireVariant::Fat);
    }

    #[test]
    fn rent_vs_buy_defaults_match_the_calculator_ui() {
        let params =
            build_ownership_params(RentVsBuyPayload::default()).expect("valid defaults");

        assert_eq!(params.horizon_years, 10);
        assert_approx(params.renting.monthly_rent, 25_000.0);
        assert_approx(params.renting.annual_rent_increase, 5.0);
        assert_approx(params.renting.annual_investment_return, 7.0);
        assert_approx(params.buying.property_price, 5_000_000.0);
        assert_approx(params.buying.down_payment_percent, 20.0);
        assert_approx(params.buying.loan_rate, 8.5);
        assert_eq!(params.buying.loan_tenure_years, 20);
        assert_approx(params.buying.monthly_maintenance, 2_000.0);
    }

    #[test]
    fn rent_vs_buy_rejects_down_payment_above_full_price() {
        let err = build_ownership_params(RentVsBuyPayload {
            down_payment_percent: Some(120.0),
            ..RentVsBuyPayload::default()
        })
        .expect_err("must reject >100% down payment");
        assert!(err.contains("downPaymentPercent"));
    }

    #[test]
    fn tax_defaults_produce_the_reference_comparison() {
        let inputs = build_tax_inputs(TaxPayload::default()).expect("valid defaults");
        let comparison = compare_tax_regimes(&inputs);

        assert_approx(comparison.total_tax_old, 218_400.0);
        assert_approx(comparison.total_tax_new, 105_300.0);
        assert_eq!(comparison.better_regime, TaxRegime::New);
    }

    #[test]
    fn tax_rejects_negative_deductions() {
        let err = build_tax_inputs(TaxPayload {
            deduction_80c: Some(-1.0),
            ..TaxPayload::default()
        })
        .expect_err("must reject negative deduction");
        assert!(err.contains("deduction80C"));
    }

    #[test]
    fn tax_comparison_serializes_camel_case() {
        let inputs = build_tax_inputs(TaxPayload::default()).expect("valid defaults");
        let value = serde_json::to_value(compare_tax_regimes(&inputs)).expect("serializable");

        assert!(value.get("totalTaxOld").is_some());
        assert!(value.get("totalTaxNew").is_some());
        assert_eq!(
            value.get("betterRegime").and_then(|v| v.as_str()),
            Some("new")
        );
    }
}
