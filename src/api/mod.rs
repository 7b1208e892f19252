//! JSON request dispatcher
//!
//! Maps `POST /api/<tool>` to the calculators. Front ends (Lambda, CLI, tests)
//! convert their own request type into an [`ApiRequest`] and render the
//! [`ApiResponse`] back. Failures become `{"error": ...}` bodies:
//!
//! | Error                               | Status |
//! |-------------------------------------|--------|
//! | bad JSON, validation, missing rate  | 400    |
//! | unknown route                       | 404    |
//! | method other than POST              | 405    |
//! | upstream service failure            | 502    |
//! | missing API key, local I/O          | 500    |

use crate::assistant::{run_tool, AiTool, ChatBackend, OpenAiBackend, ToolRequest};
use crate::calculators::currency::{fetch_exchange_rates, normalize_currency_code};
use crate::calculators::income_tax::validate_income;
use crate::calculators::{
    calculate_age, calculate_bmi, calculate_date_difference, calculate_due_date, calculate_gpa,
    convert_currency, BmiInputs, Course, ExchangeRates, FilingStatus, PregnancyInputs, TaxTable,
};
use crate::config::ServiceConfig;
use crate::error::{Result, ToolsError};
use crate::finance::{calculate_car_loan, calculate_mortgage, compound_growth, CarLoanInputs, MortgageInputs};
use crate::finance::{CompoundGrowthParameters, LoanParameters};
use crate::text::{calculate_similarity, generate_citation, CitationData, SimilarityReport};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

/// Routes served under `/api/`
pub const ROUTES: [&str; 16] = [
    "loan",
    "mortgage",
    "car-loan",
    "compound-interest",
    "age",
    "date-difference",
    "pregnancy",
    "bmi",
    "gpa",
    "income-tax",
    "currency",
    "similarity",
    "citation",
    "ai/grammar-checker",
    "ai/essay-improver",
    "ai/summarizer",
];

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

impl ApiRequest {
    pub fn post(path: impl Into<String>, body: impl Into<String>) -> Self {
        Self { method: "POST".to_string(), path: path.into(), body: body.into() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self { status, body: json!({ "error": message.into() }) }
    }

    pub fn from_error(err: &ToolsError) -> Self {
        match err {
            ToolsError::InvalidInput { field, message } => Self {
                status: 400,
                body: json!({ "error": message, "field": field }),
            },
            ToolsError::UnknownRoute(_) => Self::error(404, err.to_string()),
            ToolsError::Upstream(message) => Self::error(502, message.clone()),
            ToolsError::Http(_) => Self::error(502, err.to_string()),
            e if e.is_client_error() => Self::error(400, e.to_string()),
            e => Self::error(500, e.to_string()),
        }
    }
}

// ============================================================================
// Request bodies for routes without a dedicated input type
// ============================================================================

#[derive(Debug, Deserialize)]
struct AgeRequest {
    date_of_birth: NaiveDate,
    /// Defaults to the server's current date
    #[serde(default)]
    today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct DateDifferenceRequest {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
struct PregnancyRequest {
    #[serde(flatten)]
    inputs: PregnancyInputs,
    #[serde(default)]
    today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct GpaRequest {
    courses: Vec<Course>,
}

#[derive(Debug, Deserialize)]
struct IncomeTaxRequest {
    annual_income: f64,
    filing_status: FilingStatus,
}

#[derive(Debug, Deserialize)]
struct CurrencyRequest {
    amount: f64,
    from: String,
    to: String,
    /// Caller-supplied snapshot; otherwise the dispatcher's own
    #[serde(default)]
    rates: Option<ExchangeRates>,
}

#[derive(Debug, Deserialize)]
struct SimilarityRequest {
    text_a: String,
    text_b: String,
}

#[derive(Debug, Serialize)]
struct SimilarityReply {
    #[serde(flatten)]
    report: SimilarityReport,
    interpretation: &'static str,
}

fn parse<T: DeserializeOwned>(body: &str) -> Result<T> {
    let body = if body.trim().is_empty() { "{}" } else { body };
    Ok(serde_json::from_str(body)?)
}

fn to_json<T: Serialize>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Routes requests to calculators; shared across concurrent invocations
pub struct Dispatcher {
    config: ServiceConfig,
    tax_table: TaxTable,
    rates: Option<ExchangeRates>,
    backend: Option<Arc<dyn ChatBackend>>,
    client: reqwest::Client,
}

impl Dispatcher {
    /// Dispatcher with sample tax tables and no language model
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            config,
            tax_table: TaxTable::default(),
            rates: None,
            backend: None,
            client: reqwest::Client::new(),
        }
    }

    /// Load the configured tax table and connect the language model if a key is set
    pub fn from_config(config: ServiceConfig) -> Result<Self> {
        let mut dispatcher = Self::new(config);

        if let Some(path) = &dispatcher.config.tax_table_path {
            log::info!("Loading tax brackets from {}", path.display());
            dispatcher.tax_table = TaxTable::from_csv_file(path)?;
        }

        match OpenAiBackend::from_env(dispatcher.client.clone(), &dispatcher.config) {
            Ok(backend) => dispatcher.backend = Some(Arc::new(backend)),
            Err(e) => log::warn!("AI tools disabled: {}", e),
        }

        Ok(dispatcher)
    }

    pub fn with_backend(mut self, backend: Arc<dyn ChatBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn with_tax_table(mut self, table: TaxTable) -> Self {
        self.tax_table = table;
        self
    }

    /// Fixed rates snapshot used instead of fetching live rates
    pub fn with_rates(mut self, rates: ExchangeRates) -> Self {
        self.rates = Some(rates);
        self
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub async fn dispatch(&self, request: &ApiRequest) -> ApiResponse {
        let path = request.path.trim_end_matches('/');

        if request.method.eq_ignore_ascii_case("GET") && (path.is_empty() || path == "/api") {
            return ApiResponse::ok(json!({
                "message": "Smart Tools API",
                "endpoints": ROUTES.iter().map(|r| format!("/api/{}", r)).collect::<Vec<_>>(),
            }));
        }

        let route = match path.strip_prefix("/api/") {
            Some(route) if ROUTES.contains(&route) => route,
            _ => return ApiResponse::from_error(&ToolsError::UnknownRoute(request.path.clone())),
        };

        if !request.method.eq_ignore_ascii_case("POST") {
            return ApiResponse::error(405, "Method not allowed");
        }

        match self.handle(route, &request.body).await {
            Ok(body) => ApiResponse::ok(body),
            Err(e) => {
                if e.is_client_error() {
                    log::debug!("Rejected {}: {}", route, e);
                } else {
                    log::error!("{} failed: {}", route, e);
                }
                ApiResponse::from_error(&e)
            }
        }
    }

    async fn handle(&self, route: &str, body: &str) -> Result<Value> {
        match route {
            "loan" => {
                let params: LoanParameters = parse(body)?;
                params.validate()?;
                to_json(&params.compare())
            }
            "mortgage" => {
                let inputs: MortgageInputs = parse(body)?;
                inputs.validate()?;
                to_json(&calculate_mortgage(&inputs))
            }
            "car-loan" => {
                let inputs: CarLoanInputs = parse(body)?;
                inputs.validate()?;
                to_json(&calculate_car_loan(&inputs))
            }
            "compound-interest" => {
                let params: CompoundGrowthParameters = parse(body)?;
                params.validate()?;
                to_json(&compound_growth(&params))
            }
            "age" => {
                let req: AgeRequest = parse(body)?;
                let age = calculate_age(req.date_of_birth, req.today.unwrap_or_else(today))?;
                Ok(json!({
                    "years": age.years,
                    "months": age.months,
                    "days": age.days,
                    "description": age.describe(),
                }))
            }
            "date-difference" => {
                let req: DateDifferenceRequest = parse(body)?;
                let diff = calculate_date_difference(req.start_date, req.end_date)?;
                let mut value = to_json(&diff)?;
                value["description"] = Value::String(diff.describe());
                Ok(value)
            }
            "pregnancy" => {
                let req: PregnancyRequest = parse(body)?;
                let today = req.today.unwrap_or_else(today);
                req.inputs.validate(today)?;
                to_json(&calculate_due_date(&req.inputs, today)?)
            }
            "bmi" => {
                let inputs: BmiInputs = parse(body)?;
                inputs.validate()?;
                let result = calculate_bmi(&inputs);
                let mut value = to_json(&result)?;
                value["label"] = Value::String(result.category.label().to_string());
                Ok(value)
            }
            "gpa" => {
                let req: GpaRequest = parse(body)?;
                to_json(&calculate_gpa(&req.courses))
            }
            "income-tax" => {
                let req: IncomeTaxRequest = parse(body)?;
                validate_income(req.annual_income)?;
                to_json(&self.tax_table.calculate(req.annual_income, req.filing_status))
            }
            "currency" => self.convert(body).await,
            "similarity" => {
                let req: SimilarityRequest = parse(body)?;
                let report = SimilarityReport::new(calculate_similarity(&req.text_a, &req.text_b));
                to_json(&SimilarityReply { report, interpretation: report.band.label() })
            }
            "citation" => {
                let data: CitationData = parse(body)?;
                Ok(json!({ "citation": generate_citation(&data) }))
            }
            other => {
                let tool = other
                    .strip_prefix("ai/")
                    .and_then(AiTool::from_route)
                    .ok_or_else(|| ToolsError::UnknownRoute(format!("/api/{}", other)))?;
                let request: ToolRequest = parse(body)?;
                request.validate(tool.char_limit(&self.config))?;
                let backend = self.backend.as_deref().ok_or(ToolsError::MissingApiKey)?;
                let reply = run_tool(backend, tool, &request, &self.config).await?;
                Ok(json!({ tool.reply_field(): reply }))
            }
        }
    }

    async fn convert(&self, body: &str) -> Result<Value> {
        let req: CurrencyRequest = parse(body)?;
        if !req.amount.is_finite() || req.amount < 0.0 {
            return Err(ToolsError::invalid("amount", "Amount must be 0 or greater"));
        }
        let from = normalize_currency_code("from", &req.from)?;
        let to = normalize_currency_code("to", &req.to)?;

        let live;
        let rates = match (&req.rates, &self.rates) {
            (Some(supplied), _) => supplied,
            (None, Some(snapshot)) => snapshot,
            (None, None) => {
                live = fetch_exchange_rates(&self.client, &self.config.rate_endpoints, &from).await?;
                &live
            }
        };

        to_json(&convert_currency(req.amount, &from, &to, rates)?)
    }
}
