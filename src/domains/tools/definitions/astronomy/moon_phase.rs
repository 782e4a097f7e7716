//! AstronomyAPI moon-phase tool.
//!
//! Asks the AstronomyAPI studio endpoint for a moon-phase rendering and keeps
//! only the phase name, illumination and age from its answer.

use chrono::{Datelike, NaiveDate};
use futures::FutureExt;
use reqwest::header::AUTHORIZATION;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::Tool,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::common::{
    ToolOutcome, exchange, into_call_result, require_secret,
};
use crate::domains::tools::services::ToolServices;

/// Upstream name used in decoding errors.
const UPSTREAM: &str = "AstronomyAPI";

/// Value used for any field the upstream leaves out.
const UNKNOWN: &str = "Unknown";

/// Parameters for the moon-phase lookup.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetMoonPhaseParams {
    /// Observer latitude, passed through to the upstream.
    #[schemars(description = "Latitude of the observer")]
    pub lat: String,

    /// Observer longitude, passed through to the upstream.
    #[schemars(description = "Longitude of the observer")]
    pub lon: String,

    /// Observation date.
    #[schemars(description = "The date in ISO format (YYYY-MM-DD)")]
    pub date: String,
}

// ============================================================================
// Request body
// ============================================================================

#[derive(Debug, Serialize)]
struct MoonPhaseRequest<'a> {
    style: MoonStyle,
    observer: Observer<'a>,
    view: View,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MoonStyle {
    moon_style: &'static str,
    background_style: &'static str,
    background_color: &'static str,
    heading_color: &'static str,
    text_color: &'static str,
}

#[derive(Debug, Serialize)]
struct Observer<'a> {
    latitude: &'a str,
    longitude: &'a str,
    date: &'a str,
}

#[derive(Debug, Serialize)]
struct View {
    #[serde(rename = "type")]
    kind: &'static str,
    parameters: Map<String, Value>,
}

impl<'a> MoonPhaseRequest<'a> {
    fn new(params: &'a GetMoonPhaseParams) -> Self {
        Self {
            style: MoonStyle {
                moon_style: "default",
                background_style: "stars",
                background_color: "#000000",
                heading_color: "#ffffff",
                text_color: "#ffffff",
            },
            observer: Observer {
                latitude: &params.lat,
                longitude: &params.lon,
                date: &params.date,
            },
            view: View {
                kind: "portrait-simple",
                parameters: Map::new(),
            },
        }
    }
}

// ============================================================================
// Structured Output
// ============================================================================

/// The three fields kept from an AstronomyAPI answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MoonPhaseSummary {
    pub moon_phase: String,
    pub illumination: String,
    pub age: String,
}

impl MoonPhaseSummary {
    /// Extract `data.moonPhase`, `data.illumination` and `data.age`.
    pub fn from_response(body: &str) -> Result<Self, ToolError> {
        let root: Value =
            serde_json::from_str(body).map_err(|e| ToolError::decode(UPSTREAM, e.to_string()))?;

        let data = root
            .get("data")
            .ok_or_else(|| ToolError::decode(UPSTREAM, "missing field `data`"))?
            .as_object()
            .ok_or_else(|| ToolError::decode(UPSTREAM, "field `data` is not an object"))?;

        Ok(Self {
            moon_phase: field_text(data, "moonPhase"),
            illumination: field_text(data, "illumination"),
            age: field_text(data, "age"),
        })
    }
}

/// String values as-is, other values as their JSON text, absent or null as
/// [`UNKNOWN`].
fn field_text(data: &Map<String, Value>, key: &str) -> String {
    match data.get(key) {
        None | Some(Value::Null) => UNKNOWN.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Accept exactly `YYYY-MM-DD` naming a real calendar date.
pub fn parse_date(date: &str) -> Result<NaiveDate, ToolError> {
    let invalid = || ToolError::invalid_arguments("Date must be in YYYY-MM-DD format");

    let bytes = date.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .filter(|d| d.year() >= 1)
        .ok_or_else(invalid)
}

/// Moon-phase lookup tool.
#[derive(Debug, Clone)]
pub struct GetMoonPhaseTool;

impl GetMoonPhaseTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_moon_phase";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get the moon phase for a specific date and location. \
         Returns {\"moon_phase\", \"illumination\", \"age\"} as strings (\"Unknown\" when the \
         upstream omits a value), or {\"error\": ...} on failure.";

    /// Name of the credential this tool needs.
    pub const CREDENTIAL: &'static str = "AstronomyAPI_key";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(lat = %params.lat, lon = %params.lon, date = %params.date))]
    pub async fn execute(
        params: &GetMoonPhaseParams,
        services: &ToolServices,
        ct: &CancellationToken,
    ) -> ToolOutcome {
        let token = require_secret(services.secrets.as_ref(), Self::CREDENTIAL)?;

        parse_date(&params.date).inspect_err(|_| {
            warn!("Rejected moon-phase request: bad date {:?}", params.date);
        })?;

        info!("Requesting moon phase");

        // The token is expected to be stored already encoded for Basic auth.
        let request = services
            .http
            .post(&services.upstream.moon_phase_url)
            .header(AUTHORIZATION, format!("Basic {}", token))
            .json(&MoonPhaseRequest::new(params));

        let body = exchange(request, ct, Self::NAME)
            .await?
            .into_success_body()?;

        let summary = MoonPhaseSummary::from_response(&body).inspect_err(|e| {
            warn!("{}", e);
        })?;

        serde_json::to_string(&summary).map_err(|e| ToolError::unexpected(Self::NAME, e.to_string()))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<GetMoonPhaseParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for STDIO/TCP transport.
    pub fn create_route<S>(services: ToolServices) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let ct = ctx.request_context.ct.clone();
            let services = services.clone();
            async move {
                let params: GetMoonPhaseParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(into_call_result(
                    Self::execute(&params, &services, &ct).await,
                ))
            }
            .boxed()
        })
    }
}
