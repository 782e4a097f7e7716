//! Meteosource point forecast tool.
//!
//! Looks up the weather for a coordinate pair. The upstream body is already
//! the JSON shape callers want, so a successful response is passed through
//! untouched.

use futures::FutureExt;
use reqwest::header::{ACCEPT, USER_AGENT};
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::Tool,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::common::{
    ToolOutcome, exchange, into_call_result, require_secret,
};
use crate::domains::tools::services::ToolServices;

const ACCEPT_GEO_JSON: &str = "application/geo+json";

/// Parameters for the weather lookup.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetWeatherParams {
    /// Latitude in decimal degrees.
    #[schemars(description = "Latitude of the location in decimal degrees (-90 to 90)")]
    pub lat: String,

    /// Longitude in decimal degrees.
    #[schemars(description = "Longitude of the location in decimal degrees (-180 to 180)")]
    pub lon: String,
}

/// A validated coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Parse and range-check a latitude/longitude pair.
    ///
    /// Both values are parsed before either range is checked; latitude is
    /// checked before longitude.
    pub fn parse(lat: &str, lon: &str) -> Result<Self, ToolError> {
        let (Some(latitude), Some(longitude)) = (parse_degrees(lat), parse_degrees(lon)) else {
            return Err(ToolError::invalid_arguments(
                "Invalid latitude or longitude format",
            ));
        };

        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ToolError::invalid_arguments(
                "Latitude must be between -90 and 90 degrees",
            ));
        }

        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ToolError::invalid_arguments(
                "Longitude must be between -180 and 180 degrees",
            ));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// Infinities parse and then fail the range check; NaN would pass every range
/// check, so it is treated as unparseable.
fn parse_degrees(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Query string sent to Meteosource.
#[derive(Debug, Serialize)]
struct ForecastQuery<'a> {
    lat: String,
    lon: String,
    sections: &'static str,
    timezone: &'static str,
    language: &'static str,
    units: &'static str,
    key: &'a str,
}

impl<'a> ForecastQuery<'a> {
    fn new(coords: Coordinates, key: &'a str) -> Self {
        Self {
            // f64 Display always uses '.' and never an exponent.
            lat: coords.latitude.to_string(),
            lon: coords.longitude.to_string(),
            sections: "all",
            timezone: "auto",
            language: "en",
            units: "metric",
            key,
        }
    }
}

/// Weather lookup tool.
#[derive(Debug, Clone)]
pub struct GetWeatherTool;

impl GetWeatherTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_weather";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get weather information for a specific location. \
         Returns the full Meteosource forecast (current conditions, hourly and daily sections) \
         in metric units with the location's local timezone, or {\"error\": ...} on failure.";

    /// Name of the credential this tool needs.
    pub const CREDENTIAL: &'static str = "Meteosource_Api_Key";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(lat = %params.lat, lon = %params.lon))]
    pub async fn execute(
        params: &GetWeatherParams,
        services: &ToolServices,
        ct: &CancellationToken,
    ) -> ToolOutcome {
        let api_key = require_secret(services.secrets.as_ref(), Self::CREDENTIAL)?;

        let coords = Coordinates::parse(&params.lat, &params.lon).inspect_err(|e| {
            warn!("Rejected weather request: {}", e);
        })?;

        let url = Self::forecast_url(&services.upstream.weather_url, coords, &api_key)?;
        info!(
            "Requesting forecast for ({}, {})",
            coords.latitude, coords.longitude
        );

        let request = services
            .http
            .get(url)
            .header(USER_AGENT, services.upstream.user_agent.as_str())
            .header(ACCEPT, ACCEPT_GEO_JSON);

        exchange(request, ct, Self::NAME).await?.into_success_body()
    }

    /// Build the full forecast URL for `coords`.
    pub fn forecast_url(base: &str, coords: Coordinates, api_key: &str) -> Result<String, ToolError> {
        let query = serde_urlencoded::to_string(ForecastQuery::new(coords, api_key))
            .map_err(|e| ToolError::unexpected(Self::NAME, e.to_string()))?;
        Ok(format!("{}?{}", base, query))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<GetWeatherParams>(),
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
                let params: GetWeatherParams =
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::secrets::StaticSecrets;
    use crate::domains::tools::services::test_support::services_for;
    use mockito::Matcher;

    const FORECAST_BODY: &str = r#"{"lat":"48.85N","lon":"2.35E","elevation":35,"timezone":"Europe/Paris","units":"metric","current":{"icon":"partly_sunny","summary":"Partly sunny","temperature":14.2},"hourly":{"data":[]},"daily":{"data":[]}}"#;

    fn params(lat: &str, lon: &str) -> GetWeatherParams {
        GetWeatherParams {
            lat: lat.to_string(),
            lon: lon.to_string(),
        }
    }

    fn keyed() -> StaticSecrets {
        StaticSecrets::new().with(GetWeatherTool::CREDENTIAL, "test-key")
    }

    #[test]
    fn test_parse_accepts_boundaries() {
        let coords = Coordinates::parse("-90", "180").unwrap();
        assert_eq!(coords.latitude, -90.0);
        assert_eq!(coords.longitude, 180.0);
        assert!(Coordinates::parse(" 45.5 ", "-122.68").is_ok());
    }

    #[test]
    fn test_parse_rejects_non_numbers() {
        for (lat, lon) in [("abc", "10"), ("10", "east"), ("", "10"), ("NaN", "0"), ("0", "nan")] {
            assert_eq!(
                Coordinates::parse(lat, lon).unwrap_err().to_string(),
                "Invalid latitude or longitude format",
                "lat={lat:?} lon={lon:?}"
            );
        }
    }

    #[test]
    fn test_parse_checks_format_before_range() {
        // Latitude is out of range but longitude does not parse.
        assert_eq!(
            Coordinates::parse("91", "x").unwrap_err().to_string(),
            "Invalid latitude or longitude format"
        );
    }

    #[test]
    fn test_parse_checks_latitude_before_longitude() {
        assert_eq!(
            Coordinates::parse("-91", "200").unwrap_err().to_string(),
            "Latitude must be between -90 and 90 degrees"
        );
        assert_eq!(
            Coordinates::parse("0", "200").unwrap_err().to_string(),
            "Longitude must be between -180 and 180 degrees"
        );
    }

    #[test]
    fn test_parse_infinities_fail_range_checks() {
        for lat in ["1e400", "inf", "-infinity", "Infinity"] {
            assert_eq!(
                Coordinates::parse(lat, "0").unwrap_err().to_string(),
                "Latitude must be between -90 and 90 degrees",
                "lat={lat:?}"
            );
        }
        assert_eq!(
            Coordinates::parse("0", "-1e400").unwrap_err().to_string(),
            "Longitude must be between -180 and 180 degrees"
        );
    }

    #[test]
    fn test_forecast_url_parameters() {
        let coords = Coordinates::parse("48.8566", "2.3522").unwrap();
        let url = GetWeatherTool::forecast_url("https://example.test/point", coords, "a b&c").unwrap();
        assert_eq!(
            url,
            "https://example.test/point?lat=48.8566&lon=2.3522&sections=all&timezone=auto\
             &language=en&units=metric&key=a+b%26c"
        );
    }

    #[test]
    fn test_forecast_url_formats_integers_plainly() {
        let coords = Coordinates::parse("40", "-0.5").unwrap();
        let url = GetWeatherTool::forecast_url("http://h/point", coords, "k").unwrap();
        assert!(url.starts_with("http://h/point?lat=40&lon=-0.5&"));
    }

    #[tokio::test]
    async fn test_success_returns_body_verbatim() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/point")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("lat".into(), "48.85".into()),
                Matcher::UrlEncoded("lon".into(), "2.35".into()),
                Matcher::UrlEncoded("sections".into(), "all".into()),
                Matcher::UrlEncoded("timezone".into(), "auto".into()),
                Matcher::UrlEncoded("language".into(), "en".into()),
                Matcher::UrlEncoded("units".into(), "metric".into()),
                Matcher::UrlEncoded("key".into(), "test-key".into()),
            ]))
            .match_header("accept", ACCEPT_GEO_JSON)
            .match_header("user-agent", "ASimpleStarGazer/1.0")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(FORECAST_BODY)
            .expect(1)
            .create_async()
            .await;

        let services = services_for(&server.url(), keyed());
        let result =
            GetWeatherTool::execute(&params("48.85", "2.35"), &services, &CancellationToken::new())
                .await;

        assert_eq!(result.unwrap(), FORECAST_BODY);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_out_of_range_latitude_makes_no_call() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let services = services_for(&server.url(), keyed());
        let err = GetWeatherTool::execute(&params("91", "0"), &services, &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(
            err.to_payload(),
            r#"{"error":"Latitude must be between -90 and 90 degrees"}"#
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_out_of_range_longitude_makes_no_call() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let services = services_for(&server.url(), keyed());
        let err = GetWeatherTool::execute(&params("0", "200"), &services, &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Longitude must be between -180 and 180 degrees"
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_key_makes_no_call() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let services = services_for(&server.url(), StaticSecrets::new());
        let err = GetWeatherTool::execute(&params("abc", "0"), &services, &CancellationToken::new())
            .await
            .unwrap_err();

        // The credential is checked before the arguments.
        assert_eq!(
            err.to_payload(),
            r#"{"error":"Meteosource_Api_Key not found in environment variables"}"#
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upstream_error_status_is_reported() {
        let mut server = mockito::Server::new_async().await;
        let long_body = "maintenance ".repeat(60);
        server
            .mock("GET", "/point")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body(&long_body)
            .create_async()
            .await;

        let services = services_for(&server.url(), keyed());
        let err = GetWeatherTool::execute(&params("10", "10"), &services, &CancellationToken::new())
            .await
            .unwrap_err();

        let message = err.to_string();
        assert!(message.starts_with("HTTP 503: maintenance"));
        assert!(message.ends_with('…'));
        assert_eq!(message.chars().count(), "HTTP 503: ".len() + 500 + 1);
    }

    #[tokio::test]
    async fn test_slow_upstream_times_out() {
        // Accepts the connection but never answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let _hold = tokio::spawn(async move {
            let _conn = listener.accept().await;
            tokio::time::sleep(std::time::Duration::from_secs(30)).await;
        });

        let mut services = services_for(&format!("http://{}", addr), keyed());
        services.http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(200))
            .build()
            .unwrap();

        let err = GetWeatherTool::execute(&params("1", "1"), &services, &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_payload(), r#"{"error":"Request timeout"}"#);
    }

    #[tokio::test]
    async fn test_connection_failure_is_unexpected_error() {
        // Bind then drop to get a port with nothing listening.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let services = services_for(&format!("http://{}", addr), keyed());
        let err = GetWeatherTool::execute(&params("1", "1"), &services, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(
            err.to_string().starts_with("Unexpected error in get_weather: "),
            "got {err}"
        );
    }

    #[test]
    fn test_params_require_both_coordinates() {
        let missing: Result<GetWeatherParams, _> = serde_json::from_str(r#"{"lat": "1"}"#);
        assert!(missing.is_err());
    }
}
