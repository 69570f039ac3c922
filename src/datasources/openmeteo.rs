use super::PrecipitationSource;
use crate::config::{ArchiveConfig, LocationConfig};
use crate::error::{Result, RicecastError};
use chrono::NaiveDate;
use serde::Deserialize;

const DAILY_VARIABLE: &str = "precipitation_sum";

/// Client for the Open-Meteo historical weather archive
pub struct OpenMeteoArchiveClient {
    client: reqwest::Client,
    base_url: String,
}

// Open-Meteo archive response structures
#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    #[serde(default)]
    daily: Option<ArchiveDaily>,
}

#[derive(Debug, Deserialize)]
struct ArchiveDaily {
    #[serde(default)]
    precipitation_sum: Option<Vec<Option<f64>>>,
}

impl OpenMeteoArchiveClient {
    pub fn new(config: &ArchiveConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.clone(),
        }
    }

    async fn get_daily_precipitation(
        &self,
        location: &LocationConfig,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<String> {
        let params = [
            ("latitude", location.latitude.to_string()),
            ("longitude", location.longitude.to_string()),
            ("start_date", start.format("%Y-%m-%d").to_string()),
            ("end_date", end.format("%Y-%m-%d").to_string()),
            ("daily", DAILY_VARIABLE.to_string()),
            ("timezone", location.timezone.clone()),
        ];

        tracing::debug!(
            "Requesting {} for {} ({} to {})",
            DAILY_VARIABLE,
            location.name,
            start,
            end
        );

        let response = self
            .client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| RicecastError::Transport(format!("Open-Meteo: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RicecastError::Transport(format!(
                "Open-Meteo returned {}: {}",
                status, body
            )));
        }

        response
            .text()
            .await
            .map_err(|e| RicecastError::Transport(format!("Open-Meteo: {}", e)))
    }

    /// Test connection to the archive API with a one-day request
    pub async fn test_connection(&self, location: &LocationConfig) -> Result<bool> {
        let day = NaiveDate::from_ymd_opt(2020, 1, 1)
            .ok_or_else(|| RicecastError::InvalidConfiguration("connection test date".into()))?;
        let body = self.get_daily_precipitation(location, day, day).await?;
        Ok(sum_precipitation(&body).is_ok())
    }
}

impl PrecipitationSource for OpenMeteoArchiveClient {
    async fn fetch_total_precipitation(
        &self,
        location: &LocationConfig,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<f64> {
        let body = self.get_daily_precipitation(location, start, end).await?;
        let total = sum_precipitation(&body)?;
        tracing::info!(
            "Total precipitation at {} from {} to {}: {:.2} mm",
            location.name,
            start,
            end,
            total
        );
        Ok(total)
    }
}

/// Sum the daily precipitation series of an archive response body.
/// Null days count as zero; a missing series is a format error.
fn sum_precipitation(body: &str) -> Result<f64> {
    let response: ArchiveResponse = serde_json::from_str(body).map_err(|e| {
        RicecastError::MalformedResponse(format!("Failed to parse Open-Meteo response: {}", e))
    })?;

    let values = response
        .daily
        .and_then(|d| d.precipitation_sum)
        .ok_or_else(|| {
            RicecastError::MalformedResponse(format!("missing daily.{}", DAILY_VARIABLE))
        })?;

    let missing = values.iter().filter(|v| v.is_none()).count();
    if missing > 0 {
        tracing::debug!("{} of {} days had no precipitation value", missing, values.len());
    }

    Ok(values.iter().map(|v| v.unwrap_or(0.0)).sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn client_for(base_url: String) -> OpenMeteoArchiveClient {
        OpenMeteoArchiveClient::new(&ArchiveConfig { base_url })
    }

    fn rabi_2024() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2024, 2, 15).unwrap(),
            NaiveDate::from_ymd_opt(2024, 4, 30).unwrap(),
        )
    }

    /// Answer a single HTTP request with a fixed status line and body,
    /// returning the archive URL to point the client at.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request: Vec<u8> = Vec::new();
            let mut chunk = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
            }
            let reply = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });

        format!("http://{}/v1/archive", addr)
    }

    #[tokio::test]
    async fn refused_connection_is_transport_error() {
        let client = client_for("http://127.0.0.1:1/v1/archive".into());
        let (start, end) = rabi_2024();
        let result = client
            .fetch_total_precipitation(&LocationConfig::default(), start, end)
            .await;
        assert!(matches!(result, Err(RicecastError::Transport(_))));
    }

    #[tokio::test]
    async fn server_error_status_is_transport_error() {
        let url = serve_once("500 Internal Server Error", r#"{"error": true}"#).await;
        let client = client_for(url);
        let (start, end) = rabi_2024();
        let result = client
            .fetch_total_precipitation(&LocationConfig::default(), start, end)
            .await;
        match result {
            Err(RicecastError::Transport(msg)) => assert!(msg.contains("500")),
            other => panic!("expected transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn bad_request_status_is_transport_error() {
        let url = serve_once(
            "400 Bad Request",
            r#"{"error": true, "reason": "Parameter 'start_date' is out of allowed range"}"#,
        )
        .await;
        let (start, end) = rabi_2024();
        let result = client_for(url)
            .fetch_total_precipitation(&LocationConfig::default(), start, end)
            .await;
        assert!(matches!(result, Err(RicecastError::Transport(_))));
    }

    #[tokio::test]
    async fn success_response_is_summed() {
        let url = serve_once(
            "200 OK",
            r#"{"daily": {"time": ["2024-02-15", "2024-02-16"], "precipitation_sum": [3.5, null]}}"#,
        )
        .await;
        let (start, end) = rabi_2024();
        let total = client_for(url)
            .fetch_total_precipitation(&LocationConfig::default(), start, end)
            .await
            .unwrap();
        assert!((total - 3.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn success_status_with_bad_body_is_malformed() {
        let url = serve_once("200 OK", "<html>maintenance</html>").await;
        let (start, end) = rabi_2024();
        let result = client_for(url)
            .fetch_total_precipitation(&LocationConfig::default(), start, end)
            .await;
        assert!(matches!(result, Err(RicecastError::MalformedResponse(_))));
    }

    #[test]
    fn sums_daily_values() {
        let body = r#"{
            "latitude": 28.4,
            "longitude": 77.875,
            "timezone": "Asia/Kolkata",
            "daily_units": {"time": "iso8601", "precipitation_sum": "mm"},
            "daily": {
                "time": ["2024-02-15", "2024-02-16", "2024-02-17"],
                "precipitation_sum": [1.5, 0.0, 12.25]
            }
        }"#;
        let total = sum_precipitation(body).unwrap();
        assert!((total - 13.75).abs() < 1e-9);
    }

    #[test]
    fn null_days_count_as_zero() {
        let body = r#"{"daily": {"time": ["a", "b", "c"], "precipitation_sum": [null, 4.0, null]}}"#;
        let total = sum_precipitation(body).unwrap();
        assert!((total - 4.0).abs() < 1e-9);
    }

    #[test]
    fn empty_series_is_zero_not_failure() {
        let body = r#"{"daily": {"time": [], "precipitation_sum": []}}"#;
        assert_eq!(sum_precipitation(body).unwrap(), 0.0);
    }

    #[test]
    fn missing_daily_is_malformed() {
        let body = r#"{"latitude": 28.4, "longitude": 77.875}"#;
        assert!(matches!(
            sum_precipitation(body),
            Err(RicecastError::MalformedResponse(_))
        ));
    }

    #[test]
    fn missing_variable_is_malformed() {
        let body = r#"{"daily": {"time": ["2024-02-15"], "rain_sum": [1.0]}}"#;
        assert!(matches!(
            sum_precipitation(body),
            Err(RicecastError::MalformedResponse(_))
        ));
    }

    #[test]
    fn non_json_is_malformed() {
        assert!(matches!(
            sum_precipitation("<html>Bad Gateway</html>"),
            Err(RicecastError::MalformedResponse(_))
        ));
    }

    #[test]
    fn client_creation() {
        let client = OpenMeteoArchiveClient::new(&ArchiveConfig::default());
        assert_eq!(
            client.base_url,
            "https://archive-api.open-meteo.com/v1/archive"
        );
    }
}
