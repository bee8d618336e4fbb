//! FRED API integration for the mortgage and Treasury rate series.

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::domain::{TimeSeries, Unit};
use crate::error::AppError;

const BASE_URL: &str = "https://api.stlouisfed.org/fred/series/observations";
const OBS_LIMIT: usize = 10000;

/// 30-Year Fixed Rate Mortgage Average (Freddie Mac PMMS), weekly.
pub const SERIES_PMMS_30Y: &str = "MORTGAGE30US";
/// 10-Year Treasury Constant Maturity Rate, daily.
pub const SERIES_TREASURY_10Y: &str = "DGS10";

/// Candidate FRED series for a 30-year current-coupon rate.
///
/// A true FNMA 30y TBA current coupon is a Bloomberg field; these Optimal Blue
/// mortgage indices are the closest freely available stand-ins.
const CC30_CANDIDATES: [&str; 2] = ["OBMMIFHA30YF", "OBMMIC30YF"];

/// Primary-secondary offset (percentage points) used when no candidate series
/// is available and CC30 has to be proxied from PMMS.
const CC30_PROXY_OFFSET: f64 = 0.50;

pub const LABEL_PMMS: &str = "PMMS_30Y";
pub const LABEL_TREASURY: &str = "Treasury_10Y";
pub const LABEL_CC30: &str = "CC30";

/// How the CC30 leg was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cc30Source {
    /// A real FRED series (the id that worked).
    Fred(String),
    /// Derived as `PMMS - 50bp` because no candidate series was available.
    PmmsProxy,
}

impl Cc30Source {
    pub fn describe(&self) -> String {
        match self {
            Cc30Source::Fred(id) => format!("FRED series {id}"),
            Cc30Source::PmmsProxy => format!(
                "proxy: PMMS - {:.0}bp (no current-coupon series available)",
                CC30_PROXY_OFFSET * 100.0
            ),
        }
    }
}

pub struct FredClient {
    client: Client,
    api_key: String,
}

impl FredClient {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let api_key = std::env::var("FRED_API_KEY")
            .map_err(|_| AppError::usage("Missing FRED_API_KEY in environment (.env)."))?;
        Ok(Self {
            client: Client::new(),
            api_key,
        })
    }

    /// Fetch one series as percent-unit observations in `[start, end]`.
    ///
    /// FRED encodes missing observations as `"."`; those are skipped rather
    /// than fabricated. An empty result is not an error here — overlap
    /// checking is the aligner's job.
    pub fn fetch_series(
        &self,
        series_id: &str,
        label: &str,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<TimeSeries, AppError> {
        let mut req = self.client.get(BASE_URL).query(&[
            ("series_id", series_id),
            ("api_key", &self.api_key),
            ("file_type", "json"),
            ("sort_order", "asc"),
            ("limit", &OBS_LIMIT.to_string()),
            ("observation_start", &start.to_string()),
        ]);

        if let Some(end) = end {
            req = req.query(&[("observation_end", &end.to_string())]);
        }

        let resp = req
            .send()
            .map_err(|e| AppError::fetch(format!("FRED request for {series_id} failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::fetch(format!(
                "FRED request for {series_id} failed with status {}.",
                resp.status()
            )));
        }

        let body: ObservationsResponse = resp.json().map_err(|e| {
            AppError::fetch(format!("Failed to parse FRED response for {series_id}: {e}"))
        })?;

        let mut out = Vec::new();
        for obs in body.observations {
            let value = match parse_value(&obs.value) {
                Some(v) => v,
                None => continue,
            };
            let date = NaiveDate::parse_from_str(&obs.date, "%Y-%m-%d")
                .map_err(|e| AppError::fetch(format!("Invalid FRED date '{}': {e}", obs.date)))?;
            out.push((date, value));
        }

        Ok(TimeSeries::new(series_id, label, Unit::Percent, out))
    }

    pub fn fetch_pmms(&self, start: NaiveDate, end: Option<NaiveDate>) -> Result<TimeSeries, AppError> {
        self.fetch_series(SERIES_PMMS_30Y, LABEL_PMMS, start, end)
    }

    pub fn fetch_treasury_10y(
        &self,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<TimeSeries, AppError> {
        self.fetch_series(SERIES_TREASURY_10Y, LABEL_TREASURY, start, end)
    }

    /// Fetch a 30-year current-coupon series, falling back through the
    /// candidate list and finally to the PMMS-based proxy.
    ///
    /// Candidate failures (unknown series, HTTP errors, empty history) move on
    /// to the next candidate; only the proxy path depends on `pmms`.
    pub fn fetch_cc30(
        &self,
        pmms: &TimeSeries,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<(TimeSeries, Cc30Source), AppError> {
        for candidate in CC30_CANDIDATES {
            match self.fetch_series(candidate, LABEL_CC30, start, end) {
                Ok(series) if !series.is_empty() => {
                    return Ok((series, Cc30Source::Fred(candidate.to_string())));
                }
                Ok(_) | Err(_) => continue,
            }
        }

        if pmms.is_empty() {
            return Err(AppError::missing_data(
                "Cannot build CC30 proxy: PMMS has no observations in the requested range.",
            ));
        }
        let proxy = pmms.map_values("CC30_PROXY", LABEL_CC30, |v| v - CC30_PROXY_OFFSET);
        Ok((proxy, Cc30Source::PmmsProxy))
    }
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    observations: Vec<Observation>,
}

#[derive(Debug, Deserialize)]
struct Observation {
    date: String,
    value: String,
}

fn parse_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed == "." || trimmed.is_empty() {
        return None;
    }
    let v = trimmed.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parse_value_skips_fred_missing_markers() {
        assert_eq!(parse_value("."), None);
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value(" . "), None);
        assert_eq!(parse_value("6.72"), Some(6.72));
        assert_eq!(parse_value(" 4.25 "), Some(4.25));
        assert_eq!(parse_value("NaN"), None);
    }

    #[test]
    fn cc30_proxy_shifts_pmms_down_50bp() {
        let pmms = TimeSeries::new(
            SERIES_PMMS_30Y,
            LABEL_PMMS,
            Unit::Percent,
            vec![(d(2024, 1, 4), 6.62), (d(2024, 1, 11), 6.66)],
        );
        let proxy = pmms.map_values("CC30_PROXY", LABEL_CC30, |v| v - CC30_PROXY_OFFSET);
        assert_eq!(proxy.label(), LABEL_CC30);
        assert_eq!(proxy.len(), 2);
        assert!((proxy.points()[0].1 - 6.12).abs() < 1e-12);
        assert!((proxy.points()[1].1 - 6.16).abs() < 1e-12);
    }
}
