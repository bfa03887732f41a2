use std::collections::HashMap;

use quarry_core::Error;
use serde::{Deserialize, Serialize};
use url::Url;

/// URL schemes accepted by the Athena connector.
pub const SCHEMES: [&str; 2] = ["athena", "awsathena"];

const PARAM_WORK_GROUP: &str = "work_group";
const PARAM_STAGING_DIR: &str = "s3_staging_dir";
const PARAM_READ_ONLY: &str = "read_only";
const PARAM_MONEYWISE: &str = "moneywise";

// ── DriverConfig ─────────────────────────────────────────────────

/// Settings handed to the Athena connection when it is opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// AWS region queries run in.
    pub region: String,
    /// Athena workgroup; Athena's own default applies when unset.
    pub work_group: Option<String>,
    /// S3 location for query results and metadata.
    pub output_location: Option<String>,
    /// Reject write statements before they reach Athena.
    pub read_only: bool,
    /// Log the estimated cost of every successful query.
    pub moneywise: bool,
    /// Create the workgroup on open if it does not exist yet.
    pub allow_work_group_creation: bool,
}

impl DriverConfig {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            work_group: None,
            output_location: None,
            read_only: true,
            moneywise: true,
            allow_work_group_creation: true,
        }
    }

    /// Parse and validate a connection URL of the form
    /// `athena://<region>[?work_group=..&s3_staging_dir=..&read_only=..&moneywise=..]`.
    ///
    /// At least one of `work_group` and `s3_staging_dir` must be set. A
    /// workgroup taken from the URL is never created remotely. `read_only`
    /// and `moneywise` are only turned off by the literal value `false`.
    pub fn from_url(raw: &str) -> Result<Self, Error> {
        let url = Url::parse(raw)?;

        if !SCHEMES.contains(&url.scheme()) {
            return Err(Error::UnexpectedScheme(url.scheme().to_string()));
        }

        let region = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| Error::MissingRegion(raw.to_string()))?;

        let params = query_params(&url);
        let work_group = params.get(PARAM_WORK_GROUP).cloned();
        let staging_dir = params.get(PARAM_STAGING_DIR).cloned();

        if work_group.is_none() && staging_dir.is_none() {
            return Err(Error::MissingParameter(raw.to_string()));
        }

        let mut config = Self::new(region);
        if let Some(wg) = work_group {
            config.work_group = Some(wg);
            config.allow_work_group_creation = false;
        }
        config.output_location = staging_dir;
        config.read_only = !is_literal_false(params.get(PARAM_READ_ONLY));
        config.moneywise = !is_literal_false(params.get(PARAM_MONEYWISE));

        Ok(config)
    }
}

/// First non-empty value per key, percent-decoded.
fn query_params(url: &Url) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for (k, v) in url.query_pairs() {
        if !params.contains_key(k.as_ref()) {
            params.insert(k.into_owned(), v.into_owned());
        }
    }
    params.retain(|_, v| !v.is_empty());
    params
}

fn is_literal_false(value: Option<&String>) -> bool {
    value.is_some_and(|v| v == "false")
}

// ── Tests ────────────────────────────────────────────────────────
