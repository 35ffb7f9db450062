use crate::errors::{ConfigurationError, FinetuneError, FinetuneResult};
use crate::resilience::RetryPolicy;
use secrecy::{ExposeSecret, Secret};
use std::fmt;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_AZURE_API_VERSION: &str = "2024-10-21";
pub const DEFAULT_MANAGEMENT_URL: &str = "https://management.azure.com";
pub const DEFAULT_MANAGEMENT_API_VERSION: &str = "2023-05-01";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 5_000;

/// Which dialect of the API the data plane speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiFlavor {
    /// `Authorization: Bearer`, models addressed in the request body.
    OpenAI,
    /// `api-key` header, `api-version` query, chat routed by deployment name.
    Azure,
}

#[derive(Clone)]
pub struct FinetuneConfig {
    pub api_key: Secret<String>,
    pub base_url: Url,
    pub flavor: ApiFlavor,
    pub api_version: Option<String>,
    pub organization_id: Option<String>,
    pub timeout: Duration,
    pub retry: RetryPolicy,
    pub proxy: Option<Url>,
    pub user_agent: String,
}

impl fmt::Debug for FinetuneConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FinetuneConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url.as_str())
            .field("flavor", &self.flavor)
            .field("api_version", &self.api_version)
            .field("organization_id", &self.organization_id)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .field("proxy", &self.proxy.as_ref().map(Url::as_str))
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl FinetuneConfig {
    /// OpenAI flavored configuration against the public endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            base_url: default_base_url(),
            flavor: ApiFlavor::OpenAI,
            api_version: None,
            organization_id: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: default_retry(),
            proxy: None,
            user_agent: default_user_agent(),
        }
    }

    /// Azure OpenAI configuration. `endpoint` is the resource root, e.g.
    /// `https://my-resource.openai.azure.com`; requests go to `{endpoint}/openai`.
    pub fn azure(endpoint: &str, api_key: impl Into<String>) -> FinetuneResult<Self> {
        let base = format!("{}/openai", endpoint.trim_end_matches('/'));
        let base_url = Url::parse(&base).map_err(|e| {
            FinetuneError::Configuration(ConfigurationError::InvalidBaseUrl(format!(
                "Invalid Azure endpoint '{}': {}",
                endpoint, e
            )))
        })?;

        Ok(Self {
            base_url,
            flavor: ApiFlavor::Azure,
            api_version: Some(DEFAULT_AZURE_API_VERSION.to_string()),
            ..Self::new(api_key)
        })
    }

    /// Reads configuration from the environment.
    ///
    /// Azure is selected when `AZURE_OPENAI_ENDPOINT` and `AZURE_OPENAI_API_KEY`
    /// are both set (`AZURE_OPENAI_API_VERSION` optional). Otherwise
    /// `OPENAI_API_KEY` is required, with optional `OPENAI_BASE_URL` and
    /// `OPENAI_ORGANIZATION_ID`. `FINETUNE_MAX_ATTEMPTS`,
    /// `FINETUNE_RETRY_DELAY_MS` and `FINETUNE_TIMEOUT_SECS` tune either flavor.
    pub fn from_env() -> FinetuneResult<Self> {
        let mut config = match (
            std::env::var("AZURE_OPENAI_ENDPOINT"),
            std::env::var("AZURE_OPENAI_API_KEY"),
        ) {
            (Ok(endpoint), Ok(key)) => {
                let mut config = Self::azure(&endpoint, key)?;
                if let Ok(version) = std::env::var("AZURE_OPENAI_API_VERSION") {
                    config.api_version = Some(version);
                }
                config
            }
            _ => {
                let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
                    FinetuneError::Configuration(ConfigurationError::MissingApiKey(
                        "set OPENAI_API_KEY, or AZURE_OPENAI_ENDPOINT and AZURE_OPENAI_API_KEY"
                            .to_string(),
                    ))
                })?;
                let mut config = Self::new(api_key);
                if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
                    config.base_url = Url::parse(&base_url).map_err(|e| {
                        FinetuneError::Configuration(ConfigurationError::InvalidBaseUrl(format!(
                            "Invalid OPENAI_BASE_URL: {}",
                            e
                        )))
                    })?;
                }
                if let Ok(org_id) = std::env::var("OPENAI_ORGANIZATION_ID") {
                    config.organization_id = Some(org_id);
                }
                config
            }
        };

        if let Some(attempts) = env_number::<u32>("FINETUNE_MAX_ATTEMPTS")? {
            config.retry.max_attempts = attempts;
        }
        if let Some(delay_ms) = env_number::<u64>("FINETUNE_RETRY_DELAY_MS")? {
            config.retry = RetryPolicy::fixed(config.retry.max_attempts, Duration::from_millis(delay_ms));
        }
        if let Some(secs) = env_number::<u64>("FINETUNE_TIMEOUT_SECS")? {
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn validate(&self) -> FinetuneResult<()> {
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(FinetuneError::Configuration(ConfigurationError::MissingApiKey(
                "API key is empty".to_string(),
            )));
        }

        if self.timeout.is_zero() {
            return Err(FinetuneError::Configuration(ConfigurationError::InvalidTimeout(
                "Timeout must be greater than 0".to_string(),
            )));
        }

        if self.retry.max_attempts == 0 {
            return Err(FinetuneError::Configuration(
                ConfigurationError::InvalidRetryConfig(
                    "max_attempts must be at least 1".to_string(),
                ),
            ));
        }

        if self.flavor == ApiFlavor::Azure && self.api_version.is_none() {
            return Err(FinetuneError::Configuration(
                ConfigurationError::MissingConfiguration(
                    "Azure requires an api-version".to_string(),
                ),
            ));
        }

        Ok(())
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = Some(api_version.into());
        self
    }

    pub fn with_organization_id(mut self, org_id: impl Into<String>) -> Self {
        self.organization_id = Some(org_id.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_proxy(mut self, proxy: Url) -> Self {
        self.proxy = Some(proxy);
        self
    }

    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Azure Resource Manager settings for deployment calls.
#[derive(Clone)]
pub struct ManagementConfig {
    pub token: Secret<String>,
    pub endpoint: Url,
    pub api_version: String,
    pub subscription_id: String,
    pub resource_group: String,
    pub account_name: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl fmt::Debug for ManagementConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagementConfig")
            .field("token", &"[REDACTED]")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_version", &self.api_version)
            .field("subscription_id", &self.subscription_id)
            .field("resource_group", &self.resource_group)
            .field("account_name", &self.account_name)
            .finish()
    }
}

impl ManagementConfig {
    pub fn new(
        token: impl Into<String>,
        subscription_id: impl Into<String>,
        resource_group: impl Into<String>,
        account_name: impl Into<String>,
    ) -> Self {
        Self {
            token: Secret::new(token.into()),
            endpoint: default_management_url(),
            api_version: DEFAULT_MANAGEMENT_API_VERSION.to_string(),
            subscription_id: subscription_id.into(),
            resource_group: resource_group.into(),
            account_name: account_name.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: default_retry(),
        }
    }

    /// Reads `AZURE_MANAGEMENT_TOKEN`, `AZURE_SUBSCRIPTION_ID`,
    /// `AZURE_RESOURCE_GROUP` and `AZURE_OPENAI_ACCOUNT`.
    pub fn from_env() -> FinetuneResult<Self> {
        let token = required_env("AZURE_MANAGEMENT_TOKEN")?;
        let subscription_id = required_env("AZURE_SUBSCRIPTION_ID")?;
        let resource_group = required_env("AZURE_RESOURCE_GROUP")?;
        let account_name = required_env("AZURE_OPENAI_ACCOUNT")?;

        let mut config = Self::new(token, subscription_id, resource_group, account_name);
        if let Ok(endpoint) = std::env::var("AZURE_MANAGEMENT_ENDPOINT") {
            config.endpoint = Url::parse(&endpoint)?;
        }
        Ok(config)
    }

    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = endpoint;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Path of the Cognitive Services account, relative to the endpoint.
    pub fn account_path(&self) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.CognitiveServices/accounts/{}",
            self.subscription_id, self.resource_group, self.account_name
        )
    }

    pub fn validate(&self) -> FinetuneResult<()> {
        if self.token.expose_secret().trim().is_empty() {
            return Err(FinetuneError::Configuration(ConfigurationError::MissingApiKey(
                "management token is empty".to_string(),
            )));
        }
        for (name, value) in [
            ("subscription_id", &self.subscription_id),
            ("resource_group", &self.resource_group),
            ("account_name", &self.account_name),
        ] {
            if value.trim().is_empty() {
                return Err(FinetuneError::Configuration(
                    ConfigurationError::MissingConfiguration(name.to_string()),
                ));
            }
        }
        Ok(())
    }
}

fn required_env(name: &str) -> FinetuneResult<String> {
    std::env::var(name).map_err(|_| {
        FinetuneError::Configuration(ConfigurationError::MissingConfiguration(format!(
            "{} environment variable not found",
            name
        )))
    })
}

fn env_number<T: std::str::FromStr>(name: &str) -> FinetuneResult<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().map(Some).map_err(|_| {
            FinetuneError::Configuration(ConfigurationError::InvalidRetryConfig(format!(
                "{} must be a number, got '{}'",
                name, raw
            )))
        }),
        Err(_) => Ok(None),
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).unwrap_or_else(|_| unreachable!("constant URL parses"))
}

fn default_management_url() -> Url {
    Url::parse(DEFAULT_MANAGEMENT_URL).unwrap_or_else(|_| unreachable!("constant URL parses"))
}

fn default_retry() -> RetryPolicy {
    RetryPolicy::fixed(
        DEFAULT_MAX_ATTEMPTS,
        Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
    )
}

fn default_user_agent() -> String {
    format!("integrations-finetune/{}", env!("CARGO_PKG_VERSION"))
}
