use crate::adapters::http::ReqwestTransport;
use crate::config::AggregatorConfig;
use crate::core::registry::{ServiceDefinition, ServiceRegistry};
use crate::domain::model::{ResponseBody, ServiceOutput, ShareReport};
use crate::domain::ports::Transport;
use crate::utils::error::{Result, SocialworthError};
use crate::utils::validation::validate_url;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

/// Queries share counts for one target URL across the enabled services.
pub struct Aggregator {
    target_url: Option<String>,
    services: BTreeMap<&'static str, bool>,
    transport: Arc<dyn Transport>,
    request_timeout: Option<Duration>,
    concurrent: bool,
}

impl std::fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregator")
            .field("target_url", &self.target_url)
            .field("services", &self.services)
            .field("request_timeout", &self.request_timeout)
            .field("concurrent", &self.concurrent)
            .finish_non_exhaustive()
    }
}

impl Aggregator {
    /// No target URL, default service selection.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        let services = ServiceRegistry::definitions()
            .iter()
            .map(|def| (def.name, def.default_enabled))
            .collect();

        Self {
            target_url: None,
            services,
            transport,
            request_timeout: None,
            concurrent: true,
        }
    }

    pub fn with_default_transport() -> Self {
        Self::new(Arc::new(ReqwestTransport::default()))
    }

    pub fn from_config(config: &AggregatorConfig) -> Result<Self> {
        let transport = ReqwestTransport::from_config(&config.http)?;
        Self::from_config_with_transport(config, Arc::new(transport))
    }

    pub fn from_config_with_transport(
        config: &AggregatorConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        let mut aggregator = Self::new(transport)
            .with_request_timeout(config.http.timeout())
            .with_concurrency(config.aggregation.concurrent);

        if let Some(url) = config.target_url() {
            aggregator.set_target_url(url)?;
        }
        if let Some(services) = config.enabled_services() {
            aggregator = aggregator.with_services(services);
        }

        Ok(aggregator)
    }

    pub fn with_target_url(mut self, url: &str) -> Result<Self> {
        self.set_target_url(url)?;
        Ok(self)
    }

    /// Enables exactly `names`; every other service is disabled.
    pub fn with_services<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        // 明確指定的清單完全取代預設值
        for enabled in self.services.values_mut() {
            *enabled = false;
        }

        for name in names {
            let name = name.as_ref();
            if !self.enable(name) {
                tracing::warn!("Ignoring unknown service in selection: {}", name);
            }
        }

        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn with_concurrency(mut self, concurrent: bool) -> Self {
        self.concurrent = concurrent;
        self
    }

    pub fn set_target_url(&mut self, url: &str) -> Result<&mut Self> {
        validate_url(url)?;
        self.target_url = Some(url.to_string());
        Ok(self)
    }

    pub fn target_url(&self) -> Option<&str> {
        self.target_url.as_deref()
    }

    /// Returns false if `name` is not a known service.
    pub fn enable(&mut self, name: &str) -> bool {
        self.set_enabled(name, true)
    }

    /// Returns false if `name` is not a known service.
    pub fn disable(&mut self, name: &str) -> bool {
        self.set_enabled(name, false)
    }

    fn set_enabled(&mut self, name: &str, enabled: bool) -> bool {
        match ServiceRegistry::lookup(name) {
            Some(def) => {
                self.services.insert(def.name, enabled);
                true
            }
            None => false,
        }
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        ServiceRegistry::lookup(name)
            .and_then(|def| self.services.get(def.name).copied())
            .unwrap_or(false)
    }

    /// Every known service with its current state.
    pub fn services(&self) -> impl Iterator<Item = (&'static str, bool)> + '_ {
        self.services.iter().map(|(name, enabled)| (*name, *enabled))
    }

    pub fn enabled_services(&self) -> Vec<&'static str> {
        self.services()
            .filter(|(_, enabled)| *enabled)
            .map(|(name, _)| name)
            .collect()
    }

    /// Queries one service, optionally against `override_url` instead of the
    /// stored target. The stored target is never modified.
    pub async fn query_one(&self, name: &str, override_url: Option<&str>) -> Result<ServiceOutput> {
        let def = ServiceRegistry::resolve(name)?;

        // 覆寫的 URL 只用於這一次查詢，不會寫回 self
        let target_url = match override_url {
            Some(url) => {
                validate_url(url)?;
                url
            }
            None => self.target_url().ok_or(SocialworthError::MissingTarget)?,
        };

        fetch_service(self.transport.as_ref(), def, target_url, self.request_timeout).await
    }

    pub async fn query_count(&self, name: &str) -> Result<u64> {
        Ok(self.query_one(name, None).await?.count())
    }

    /// Queries every enabled service. A failing service is recorded in
    /// `failures` and contributes nothing to the total.
    pub async fn query_all(&self) -> Result<ShareReport> {
        let definitions: Vec<&'static ServiceDefinition> = self
            .enabled_services()
            .into_iter()
            .filter_map(ServiceRegistry::lookup)
            .collect();

        let mut report = ShareReport::default();
        // 沒有啟用任何服務時不需要目標 URL
        if definitions.is_empty() {
            tracing::debug!("No services enabled, nothing to query");
            return Ok(report);
        }

        let target_url = self
            .target_url
            .clone()
            .ok_or(SocialworthError::MissingTarget)?;

        tracing::debug!(
            "Querying {} services for {} (concurrent: {})",
            definitions.len(),
            target_url,
            self.concurrent
        );

        let results = if self.concurrent {
            self.query_concurrently(&definitions, &target_url).await
        } else {
            self.query_sequentially(&definitions, &target_url).await
        };

        // 單一服務失敗不中斷整體彙總，記錄在 failures
        for (name, result) in results {
            match result {
                Ok(output) => report.record(name, output.count()),
                Err(e) => {
                    tracing::warn!("Service {} failed: {}", name, e);
                    report.record_failure(name, e.to_string());
                }
            }
        }

        tracing::info!(
            "Aggregated {} services for {}: total {} ({} failed)",
            report.counts.len(),
            target_url,
            report.total,
            report.failures.len()
        );

        Ok(report)
    }

    async fn query_sequentially(
        &self,
        definitions: &[&'static ServiceDefinition],
        target_url: &str,
    ) -> Vec<(&'static str, Result<ServiceOutput>)> {
        let mut results = Vec::with_capacity(definitions.len());
        for def in definitions {
            let result =
                fetch_service(self.transport.as_ref(), def, target_url, self.request_timeout).await;
            results.push((def.name, result));
        }
        results
    }

    /// Tasks live in a `JoinSet`; dropping this future aborts every fetch still in flight.
    async fn query_concurrently(
        &self,
        definitions: &[&'static ServiceDefinition],
        target_url: &str,
    ) -> Vec<(&'static str, Result<ServiceOutput>)> {
        let mut tasks = JoinSet::new();

        // 每個服務一個 task，URL 在派送前已經快照
        for def in definitions.iter().copied() {
            let transport = Arc::clone(&self.transport);
            let target_url = target_url.to_string();
            let timeout = self.request_timeout;

            tasks.spawn(async move {
                let result = fetch_service(transport.as_ref(), def, &target_url, timeout).await;
                (def.name, result)
            });
        }

        let mut results = Vec::with_capacity(definitions.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(pair) => results.push(pair),
                // task panic 時拿不到服務名稱，只記錄日誌
                Err(e) => tracing::error!("Query task for {} failed: {}", target_url, e),
            }
        }
        results
    }

    /// One-shot query of `name` for `url` using the default transport.
    pub async fn query_service_for_url(name: &str, url: &str) -> Result<ServiceOutput> {
        Self::query_service_for_url_with(Arc::new(ReqwestTransport::default()), name, url).await
    }

    pub async fn query_service_for_url_with(
        transport: Arc<dyn Transport>,
        name: &str,
        url: &str,
    ) -> Result<ServiceOutput> {
        Self::new(transport)
            .with_target_url(url)?
            .query_one(name, None)
            .await
    }
}

async fn fetch_service(
    transport: &dyn Transport,
    def: &ServiceDefinition,
    target_url: &str,
    timeout: Option<Duration>,
) -> Result<ServiceOutput> {
    let endpoint = def.build_endpoint(target_url);
    // 去掉結尾多餘的 ? 與 &
    let endpoint = endpoint.trim_end_matches(&['?', '&'][..]);

    tracing::debug!("Querying {} at {}", def.name, endpoint);
    let fetch = transport.fetch(endpoint);
    let response = match timeout {
        Some(limit) => tokio::time::timeout(limit, fetch).await.map_err(|_| {
            SocialworthError::transport(endpoint, format!("timed out after {:?}", limit))
        })??,
        None => fetch.await?,
    };

    // 宣告為 JSON 就先解碼，解碼失敗退回原始文字
    let body = ResponseBody::from_fetched(response);
    Ok(def.parse_response(&body))
}
