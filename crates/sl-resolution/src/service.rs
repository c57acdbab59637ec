//! # Resolution pipeline orchestration (C8)
//!
//! The synchronous lookup and redirect steps run in the caller's request
//! context; click recording is handed off to a bounded background worker
//! with `try_send` so a saturated click queue never adds latency to the
//! redirect response. Lost clicks under load are an accepted tradeoff.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use shared_types::{click_limits, truncate_chars, ClickStatistic};
use sl_experiment_engine::VariantSelection;
use sl_link_store::{ClickStatisticStore, DomainStore, ShortLinkStore};
use sl_resolver_cache::{ResolverCache, DEFAULT_TTL};
use tokio::sync::mpsc;

use crate::domain::{merge_query, ResolutionError, ResolutionRequest};
use crate::ports::ExperimentSelector;

struct ClickJob {
    short_link_id: u64,
    ip: String,
    user_agent: String,
    referer: String,
    query_params: String,
    click_at: DateTime<Utc>,
    variant: Option<VariantSelection>,
}

/// Queue depth for the background click worker. Beyond this, `try_send`
/// drops the click rather than block the request path.
const CLICK_QUEUE_CAPACITY: usize = 4096;

pub struct ResolutionPipeline {
    cache: Arc<dyn ResolverCache>,
    link_store: Arc<dyn ShortLinkStore>,
    domain_store: Arc<dyn DomainStore>,
    click_store: Arc<dyn ClickStatisticStore>,
    experiments: Arc<dyn ExperimentSelector>,
    click_tx: mpsc::Sender<ClickJob>,
}

impl ResolutionPipeline {
    pub fn new(
        cache: Arc<dyn ResolverCache>,
        link_store: Arc<dyn ShortLinkStore>,
        domain_store: Arc<dyn DomainStore>,
        click_store: Arc<dyn ClickStatisticStore>,
        experiments: Arc<dyn ExperimentSelector>,
    ) -> Self {
        let (click_tx, mut click_rx) = mpsc::channel::<ClickJob>(CLICK_QUEUE_CAPACITY);

        let worker_link_store = link_store.clone();
        let worker_click_store = click_store.clone();
        let worker_experiments = experiments.clone();
        tokio::spawn(async move {
            while let Some(job) = click_rx.recv().await {
                if let Err(err) = worker_link_store.increment_click_count(job.short_link_id) {
                    tracing::warn!(error = %err, short_link_id = job.short_link_id, "click_count increment failed");
                }
                let attribution_result = match &job.variant {
                    Some(selection) => worker_experiments
                        .record_click(
                            selection,
                            job.short_link_id,
                            job.ip,
                            job.user_agent,
                            job.referer,
                            job.query_params,
                            job.click_at,
                        )
                        .map_err(|e| e.to_string()),
                    None => worker_click_store
                        .record(ClickStatistic {
                            id: 0,
                            short_link_id: job.short_link_id,
                            ip: job.ip,
                            user_agent: job.user_agent,
                            referer: job.referer,
                            query_params: job.query_params,
                            click_at: job.click_at,
                        })
                        .map_err(|e| e.to_string()),
                };
                if let Err(err) = attribution_result {
                    tracing::warn!(error = %err, "click attribution failed");
                }
            }
        });

        Self {
            cache,
            link_store,
            domain_store,
            click_store,
            experiments,
            click_tx,
        }
    }

    pub fn resolve(&self, request: ResolutionRequest, now: DateTime<Utc>) -> Result<String, ResolutionError> {
        let domain = self
            .domain_store
            .find_by_host(&request.host)?
            .filter(|d| !d.is_deleted())
            .ok_or(ResolutionError::NotFound)?;

        let cached = self.cache.get(&request.host, &request.short_code).ok().flatten();
        let link = match cached {
            Some(link) => link,
            None => {
                let link = self
                    .link_store
                    .find_by_domain_and_code(domain.id, &request.short_code)?
                    .filter(|l| !l.is_deleted())
                    .ok_or(ResolutionError::NotFound)?;
                let _ = self
                    .cache
                    .set(&request.host, &request.short_code, &link, DEFAULT_TTL);
                link
            }
        };

        if !link.is_active {
            return Err(ResolutionError::Disabled);
        }
        if link.is_expired(now) {
            return Err(ResolutionError::Expired);
        }

        let is_preview = request.client_ip.is_none();
        let variant = if let Some(ip) = request.client_ip.as_deref().filter(|ip| !ip.is_empty()) {
            // A misconfigured or unreachable experiment must never block the
            // redirect: degrade to the original URL on any selection error.
            self.experiments
                .select_for_short_link(link.id, ip, &request.user_agent, now)
                .unwrap_or_else(|err| {
                    tracing::warn!(error = %err, short_link_id = link.id, "experiment selection failed, falling back to original_url");
                    None
                })
        } else {
            None
        };

        let mut destination = match &variant {
            Some(selection) => selection.variant.target_url.clone(),
            None => link.original_url.clone(),
        };

        if domain.pass_query_params && !request.raw_query_string.is_empty() {
            destination = merge_query(&destination, &request.raw_query_string);
        }

        if !is_preview {
            let job = ClickJob {
                short_link_id: link.id,
                ip: truncate_chars(request.client_ip.as_deref().unwrap_or(""), click_limits::IP),
                user_agent: truncate_chars(&request.user_agent, click_limits::USER_AGENT),
                referer: truncate_chars(&request.referer, click_limits::REFERER),
                query_params: truncate_chars(&request.raw_query_string, click_limits::QUERY_PARAMS),
                click_at: now,
                variant,
            };
            // Best-effort: a full queue drops the click rather than stall the redirect.
            let _ = self.click_tx.try_send(job);
        }

        Ok(destination)
    }
}
