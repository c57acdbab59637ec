//! # Issuance pipeline orchestration (C9)

use std::sync::Arc;

use chrono::Utc;
use shared_types::ShortLink;
use sl_codec::{OsRngSuffixSource, ShortCodeEncoder, TransformConfig};
use sl_issuer::IdIssuer;
use sl_link_store::{DomainStore, ShortLinkStore};
use sl_resolver_cache::{ResolverCache, DEFAULT_TTL};

use crate::domain::{BatchCreateResult, BatchFailure, CreateLinkRequest, IssuanceError, MAX_BATCH_SIZE};

pub struct IssuancePipeline {
    issuer: Arc<dyn IdIssuer>,
    link_store: Arc<dyn ShortLinkStore>,
    domain_store: Arc<dyn DomainStore>,
    cache: Arc<dyn ResolverCache>,
    encoder: ShortCodeEncoder<OsRngSuffixSource>,
}

impl IssuancePipeline {
    pub fn new(
        issuer: Arc<dyn IdIssuer>,
        link_store: Arc<dyn ShortLinkStore>,
        domain_store: Arc<dyn DomainStore>,
        cache: Arc<dyn ResolverCache>,
    ) -> Self {
        Self {
            issuer,
            link_store,
            domain_store,
            cache,
            encoder: ShortCodeEncoder::new(),
        }
    }

    pub fn create(&self, request: CreateLinkRequest) -> Result<ShortLink, IssuanceError> {
        url::Url::parse(&request.original_url)
            .map_err(|_| IssuanceError::BadRequest("original_url is not an absolute URL".to_string()))?;

        if request.host.is_empty() {
            return Err(IssuanceError::BadRequest("host must not be empty".to_string()));
        }

        let now = Utc::now();
        if let Some(expire_at) = request.expire_at {
            if expire_at <= now {
                return Err(IssuanceError::BadRequest(
                    "expire_at must be in the future".to_string(),
                ));
            }
        }

        let domain = self
            .domain_store
            .find_by_host(&request.host)?
            .filter(|d| d.is_active && !d.is_deleted())
            .ok_or_else(|| IssuanceError::BadRequest(format!("{} is not an active domain", request.host)))?;

        let (short_code, issuer_number, is_custom_code) = match &request.custom_code {
            Some(code) => {
                if self.link_store.exists_by_domain_and_code(domain.id, code)? {
                    return Err(IssuanceError::Conflict(format!(
                        "short code {code} already exists for {}",
                        request.host
                    )));
                }
                (code.clone(), None, true)
            }
            None => {
                let n = self.issuer.next(domain.id)?;
                let config = TransformConfig {
                    random_suffix_length: domain.random_suffix_length,
                    enable_checksum: domain.enable_checksum,
                    enable_xor_obfuscation: domain.enable_xor_obfuscation,
                    xor_secret: domain.xor_secret,
                    xor_rot: domain.xor_rot,
                };
                (self.encoder.encode(n, &config), Some(n), false)
            }
        };

        let link = ShortLink {
            id: 0,
            issuer_number,
            domain_id: domain.id,
            host: request.host.clone(),
            protocol: domain.protocol,
            original_url: request.original_url,
            short_code,
            is_custom_code,
            title: request.title.unwrap_or_default(),
            description: request.description.unwrap_or_default(),
            creator_ip: request.creator_ip,
            click_count: 0,
            expire_at: request.expire_at,
            is_active: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        let created = self.link_store.create(link)?;
        let _ = self.cache.set(&created.host, &created.short_code, &created, DEFAULT_TTL);
        Ok(created)
    }

    /// Runs `create` for each URL, collecting successes and per-URL
    /// failures. Never fails the whole batch; truncates silently to
    /// `MAX_BATCH_SIZE` entries if given more.
    pub fn batch_create(
        &self,
        urls: Vec<String>,
        host: &str,
        creator_ip: &str,
    ) -> BatchCreateResult {
        let mut result = BatchCreateResult::default();
        for original_url in urls.into_iter().take(MAX_BATCH_SIZE) {
            let request = CreateLinkRequest {
                original_url: original_url.clone(),
                host: host.to_string(),
                custom_code: None,
                title: None,
                description: None,
                expire_at: None,
                creator_ip: creator_ip.to_string(),
            };
            match self.create(request) {
                Ok(link) => result.successes.push(link),
                Err(err) => result.failures.push(BatchFailure {
                    original_url,
                    error: err.to_string(),
                }),
            }
        }
        result
    }
}
