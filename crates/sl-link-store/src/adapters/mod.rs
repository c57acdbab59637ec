pub mod click_statistic_store;
pub mod domain_store;
pub mod short_link_store;

pub use click_statistic_store::KvClickStatisticStore;
pub use domain_store::KvDomainStore;
pub use short_link_store::KvShortLinkStore;
