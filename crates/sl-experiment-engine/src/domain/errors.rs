use thiserror::Error;

/// Failure modes of the experiment engine (C7).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Store(#[from] sl_experiment_store::StoreError),

    /// Starting an experiment requires at least 2 active variants, per
    /// the experiment engine's state machine.
    #[error("experiment {0} has fewer than 2 active variants")]
    InsufficientVariants(u64),

    /// A status change that `ABTestStatus::can_transition_to` rejects.
    #[error("illegal transition for experiment {0}: {1:?} -> {2:?}")]
    IllegalTransition(u64, shared_types::ABTestStatus, shared_types::ABTestStatus),

    /// `select_variant` called with no variants to choose from.
    #[error("experiment {0} has no active variants to select from")]
    NoVariants(u64),

    /// `weighted`/`custom` splits require active variant weights to sum to
    /// exactly 100; per §3, checked once the full variant set is known.
    #[error("experiment {0} has active variant weights summing to {1}, not 100")]
    InvalidWeightSum(u64, u32),
}
