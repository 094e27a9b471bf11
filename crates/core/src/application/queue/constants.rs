// Queue constants (no magic values)

/// Default age after which a processing message may be reclaimed (5 minutes)
pub const DEFAULT_RECLAIM_WINDOW_MS: i64 = 5 * 60 * 1000;

/// Default batch size for retrieval when the caller has no preference
pub const DEFAULT_BATCH_SIZE: u32 = 10;
