/// Knowledge item identifiers are opaque strings (UUIDv7 for new items,
/// human-readable slugs such as `product-001` for seeded ones).
pub type ItemId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
