use std::sync::LazyLock;

pub mod version;

pub static STARTUP_TIME: LazyLock<std::time::SystemTime> =
    LazyLock::new(std::time::SystemTime::now);

/// Volume directory mounted in container deployments. When present, the
/// default database file lives inside it.
pub static DATA_VOLUME_DIR: &str = "/app/data";
pub static DATA_VOLUME_DATABASE_URL: &str = "sqlite:///app/data/quotes.db";
pub static LOCAL_DATABASE_URL: &str = "sqlite:quotes.db";
