#![forbid(unsafe_code)]

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(#[from] config::Error),

    #[error("inventory error: {0}")]
    Inventory(#[from] inventory::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("at least two vintages are required, got {0}")]
    NotEnoughVintages(usize),

    #[error("adjustment targets year {0}, which is neither a vintage nor the target year")]
    AdjustmentYear(i32),
}
