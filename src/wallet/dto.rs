use serde::{Deserialize, Serialize};

/// Request body for saving a wallet address.
#[derive(Debug, Deserialize)]
pub struct SaveWalletRequest {
    pub wallet: String,
}

#[derive(Debug, Serialize)]
pub struct WalletResponse {
    pub wallet: String,
}
