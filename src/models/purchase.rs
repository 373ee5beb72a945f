use serde::{Deserialize, Serialize};

/// One line of the purchase log, e.g.
/// `{"user_id": "KB/WRFTC", "product_id": "F5H", "quantity": 12}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseEvent {
    pub user_id: String,
    pub product_id: String,
    pub quantity: u32,
}
