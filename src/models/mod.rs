pub mod purchase;
pub mod visit;

pub use purchase::PurchaseEvent;
pub use visit::VisitEvent;
