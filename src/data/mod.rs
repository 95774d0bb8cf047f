//! Shipment data loading and preparation.

mod loader;
mod record;

pub use loader::{DataLoader, DataSummary};
pub use record::{RawShipmentRecord, RecordProcessor, ShipmentRecord};
