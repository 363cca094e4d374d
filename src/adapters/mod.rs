// Adapters layer: concrete sinks and storage backends behind the domain ports.

pub mod csv_sink;
pub mod sheets;
pub mod storage;

pub use csv_sink::CsvPublisher;
pub use sheets::{SheetTarget, SheetsPublisher};
pub use storage::LocalStorage;
