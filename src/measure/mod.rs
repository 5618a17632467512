pub mod record;
pub mod scanner;
pub mod segments;

pub use record::{format_cm, MeasurementRecord, Segment, Side, ViewDirection, NOT_APPLICABLE, NOT_ENOUGH_INFORMATION, UNSET};
pub use scanner::{BoundaryScanner, ScanDirection, ScanOutcome};
pub use segments::{LimbLengths, SegmentMeasurer};
