pub mod enums;
pub mod error;
pub mod ids;
pub mod record;
pub mod scored;
pub mod table;
pub mod validation;

pub use enums::{
    CanonicalField, DataQuality, DetectionMethod, HabitabilityClass, PriorityTier, SpectralClass,
};
pub use error::{ModelError, Result};
pub use ids::TargetId;
pub use record::CanonicalRecord;
pub use scored::{
    DerivedQuantity, FactorScore, HabitabilityIndices, MeritScore, ObservabilityEstimate,
    ScoreBreakdown, ScoreFactor, ScoredRecord,
};
pub use table::{CellValue, RawRow};
pub use validation::{ValidationError, ValidationErrorKind};
