mod direction;
mod ids;
mod item;
mod judgment;
mod progress;

pub use direction::{Direction, DirectionError};
pub use ids::WordId;
pub use item::VocabItem;
pub use judgment::{Confidence, ConfidenceError, Judgment};
pub use progress::{Bucket, BucketError, ProgressRecord};
