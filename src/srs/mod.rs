pub mod buckets;
pub mod leitner;
pub mod scheduler;

pub use buckets::{get_bucket_range, to_bucket_sets};
pub use leitner::{update, update_from_label};
pub use scheduler::{is_bucket_due, practice};
