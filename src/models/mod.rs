pub mod activity;
pub mod dataset;
pub mod recovery;

pub use activity::ActivityRecord;
pub use dataset::TrainingDataset;
pub use recovery::RecoveryRecord;
