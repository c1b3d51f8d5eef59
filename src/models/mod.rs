pub mod comment;
pub mod identity;
pub mod row;
pub mod stage;

pub use comment::CommentEntry;
pub use identity::{LayoutConvention, ObservationIdentity, Target, DATE_FORMAT};
pub use row::{FrameKeys, MasterframeRow, Row, StatusRow};
pub use stage::{ConfigFlags, ObservationStatus, ProcedureStageList, Progress};
