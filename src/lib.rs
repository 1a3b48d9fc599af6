pub mod context;
pub mod error;
pub mod groups;
pub mod node;
pub mod session;
pub mod sort;
pub mod transform;
pub mod visit;

pub use context::{ContextCache, FrameworkAdapter, NullAdapter, RuleContext};
pub use error::{Result, SortError};
pub use groups::GroupTable;
pub use session::{FormatOptions, FormatSession, SourceParser};
pub use sort::{sort_classes, sort_classes_with, SortHints};
