//! EAF conversion core: parse, resolve times, project, summarize

pub mod parser;
pub mod projector;
pub mod resolver;
pub mod summary;
pub mod types;

pub use parser::parse_eaf;
pub use projector::{project, RowOrder};
pub use resolver::resolve;
pub use summary::{summarize, ParticipantSummary, Summary, NON_SPEECH_MARKER};
pub use types::{AnnotationKind, ParsedEaf, RawAnnotation, ResolvedAnnotation, TimeSlot};
