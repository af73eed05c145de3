//! EAF document model: time slots and annotations before and after time resolution

/// A named anchor point on the media timeline.
///
/// `value` is `None` when the slot has no `TIME_VALUE` (an unaligned slot).
/// That is only an error if an annotation needs the slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSlot {
    pub id: String,
    pub value: Option<i64>,
}

/// Where an annotation gets its timing from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationKind {
    /// `ALIGNABLE_ANNOTATION`: start and end time slots
    Aligned {
        time_slot_ref1: String,
        time_slot_ref2: String,
    },
    /// `REF_ANNOTATION`: inherits the timing of another annotation
    Referenced { annotation_ref: String },
}

/// An annotation as read from the document, tier context attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAnnotation {
    pub annotation_id: String,
    pub tier_id: String,
    pub participant: String,
    pub value: String,
    pub kind: AnnotationKind,
}

/// An annotation with its absolute time range, in milliseconds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAnnotation {
    pub annotation: RawAnnotation,
    pub start: i64,
    pub end: i64,
    /// `end - start`, checked for overflow during resolution
    pub duration: i64,
}

/// Everything the converter needs from one EAF document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedEaf {
    pub time_slots: Vec<TimeSlot>,
    pub annotations: Vec<RawAnnotation>,
}
