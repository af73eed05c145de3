//! Time resolution
//!
//! Aligned annotations take their times from time slots. Reference
//! annotations inherit the times of the annotation they point at, which may
//! itself be a reference annotation. Resolution walks the reverse reference
//! graph outward from the aligned annotations with a work-list, so chains of
//! any depth resolve in one pass and broken or cyclic chains simply never get
//! reached.

use super::types::{AnnotationKind, RawAnnotation, ResolvedAnnotation, TimeSlot};
use eaf2txt_common::{Error, Result};
use std::collections::{HashMap, VecDeque};
use tracing::{debug, warn};

/// Give every annotation an absolute start and end, preserving input order.
///
/// Fails with [`Error::MalformedInput`] if an aligned annotation points at a
/// missing or unvalued time slot or if its duration does not fit in an
/// `i64`, and with [`Error::UnresolvedReference`] if
/// any reference annotation cannot reach an aligned annotation.
pub fn resolve(
    time_slots: &[TimeSlot],
    annotations: Vec<RawAnnotation>,
) -> Result<Vec<ResolvedAnnotation>> {
    let times = resolve_times(time_slots, &annotations)?;

    Ok(annotations
        .into_iter()
        .zip(times)
        .map(|(annotation, (start, end, duration))| ResolvedAnnotation {
            annotation,
            start,
            end,
            duration,
        })
        .collect())
}

/// `(start, end, duration)` per annotation
type Times = (i64, i64, i64);

fn resolve_times(time_slots: &[TimeSlot], annotations: &[RawAnnotation]) -> Result<Vec<Times>> {
    let mut slots: HashMap<&str, &TimeSlot> = HashMap::with_capacity(time_slots.len());
    for slot in time_slots {
        slots.entry(slot.id.as_str()).or_insert(slot);
    }

    let mut times: Vec<Option<Times>> = vec![None; annotations.len()];
    // Target annotation id -> indices of the annotations referring to it
    let mut dependents: HashMap<&str, Vec<usize>> = HashMap::new();
    let mut work_list = VecDeque::new();

    for (index, annotation) in annotations.iter().enumerate() {
        match &annotation.kind {
            AnnotationKind::Aligned {
                time_slot_ref1,
                time_slot_ref2,
            } => {
                let start = slot_value(&slots, time_slot_ref1, annotation)?;
                let end = slot_value(&slots, time_slot_ref2, annotation)?;
                if end < start {
                    warn!(
                        "Annotation {} on tier {} ends before it starts ({} < {})",
                        annotation.annotation_id, annotation.tier_id, end, start
                    );
                }
                let duration = end.checked_sub(start).ok_or_else(|| {
                    Error::malformed(
                        annotation_context(annotation),
                        format!("duration out of range ({} - {})", end, start),
                    )
                })?;
                times[index] = Some((start, end, duration));
                work_list.push_back(index);
            }
            AnnotationKind::Referenced { annotation_ref } => {
                dependents
                    .entry(annotation_ref.as_str())
                    .or_default()
                    .push(index);
            }
        }
    }

    let aligned = work_list.len();
    while let Some(index) = work_list.pop_front() {
        let Some(resolved) = times[index] else {
            continue;
        };
        let Some(waiting) = dependents.get(annotations[index].annotation_id.as_str()) else {
            continue;
        };
        for &dependent in waiting {
            if times[dependent].is_none() {
                times[dependent] = Some(resolved);
                work_list.push_back(dependent);
            }
        }
    }

    let unresolved: Vec<String> = annotations
        .iter()
        .zip(&times)
        .filter(|(_, time)| time.is_none())
        .map(|(annotation, _)| annotation.annotation_id.clone())
        .collect();
    if !unresolved.is_empty() {
        return Err(Error::UnresolvedReference {
            count: unresolved.len(),
            annotation_ids: unresolved,
        });
    }

    debug!(
        "Resolved {} aligned and {} reference annotations",
        aligned,
        annotations.len() - aligned
    );

    Ok(times.into_iter().flatten().collect())
}

fn slot_value(
    slots: &HashMap<&str, &TimeSlot>,
    slot_id: &str,
    annotation: &RawAnnotation,
) -> Result<i64> {
    let slot = slots.get(slot_id).ok_or_else(|| {
        Error::malformed(
            annotation_context(annotation),
            format!("time slot {} does not exist", slot_id),
        )
    })?;
    slot.value.ok_or_else(|| {
        Error::malformed(
            annotation_context(annotation),
            format!("time slot {} has no TIME_VALUE", slot_id),
        )
    })
}

fn annotation_context(annotation: &RawAnnotation) -> String {
    format!(
        "tier {}, annotation {}",
        annotation.tier_id, annotation.annotation_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(id: &str, value: i64) -> TimeSlot {
        TimeSlot {
            id: id.to_string(),
            value: Some(value),
        }
    }

    fn aligned(id: &str, tier: &str, ts1: &str, ts2: &str) -> RawAnnotation {
        RawAnnotation {
            annotation_id: id.to_string(),
            tier_id: tier.to_string(),
            participant: "P1".to_string(),
            value: id.to_string(),
            kind: AnnotationKind::Aligned {
                time_slot_ref1: ts1.to_string(),
                time_slot_ref2: ts2.to_string(),
            },
        }
    }

    fn reference(id: &str, tier: &str, target: &str) -> RawAnnotation {
        RawAnnotation {
            annotation_id: id.to_string(),
            tier_id: tier.to_string(),
            participant: "P2".to_string(),
            value: id.to_string(),
            kind: AnnotationKind::Referenced {
                annotation_ref: target.to_string(),
            },
        }
    }

    fn ranges(resolved: &[ResolvedAnnotation]) -> Vec<(&str, i64, i64)> {
        resolved
            .iter()
            .map(|r| (r.annotation.annotation_id.as_str(), r.start, r.end))
            .collect()
    }

    #[test]
    fn test_aligned_annotations_use_time_slots() {
        let slots = vec![slot("ts1", 0), slot("ts2", 1000), slot("ts3", 2500)];
        let annotations = vec![aligned("a1", "A1", "ts1", "ts2"), aligned("a2", "A1", "ts2", "ts3")];

        let resolved = resolve(&slots, annotations).unwrap();

        assert_eq!(ranges(&resolved), vec![("a1", 0, 1000), ("a2", 1000, 2500)]);
        assert_eq!(resolved[1].duration, 1500);
    }

    #[test]
    fn test_reference_inherits_target_times() {
        let slots = vec![slot("ts1", 0), slot("ts2", 1000)];
        let annotations = vec![aligned("a1", "A1", "ts1", "ts2"), reference("a2", "A1@P2", "a1")];

        let resolved = resolve(&slots, annotations).unwrap();

        assert_eq!(ranges(&resolved), vec![("a1", 0, 1000), ("a2", 0, 1000)]);
    }

    #[test]
    fn test_chain_depth_does_not_matter() {
        let slots = vec![slot("ts1", 250), slot("ts2", 900)];
        for depth in 1..=25 {
            // Deepest reference first so input order is the reverse of the chain
            let mut annotations: Vec<RawAnnotation> = (1..=depth)
                .rev()
                .map(|i| reference(&format!("r{}", i), "A1@P2", &format!("r{}", i - 1)))
                .collect();
            annotations.push(aligned("r0", "A1", "ts1", "ts2"));

            let resolved = resolve(&slots, annotations).unwrap();

            assert_eq!(resolved.len(), depth + 1);
            assert!(resolved.iter().all(|r| r.start == 250 && r.end == 900));
        }
    }

    #[test]
    fn test_preserves_input_order() {
        let slots = vec![slot("ts1", 0), slot("ts2", 10), slot("ts3", 20)];
        let annotations = vec![
            reference("r1", "B@P", "a2"),
            aligned("a2", "B", "ts2", "ts3"),
            aligned("a1", "A", "ts1", "ts2"),
        ];

        let resolved = resolve(&slots, annotations).unwrap();
        let ids: Vec<&str> = resolved.iter().map(|r| r.annotation.annotation_id.as_str()).collect();

        assert_eq!(ids, vec!["r1", "a2", "a1"]);
    }

    #[test]
    fn test_dangling_reference_is_unresolved() {
        let slots = vec![slot("ts1", 0), slot("ts2", 10)];
        let annotations = vec![aligned("a1", "A1", "ts1", "ts2"), reference("r1", "A1@P2", "missing")];

        match resolve(&slots, annotations) {
            Err(Error::UnresolvedReference {
                count,
                annotation_ids,
            }) => {
                assert_eq!(count, 1);
                assert_eq!(annotation_ids, vec!["r1".to_string()]);
            }
            other => panic!("Expected UnresolvedReference, got {:?}", other),
        }
    }

    #[test]
    fn test_cycle_terminates_as_unresolved() {
        let slots = vec![slot("ts1", 0), slot("ts2", 10)];
        let annotations = vec![
            aligned("a1", "A1", "ts1", "ts2"),
            reference("r1", "A1@P2", "r2"),
            reference("r2", "A1@P2", "r1"),
            reference("r3", "A1@P2", "r2"),
        ];

        match resolve(&slots, annotations) {
            Err(Error::UnresolvedReference {
                count,
                annotation_ids,
            }) => {
                assert_eq!(count, 3);
                assert_eq!(annotation_ids, vec!["r1", "r2", "r3"]);
            }
            other => panic!("Expected UnresolvedReference, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_time_slot_is_malformed() {
        let slots = vec![slot("ts1", 0)];
        let annotations = vec![aligned("a1", "A1", "ts1", "ts9")];

        match resolve(&slots, annotations) {
            Err(Error::MalformedInput { context, message }) => {
                assert_eq!(context, "tier A1, annotation a1");
                assert_eq!(message, "time slot ts9 does not exist");
            }
            other => panic!("Expected MalformedInput, got {:?}", other),
        }
    }

    #[test]
    fn test_unvalued_time_slot_is_malformed_only_when_used() {
        let slots = vec![
            slot("ts1", 0),
            slot("ts2", 10),
            TimeSlot {
                id: "ts3".to_string(),
                value: None,
            },
        ];

        let unused = resolve(&slots, vec![aligned("a1", "A1", "ts1", "ts2")]);
        assert!(unused.is_ok());

        let used = resolve(&slots, vec![aligned("a1", "A1", "ts1", "ts3")]);
        assert!(matches!(
            used,
            Err(Error::MalformedInput { ref message, .. }) if message == "time slot ts3 has no TIME_VALUE"
        ));
    }

    #[test]
    fn test_reference_inherits_duration() {
        let slots = vec![slot("ts1", 400), slot("ts2", 1000)];
        let annotations = vec![reference("r1", "A1@P2", "a1"), aligned("a1", "A1", "ts1", "ts2")];

        let resolved = resolve(&slots, annotations).unwrap();

        assert!(resolved.iter().all(|r| r.duration == 600));
    }

    #[test]
    fn test_negative_duration_is_kept() {
        let slots = vec![slot("ts1", 900), slot("ts2", 300)];

        let resolved = resolve(&slots, vec![aligned("a1", "A1", "ts1", "ts2")]).unwrap();

        assert_eq!(resolved[0].duration, -600);
    }

    #[test]
    fn test_duration_overflow_is_malformed() {
        let slots = vec![slot("ts1", i64::MIN), slot("ts2", i64::MAX)];
        let annotations = vec![aligned("a1", "A1", "ts1", "ts2"), reference("r1", "A1@P2", "a1")];

        match resolve(&slots, annotations) {
            Err(Error::MalformedInput { context, message }) => {
                assert_eq!(context, "tier A1, annotation a1");
                assert!(message.starts_with("duration out of range"), "{}", message);
            }
            other => panic!("Expected MalformedInput, got {:?}", other),
        }

        let reversed = resolve(&slots, vec![aligned("a2", "A1", "ts2", "ts1")]);
        assert!(matches!(reversed, Err(Error::MalformedInput { .. })));
    }

    #[test]
    fn test_empty_input() {
        assert!(resolve(&[], Vec::new()).unwrap().is_empty());
    }
}
