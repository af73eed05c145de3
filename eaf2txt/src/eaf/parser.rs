//! Streaming EAF parser
//!
//! Reads the document with `quick_xml` events and an explicit element stack,
//! extracting only what conversion needs:
//!
//! ```text
//! ANNOTATION_DOCUMENT
//! ├── TIME_ORDER
//! │   └── TIME_SLOT            TIME_SLOT_ID, TIME_VALUE?
//! └── TIER                     TIER_ID, PARTICIPANT
//!     └── ANNOTATION
//!         ├── ALIGNABLE_ANNOTATION   ANNOTATION_ID, TIME_SLOT_REF1, TIME_SLOT_REF2
//!         │   └── ANNOTATION_VALUE
//!         └── REF_ANNOTATION         ANNOTATION_ID, ANNOTATION_REF
//!             └── ANNOTATION_VALUE
//! ```
//!
//! Everything else (header, linguistic types, controlled vocabularies) is skipped.

use super::types::{AnnotationKind, ParsedEaf, RawAnnotation, TimeSlot};
use eaf2txt_common::{Error, Result};
use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

const TIME_ORDER: &str = "TIME_ORDER";
const TIME_SLOT: &str = "TIME_SLOT";
const TIER: &str = "TIER";
const ANNOTATION: &str = "ANNOTATION";
const ALIGNABLE_ANNOTATION: &str = "ALIGNABLE_ANNOTATION";
const REF_ANNOTATION: &str = "REF_ANNOTATION";
const ANNOTATION_VALUE: &str = "ANNOTATION_VALUE";

/// Tier attributes copied onto each of its annotations
#[derive(Debug)]
struct TierContext {
    tier_id: String,
    participant: String,
}

/// The `ANNOTATION` element currently being read
#[derive(Debug, Default)]
struct OpenAnnotation {
    /// Id and kind of the first recognized child
    child: Option<(String, AnnotationKind)>,
    /// True while inside that child
    in_child: bool,
    value: Option<String>,
}

#[derive(Debug, Default)]
struct EafParser {
    /// Names of the currently open elements, root first
    stack: Vec<String>,
    time_order_seen: bool,
    time_slots: Vec<TimeSlot>,
    annotations: Vec<RawAnnotation>,
    tier: Option<TierContext>,
    annotation: Option<OpenAnnotation>,
    /// Text collected inside `ANNOTATION_VALUE`
    value_buf: Option<String>,
}

/// Parse an EAF document held in memory
pub fn parse_eaf(xml: &str) -> Result<ParsedEaf> {
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut parser = EafParser::default();

    loop {
        let position = reader.buffer_position() as u64;
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = element_name(&e);
                parser.open(&name, &e, reader.decoder(), position)?;
                parser.stack.push(name);
            }
            Ok(Event::Empty(e)) => {
                let name = element_name(&e);
                parser.open(&name, &e, reader.decoder(), position)?;
                parser.close(&name, position)?;
            }
            Ok(Event::End(_)) => {
                if let Some(name) = parser.stack.pop() {
                    parser.close(&name, position)?;
                }
            }
            Ok(Event::Text(text)) => {
                if let Some(buf) = parser.value_buf.as_mut() {
                    let text = text
                        .unescape()
                        .map_err(|e| xml_error(reader.buffer_position() as u64, e))?;
                    buf.push_str(&text);
                }
            }
            Ok(Event::CData(data)) => {
                if let Some(buf) = parser.value_buf.as_mut() {
                    buf.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(xml_error(reader.error_position() as u64, e)),
        }
    }

    parser.finish(reader.buffer_position() as u64)
}

impl EafParser {
    /// Handle an opening (or self-closing) tag. `self.stack` holds its ancestors.
    fn open(
        &mut self,
        name: &str,
        e: &BytesStart,
        decoder: Decoder,
        position: u64,
    ) -> Result<()> {
        let depth = self.stack.len();
        let parent = self.stack.last().map(String::as_str);

        match (depth, parent, name) {
            (1, _, TIME_ORDER) => self.time_order_seen = true,
            (2, Some(TIME_ORDER), TIME_SLOT) => {
                let context = format!("<{}> at byte {}", TIME_SLOT, position);
                let id = required_attr(e, decoder, "TIME_SLOT_ID", &context)?;
                let value = match attr(e, decoder, "TIME_VALUE", &context)? {
                    Some(raw) => Some(raw.trim().parse::<i64>().map_err(|_| {
                        Error::malformed(
                            format!("time slot {}", id),
                            format!("TIME_VALUE '{}' is not an integer", raw),
                        )
                    })?),
                    None => None,
                };
                self.time_slots.push(TimeSlot { id, value });
            }
            (1, _, TIER) => {
                let context = format!("<{}> at byte {}", TIER, position);
                let tier_id = required_attr(e, decoder, "TIER_ID", &context)?;
                let context = format!("tier {}", tier_id);
                let participant = required_attr(e, decoder, "PARTICIPANT", &context)?;
                self.tier = Some(TierContext {
                    tier_id,
                    participant,
                });
            }
            (2, Some(TIER), ANNOTATION) => {
                self.annotation = Some(OpenAnnotation::default());
            }
            (3, Some(ANNOTATION), ALIGNABLE_ANNOTATION | REF_ANNOTATION) => {
                let context = self.context(name, position);
                let Some(annotation) = self.annotation.as_mut() else {
                    return Ok(());
                };
                if annotation.child.is_some() {
                    debug!("Ignoring extra <{}> ({})", name, context);
                    return Ok(());
                }

                let annotation_id = required_attr(e, decoder, "ANNOTATION_ID", &context)?;
                let context = format!("{}, annotation {}", context, annotation_id);
                let kind = if name == ALIGNABLE_ANNOTATION {
                    AnnotationKind::Aligned {
                        time_slot_ref1: required_attr(e, decoder, "TIME_SLOT_REF1", &context)?,
                        time_slot_ref2: required_attr(e, decoder, "TIME_SLOT_REF2", &context)?,
                    }
                } else {
                    AnnotationKind::Referenced {
                        annotation_ref: required_attr(e, decoder, "ANNOTATION_REF", &context)?,
                    }
                };
                annotation.child = Some((annotation_id, kind));
                annotation.in_child = true;
            }
            (4, _, ANNOTATION_VALUE) => {
                if self.annotation.as_ref().is_some_and(|a| a.in_child) {
                    self.value_buf = Some(String::new());
                }
            }
            _ => {}
        }

        Ok(())
    }

    /// Handle a closing tag. `self.stack` no longer holds the element itself.
    fn close(&mut self, name: &str, position: u64) -> Result<()> {
        let depth = self.stack.len();

        match (depth, name) {
            (4, ANNOTATION_VALUE) => {
                if let Some(text) = self.value_buf.take() {
                    if let Some(annotation) = self.annotation.as_mut() {
                        annotation.value = Some(text);
                    }
                }
            }
            (3, ALIGNABLE_ANNOTATION | REF_ANNOTATION) => {
                if let Some(annotation) = self.annotation.as_mut() {
                    annotation.in_child = false;
                }
            }
            (2, ANNOTATION) => {
                if let Some(open) = self.annotation.take() {
                    let annotation = self.finish_annotation(open, position)?;
                    self.annotations.push(annotation);
                }
            }
            (1, TIER) => self.tier = None,
            _ => {}
        }

        Ok(())
    }

    fn finish_annotation(&self, open: OpenAnnotation, position: u64) -> Result<RawAnnotation> {
        let context = self.context(ANNOTATION, position);
        let tier = self
            .tier
            .as_ref()
            .ok_or_else(|| Error::malformed(&context, "annotation outside of a tier"))?;

        let (annotation_id, kind) = open.child.ok_or_else(|| {
            Error::malformed(
                &context,
                format!(
                    "<{}> contains neither <{}> nor <{}>",
                    ANNOTATION, ALIGNABLE_ANNOTATION, REF_ANNOTATION
                ),
            )
        })?;

        let value = open.value.ok_or_else(|| {
            Error::malformed(
                format!("{}, annotation {}", context, annotation_id),
                format!("missing <{}>", ANNOTATION_VALUE),
            )
        })?;

        Ok(RawAnnotation {
            annotation_id,
            tier_id: tier.tier_id.clone(),
            participant: tier.participant.clone(),
            value,
            kind,
        })
    }

    fn finish(self, position: u64) -> Result<ParsedEaf> {
        if let Some(open) = self.stack.last() {
            return Err(Error::malformed(
                format!("<{}> at byte {}", open, position),
                "unexpected end of document",
            ));
        }
        if !self.time_order_seen {
            return Err(Error::malformed(
                "document root",
                format!("missing <{}>", TIME_ORDER),
            ));
        }

        debug!(
            "Parsed {} time slots and {} annotations",
            self.time_slots.len(),
            self.annotations.len()
        );

        Ok(ParsedEaf {
            time_slots: self.time_slots,
            annotations: self.annotations,
        })
    }

    /// Human-readable location used in error messages
    fn context(&self, element: &str, position: u64) -> String {
        match &self.tier {
            Some(tier) => format!("tier {}, <{}> at byte {}", tier.tier_id, element, position),
            None => format!("<{}> at byte {}", element, position),
        }
    }
}

fn element_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn attr(e: &BytesStart, decoder: Decoder, key: &str, context: &str) -> Result<Option<String>> {
    for attr_res in e.attributes() {
        let attr = attr_res.map_err(|err| Error::malformed(context, err.to_string()))?;
        if attr.key.as_ref() == key.as_bytes() {
            let value = attr
                .decode_and_unescape_value(decoder)
                .map_err(|err| Error::malformed(context, err.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn required_attr(e: &BytesStart, decoder: Decoder, key: &str, context: &str) -> Result<String> {
    attr(e, decoder, key, context)?
        .ok_or_else(|| Error::malformed(context, format!("missing required attribute {}", key)))
}

fn xml_error(position: u64, err: impl std::fmt::Display) -> Error {
    Error::malformed(format!("byte {}", position), format!("invalid XML: {}", err))
}
