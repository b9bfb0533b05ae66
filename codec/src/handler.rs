//! The runtime decoder and validator.

use std::sync::Arc;

use packer::{Sanitize, Unpacker};
use schema::{FieldSpec, Kind, Scalar, TypeId};

use crate::error::DecodeFailure;
use crate::frame::read_frame_id;
use crate::layout::{sanitize_for, CompiledLayout};
use crate::limits::HandlerLimits;
use crate::protocol::Protocol;
use crate::record::{Decoded, Record};
use crate::scratch::Scratch;
use crate::types::{EXTENDED_SENTINEL, UUID_SIZE};

const MAX_PREALLOCATED_TEXT: usize = 64 * 1024;

/// How field validation failures are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Out-of-range values are clamped and counted. Used for snapshot items,
    /// which must always produce a usable record.
    Clamp,
    /// The first out-of-range value aborts the decode. Used for messages,
    /// which are peer input.
    Reject,
}

impl Dialect {
    /// The dialect used for `kind`.
    #[must_use]
    pub const fn for_kind(kind: Kind) -> Self {
        if kind.is_snapshot_item() {
            Self::Clamp
        } else {
            Self::Reject
        }
    }
}

enum Outcome {
    Record,
    Uuid([u8; UUID_SIZE]),
}

/// Decodes objects, events and messages of one protocol.
///
/// A handler carries mutable scratch and diagnostic state: use one per
/// connection or receive thread, never shared. Decoded records borrow the
/// handler's scratch and stay valid until the next decode call.
#[derive(Debug)]
pub struct Handler {
    protocol: Arc<Protocol>,
    limits: HandlerLimits,
    scratch: Scratch,
    failures: [Option<DecodeFailure>; 3],
    corrected_on: Option<Arc<str>>,
    correction_count: u32,
}

impl Handler {
    /// Creates a handler with default limits.
    #[must_use]
    pub fn new(protocol: Arc<Protocol>) -> Self {
        Self::with_limits(protocol, HandlerLimits::default())
    }

    /// Creates a handler with the given limits.
    #[must_use]
    pub fn with_limits(protocol: Arc<Protocol>, limits: HandlerLimits) -> Self {
        let scratch = Scratch::with_capacity(
            protocol.compiled().max_slots(),
            limits.max_string_bytes.min(MAX_PREALLOCATED_TEXT),
        );
        Self {
            protocol,
            limits,
            scratch,
            failures: [None, None, None],
            corrected_on: None,
            correction_count: 0,
        }
    }

    #[must_use]
    pub const fn protocol(&self) -> &Arc<Protocol> {
        &self.protocol
    }

    #[must_use]
    pub const fn limits(&self) -> &HandlerLimits {
        &self.limits
    }

    /// Decodes an object item body, clamping out-of-range fields.
    ///
    /// The sentinel id reads a UUID payload and returns it verbatim.
    pub fn decode_object(
        &mut self,
        id: TypeId,
        unpacker: &mut Unpacker<'_>,
    ) -> Result<Decoded<'_>, DecodeFailure> {
        self.decode(Kind::Object, id, unpacker)
    }

    /// Decodes an event item body, clamping out-of-range fields.
    pub fn decode_event(
        &mut self,
        id: TypeId,
        unpacker: &mut Unpacker<'_>,
    ) -> Result<Decoded<'_>, DecodeFailure> {
        self.decode(Kind::Event, id, unpacker)
    }

    /// Decodes a message body, rejecting out-of-range fields.
    pub fn decode_message(
        &mut self,
        id: TypeId,
        unpacker: &mut Unpacker<'_>,
    ) -> Result<Decoded<'_>, DecodeFailure> {
        self.decode(Kind::Message, id, unpacker)
    }

    /// Decodes a framed message: reads the id, resolving a UUID payload
    /// through the extended-type registry, then decodes the body.
    pub fn decode_message_frame(&mut self, bytes: &[u8]) -> Result<Decoded<'_>, DecodeFailure> {
        let mut unpacker = Unpacker::new(bytes);
        match read_frame_id(&mut unpacker, self.protocol.extensions()) {
            Ok(id) => self.decode(Kind::Message, id, &mut unpacker),
            Err(failure) => Err(self.fail(Kind::Message, EXTENDED_SENTINEL, failure)),
        }
    }

    fn decode(
        &mut self,
        kind: Kind,
        id: TypeId,
        unpacker: &mut Unpacker<'_>,
    ) -> Result<Decoded<'_>, DecodeFailure> {
        self.failures[kind.index()] = None;

        let mut result = self.decode_body(kind, id, unpacker);
        if unpacker.has_error() {
            result = Err(DecodeFailure::UnpackError);
        }

        match result {
            Ok(Outcome::Uuid(uuid)) => Ok(Decoded::ExtendedUuid(uuid)),
            Ok(Outcome::Record) => self
                .protocol
                .table(kind)
                .layout(id)
                .map(|layout| Decoded::Record(Record::new(layout, &self.scratch)))
                .ok_or(DecodeFailure::TypeOutOfRange { id }),
            Err(failure) => Err(self.fail(kind, id, failure)),
        }
    }

    fn decode_body(
        &mut self,
        kind: Kind,
        id: TypeId,
        unpacker: &mut Unpacker<'_>,
    ) -> Result<Outcome, DecodeFailure> {
        if id == EXTENDED_SENTINEL {
            let mut uuid = [0u8; UUID_SIZE];
            if let Ok(raw) = unpacker.get_raw(UUID_SIZE) {
                uuid.copy_from_slice(raw);
            }
            return Ok(Outcome::Uuid(uuid));
        }

        let Self {
            protocol,
            limits,
            scratch,
            corrected_on,
            correction_count,
            ..
        } = self;
        let layout = protocol
            .table(kind)
            .layout(id)
            .ok_or(DecodeFailure::TypeOutOfRange { id })?;

        scratch.clear();
        read_slots(layout, unpacker, scratch, limits)?;
        match Dialect::for_kind(kind) {
            Dialect::Clamp => {
                for (index, slot) in layout.slots.iter().enumerate() {
                    let Some(value) = scratch.int(index) else {
                        continue;
                    };
                    let corrected = clamp(layout.fields[slot.field].spec.element(), value);
                    if corrected != value {
                        scratch.set_int(index, corrected);
                        *correction_count = correction_count.saturating_add(1);
                        *corrected_on = Some(Arc::clone(&slot.name));
                        tracing::trace!(
                            type_name = %layout.name,
                            field = %slot.name,
                            value,
                            corrected,
                            "field clamped"
                        );
                    }
                }
            }
            Dialect::Reject => {
                for (index, slot) in layout.slots.iter().enumerate() {
                    let Some(value) = scratch.int(index) else {
                        continue;
                    };
                    if !layout.fields[slot.field].spec.element().accepts(value) {
                        return Err(DecodeFailure::Field {
                            name: Arc::clone(&slot.name),
                        });
                    }
                }
            }
        }
        Ok(Outcome::Record)
    }

    fn fail(&mut self, kind: Kind, id: TypeId, failure: DecodeFailure) -> DecodeFailure {
        tracing::debug!(%kind, id, reason = failure.reason(), "decode rejected");
        self.failures[kind.index()] = Some(failure.clone());
        failure
    }

    /// Last failure of the given kind's decode entry point.
    #[must_use]
    pub fn last_failure(&self, kind: Kind) -> Option<&DecodeFailure> {
        self.failures[kind.index()].as_ref()
    }

    /// Reason of the last failed object decode.
    #[must_use]
    pub fn failed_object_on(&self) -> Option<&str> {
        self.last_failure(Kind::Object).map(DecodeFailure::reason)
    }

    /// Reason of the last failed event decode.
    #[must_use]
    pub fn failed_event_on(&self) -> Option<&str> {
        self.last_failure(Kind::Event).map(DecodeFailure::reason)
    }

    /// Reason of the last failed message decode.
    #[must_use]
    pub fn failed_message_on(&self) -> Option<&str> {
        self.last_failure(Kind::Message).map(DecodeFailure::reason)
    }

    /// Name of the slot most recently clamped.
    #[must_use]
    pub fn corrected_on(&self) -> Option<&str> {
        self.corrected_on.as_deref()
    }

    /// Total clamped slots over the handler's lifetime.
    #[must_use]
    pub const fn correction_count(&self) -> u32 {
        self.correction_count
    }

    #[must_use]
    pub fn object_name(&self, id: TypeId) -> &str {
        self.protocol.objects().name(id)
    }

    #[must_use]
    pub fn event_name(&self, id: TypeId) -> &str {
        self.protocol.events().name(id)
    }

    #[must_use]
    pub fn message_name(&self, id: TypeId) -> &str {
        self.protocol.messages().name(id)
    }

    /// Declared wire size of an object, 0 if unknown or unvalidated.
    #[must_use]
    pub fn object_size(&self, id: TypeId) -> usize {
        self.protocol.objects().size(id)
    }

    /// In-memory size of a decoded object.
    #[must_use]
    pub fn unpacked_object_size(&self, id: TypeId) -> usize {
        self.protocol.objects().unpacked_size(id)
    }

    /// Whether the historian records messages of this id.
    #[must_use]
    pub fn is_message_recordable(&self, id: TypeId) -> bool {
        self.protocol.messages().is_recordable(id)
    }
}

/// Reads every slot of `layout` into `scratch`.
///
/// Read errors leave the unpacker's sticky error flag set and are reported
/// by the caller. Missing input falls back to field defaults.
fn read_slots(
    layout: &CompiledLayout,
    unpacker: &mut Unpacker<'_>,
    scratch: &mut Scratch,
    limits: &HandlerLimits,
) -> Result<(), DecodeFailure> {
    let snapshot_item = layout.kind.is_snapshot_item();
    if snapshot_item && layout.validate_exact_size {
        let expected = layout.wire_size();
        let found = unpacker.remaining();
        if found != expected {
            return Err(DecodeFailure::SizeMismatch { expected, found });
        }
    }

    for slot in &layout.slots {
        let spec = layout.fields[slot.field].spec.element();
        match slot.storage {
            Scalar::Int => {
                let value = match (snapshot_item, spec.default_value()) {
                    (true, Some(default)) => unpacker.get_uncompressed_int_or_default(default),
                    (true, None) => unpacker.get_uncompressed_int(),
                    (false, Some(default)) => unpacker.get_int_or_default(default),
                    (false, None) => unpacker.get_int(),
                };
                scratch.push_int(value.unwrap_or(0));
            }
            Scalar::Str => {
                let raw = unpacker.get_string(Sanitize::None).unwrap_or_default();
                let sanitize = spec.string_policy().map_or(Sanitize::None, sanitize_for);
                if !scratch.push_str(&raw, sanitize, limits.max_string_bytes) {
                    return Err(DecodeFailure::LimitExceeded {
                        limit: limits.max_string_bytes,
                    });
                }
            }
        }
    }
    Ok(())
}

fn clamp(spec: &FieldSpec, value: i32) -> i32 {
    if let Some((min, max)) = spec.range() {
        return value.clamp(min, max);
    }
    if let Some(mask) = spec.mask() {
        return value & mask;
    }
    value
}
