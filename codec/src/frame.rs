//! Message framing: a type id (or the sentinel plus a UUID) before the body.

use packer::{Packer, Unpacker};
use schema::{Kind, TypeId};

use crate::error::{CodecError, CodecResult, DecodeFailure};
use crate::extended::ExtendedTypeRegistry;
use crate::protocol::Protocol;
use crate::types::{Value, EXTENDED_SENTINEL, UUID_SIZE};

/// Writes a framed message: the id, then the body.
///
/// Extended messages are written as the sentinel id followed by the
/// type's UUID payload.
pub fn pack_message(
    protocol: &Protocol,
    id: TypeId,
    values: &[Value],
    packer: &mut Packer,
) -> CodecResult<()> {
    let layout = protocol
        .messages()
        .layout(id)
        .ok_or(CodecError::UnknownType {
            kind: Kind::Message,
            id,
        })?;
    match layout.uuid {
        Some(uuid) => {
            packer.add_int(EXTENDED_SENTINEL)?;
            packer.add_raw(&uuid)?;
        }
        None => packer.add_int(id)?,
    }
    layout.pack(values, packer)
}

/// Packs a framed message into a new buffer.
pub fn pack_message_to_vec(protocol: &Protocol, id: TypeId, values: &[Value]) -> CodecResult<Vec<u8>> {
    let mut packer = Packer::new();
    pack_message(protocol, id, values, &mut packer)?;
    Ok(packer.finish())
}

/// Reads a frame header and resolves it to a message id.
pub(crate) fn read_frame_id(
    unpacker: &mut Unpacker<'_>,
    extensions: &ExtendedTypeRegistry,
) -> Result<TypeId, DecodeFailure> {
    let id = unpacker.get_int().map_err(|_| DecodeFailure::UnpackError)?;
    if id != EXTENDED_SENTINEL {
        return Ok(id);
    }
    let raw = unpacker
        .get_raw(UUID_SIZE)
        .map_err(|_| DecodeFailure::UnpackError)?;
    let mut uuid = [0u8; UUID_SIZE];
    uuid.copy_from_slice(raw);
    extensions
        .resolve_uuid(&uuid)
        .ok_or(DecodeFailure::TypeOutOfRange { id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::CompileOptions;
    use schema::{FieldSpec, Registry, TypeDef};

    fn protocol() -> Protocol {
        let registry = Registry::builder()
            .add(TypeDef::message("Sv_Motd").field("m_pMessage", FieldSpec::string()))
            .add(
                TypeDef::message("Cl_IsDDNet")
                    .extension("is-ddnet@ddnet.tw")
                    .field("m_Version", FieldSpec::int_any()),
            )
            .build()
            .unwrap();
        Protocol::from_registry(&registry, &CompileOptions::for_testing()).unwrap()
    }

    #[test]
    fn dense_frame_starts_with_id() {
        let bytes = pack_message_to_vec(&protocol(), 1, &[Value::from("hi")]).unwrap();
        assert_eq!(bytes, vec![1, b'h', b'i', 0]);
    }

    #[test]
    fn extended_frame_carries_uuid() {
        let protocol = protocol();
        let bytes = pack_message_to_vec(&protocol, 0x300, &[Value::Int(5)]).unwrap();
        assert_eq!(bytes[0], 0);
        assert_eq!(&bytes[1..17], &schema::extension_uuid("is-ddnet@ddnet.tw"));
        assert_eq!(bytes[17], 5);

        let mut unpacker = Unpacker::new(&bytes);
        assert_eq!(read_frame_id(&mut unpacker, protocol.extensions()), Ok(0x300));
    }

    #[test]
    fn unknown_uuid_is_out_of_range() {
        let mut bytes = vec![0];
        bytes.extend_from_slice(&[0xAB; 16]);
        let mut unpacker = Unpacker::new(&bytes);
        assert_eq!(
            read_frame_id(&mut unpacker, protocol().extensions()),
            Err(DecodeFailure::TypeOutOfRange { id: 0 })
        );
    }

    #[test]
    fn truncated_uuid_is_unpack_error() {
        let bytes = [0u8, 1, 2, 3];
        let mut unpacker = Unpacker::new(&bytes);
        assert_eq!(
            read_frame_id(&mut unpacker, protocol().extensions()),
            Err(DecodeFailure::UnpackError)
        );
    }

    #[test]
    fn unknown_message_id_fails_to_pack() {
        assert!(pack_message_to_vec(&protocol(), 7, &[]).is_err());
    }
}
