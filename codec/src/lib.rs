//! Protocol compiler and runtime decoder/validator.
//!
//! This crate turns a validated [`schema::Registry`] into a
//! [`CompiledProtocol`] (dense identifiers, flattened layouts, name and size
//! tables, the extended-type registration table) and decodes wire bytes
//! against it with a [`Handler`].
//!
//! # Features
//!
//! - Dense and extended identifier assignment per kind
//! - Inheritance flattening into fixed slot layouts
//! - Clamping decode for snapshot items, rejecting decode for messages
//! - Message framing with UUID-identified extended types
//! - Rust source emission of the identifier tables
//!
//! # Design Principles
//!
//! - **Compile once, decode often** - All schema work happens in [`compile`].
//! - **Initialization barrier** - A [`Handler`] needs an activated [`Protocol`].
//! - **No panics on input** - Every decode failure is a [`DecodeFailure`].
//! - **Bounded decode** - Scratch buffers are sized up front and reused.
//!
//! # Example
//!
//! ```
//! use codec::{CompileOptions, Handler, Protocol, Value};
//! use packer::Unpacker;
//! use schema::{FieldSpec, Kind, Registry, TypeDef};
//!
//! let registry = Registry::builder()
//!     .add(TypeDef::message("Sv_Chat").field("m_Team", FieldSpec::int_range(-2, 3)))
//!     .build()
//!     .unwrap();
//! let protocol = Protocol::from_registry(&registry, &CompileOptions::default())
//!     .unwrap()
//!     .into_shared();
//!
//! let mut packer = packer::Packer::new();
//! protocol.pack(Kind::Message, 1, &[Value::Int(3)], &mut packer).unwrap();
//! let bytes = packer.finish();
//!
//! let mut handler = Handler::new(protocol);
//! let record = handler
//!     .decode_message(1, &mut Unpacker::new(&bytes))
//!     .unwrap()
//!     .record()
//!     .unwrap();
//! assert_eq!(record.int("m_Team"), Some(3));
//! ```

mod compiler;
mod emit;
mod error;
mod extended;
mod frame;
mod handler;
mod layout;
mod limits;
mod protocol;
mod record;
mod scratch;
mod types;

pub use compiler::{compile, CompiledProtocol, KindTable, Registration};
pub use emit::{emit_rust_module, write_rust_module};
pub use error::{CodecError, CodecResult, DecodeFailure, RegistrationError};
pub use extended::{register_extensions, ExtendedTypeRegistry};
pub use frame::{pack_message, pack_message_to_vec};
pub use handler::{Dialect, Handler};
pub use layout::{CompiledLayout, LayoutField, Slot};
pub use limits::{CompileOptions, HandlerLimits};
pub use protocol::Protocol;
pub use record::{Decoded, Record};
pub use types::{
    FieldValue, Value, EXTENDED_SENTINEL, INT_SLOT_SIZE, INVALID_NAME, OUT_OF_RANGE_NAME,
    STR_SLOT_SIZE, UUID_SIZE,
};
