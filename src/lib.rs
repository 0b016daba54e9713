#![cfg_attr(not(feature = "std"), no_std)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

//! `extprot`: codec and type model for the extprot self-describing binary
//! serialization format.
//!
//! A schema is compiled with [`schema::compile`] into a [`schema::Namespace`]
//! of [`types::Type`] objects; values of those types are built through
//! [`value::Value`] and its typed containers, and moved to and from the wire
//! with [`encode`]/[`decode`]/[`write_to`]/[`read_from`]/[`skip_one`].

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub use bytes;

pub mod api;
pub mod error;
pub mod io;
pub mod schema;
pub mod types;
pub mod value;
pub mod wire;

pub use crate::api::decode;
pub use crate::api::encode;
pub use crate::api::read_from;
pub use crate::api::skip_one;
pub use crate::api::write_to;
pub use crate::error::Error;
pub use crate::error::Result;
pub use crate::schema::compile;
pub use crate::schema::Namespace;
pub use crate::types::Type;
pub use crate::value::Value;
pub use crate::wire::DecodeContext;
pub use crate::wire::RECURSION_LIMIT;
