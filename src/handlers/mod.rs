//! Per-type document handling
//!
//! Every stored document belongs to a registered type. The type's
//! handler owns its identity (key, extension, MIME type, declared
//! schema) and hooks into the save/load lifecycle around persistence.
//!
//! ## Key Components
//!
//! - [`DocHandler`] - trait implemented once per document type
//! - [`HandlerRegistry`] - maps type keys to handler instances
//! - [`SldHandler`], [`WmcHandler`], [`KmlHandler`] - built-in types
//! - [`XmlDocHandler`] - generic handler for configured types
//! - [`DocPayload`] / [`LoadedDoc`] - bytes in, bytes out

mod kml;
mod registry;
mod sld;
mod traits;
pub(crate) mod types;
mod wmc;
mod xml;

pub use kml::KmlHandler;
pub use registry::{BUILTIN_TYPE_KEYS, HandlerRegistry, RegistryError};
pub use sld::SldHandler;
pub use traits::{DocHandler, HandlerError, enforce_declared_schema};
pub use types::{DocPayload, DocType, LoadedDoc};
pub use wmc::WmcHandler;
pub use xml::XmlDocHandler;
