//! Prelude module for convenient imports.
//!
//! ```
//! use edugraph_core::prelude::*;
//! ```

pub use crate::serialization::{
    AdditionalData, FieldDeserializers, ParsableFactory, field, parse_object,
};
pub use crate::{
    AuthenticationProvider, CancellationToken, Error, ErrorMappings, Method, Parsable,
    ParsableEnum, ParseNode, RequestAdapter, RequestAdapterExt, RequestHeaders,
    RequestInformation, RequestOptions, Result, SerializationWriter,
};
