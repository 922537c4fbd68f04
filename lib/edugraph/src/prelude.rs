//! Prelude module for convenient imports.
//!
//! ```
//! use edugraph::prelude::*;
//! ```

pub use crate::models::{ModelFactory, ODataError};
pub use crate::{
    AuthenticationProvider, CancellationToken, CollectionQueryParameters, Error,
    GraphServiceClient, HyperRequestAdapter, ItemQueryParameters, Method, Parsable,
    RequestAdapter, RequestConfiguration, RequestInformation, Result, RetryOption,
    TimeoutOption,
};
