//! Request builders for the `/education` API.
//!
//! Builders mirror the URL hierarchy: each navigation method returns the builder of the
//! next segment, each verb has an async method that sends the call and a
//! `to_<verb>_request_information` method that only assembles it.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use edugraph::{CollectionQueryParameters, GraphServiceClient, HyperRequestAdapter, RequestConfiguration};
//!
//! # async fn run() -> edugraph::Result<()> {
//! let client = GraphServiceClient::new(Arc::new(HyperRequestAdapter::default()));
//! let config = RequestConfiguration::new().query(CollectionQueryParameters::new().top(10));
//! let page = client.education().classes().get(Some(&config)).await?;
//! # Ok(())
//! # }
//! ```

/// Declares a request builder bound to one URL template.
macro_rules! request_builder {
    ($(#[$meta:meta])* $name:ident => $template:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            base: $crate::BaseRequestBuilder,
        }

        impl $name {
            /// URL template of this endpoint.
            pub const URL_TEMPLATE: &'static str = $template;

            /// Bind the endpoint to a copy of `path_parameters`.
            #[must_use]
            pub fn new(
                adapter: std::sync::Arc<dyn $crate::RequestAdapter>,
                path_parameters: &$crate::ParameterMap,
            ) -> Self {
                Self {
                    base: $crate::BaseRequestBuilder::new(adapter, Self::URL_TEMPLATE, path_parameters),
                }
            }

            /// The same endpoint bound to a literal URL, such as an `@odata.nextLink`.
            #[must_use]
            pub fn with_url(&self, raw_url: impl Into<String>) -> Self {
                Self {
                    base: self.base.with_url(raw_url),
                }
            }

            /// Shared builder state.
            #[must_use]
            pub fn base(&self) -> &$crate::BaseRequestBuilder {
                &self.base
            }

            #[allow(dead_code)]
            pub(crate) fn navigate_from(parent: &$crate::BaseRequestBuilder) -> Self {
                Self {
                    base: parent.navigate(Self::URL_TEMPLATE),
                }
            }

            #[allow(dead_code)]
            pub(crate) fn child_of(
                parent: &$crate::BaseRequestBuilder,
                key: &str,
                id: impl Into<$crate::ParameterValue>,
            ) -> Self {
                Self {
                    base: parent.child(Self::URL_TEMPLATE, key, id),
                }
            }
        }
    };
}

mod classes;
mod me;
mod schools;
mod users;

pub use classes::{
    AssignmentCategoriesDeltaRequestBuilder, AssignmentCategoriesRequestBuilder,
    ClassAssignmentItemRequestBuilder, ClassAssignmentsRequestBuilder, ClassItemRequestBuilder,
    ClassesRequestBuilder, EducationCategoryItemRequestBuilder, PublishRequestBuilder,
};
pub use me::{
    ExcuseRequestBuilder, MeAssignmentItemRequestBuilder, MeAssignmentsDeltaRequestBuilder,
    MeAssignmentsRequestBuilder, MeRequestBuilder, ReturnRequestBuilder, SubmissionItemRequestBuilder,
    SubmissionsRequestBuilder, SubmitRequestBuilder, UnsubmitRequestBuilder,
};
pub use schools::{SchoolItemRequestBuilder, SchoolsDeltaRequestBuilder, SchoolsRequestBuilder};
pub use users::{
    UserItemRequestBuilder, UserSchoolItemRequestBuilder, UserSchoolsRequestBuilder,
    UsersDeltaRequestBuilder, UsersRequestBuilder,
};

use crate::models::{EducationRoot, ModelFactory};
use crate::{ItemRequestConfiguration, Method, RequestConfiguration, RequestInformation, Result};

request_builder! {
    /// `/education`
    EducationRequestBuilder => "{+baseurl}/education{?%24expand,%24select}"
}

impl EducationRequestBuilder {
    /// `/education/classes`
    #[must_use]
    pub fn classes(&self) -> ClassesRequestBuilder {
        ClassesRequestBuilder::navigate_from(&self.base)
    }

    /// `/education/me`
    #[must_use]
    pub fn me(&self) -> MeRequestBuilder {
        MeRequestBuilder::navigate_from(&self.base)
    }

    /// `/education/schools`
    #[must_use]
    pub fn schools(&self) -> SchoolsRequestBuilder {
        SchoolsRequestBuilder::navigate_from(&self.base)
    }

    /// `/education/users`
    #[must_use]
    pub fn users(&self) -> UsersRequestBuilder {
        UsersRequestBuilder::navigate_from(&self.base)
    }

    /// Read the education root.
    pub async fn get(
        &self,
        config: Option<&ItemRequestConfiguration>,
    ) -> Result<Option<EducationRoot>> {
        let info = self.to_get_request_information(config)?;
        self.base
            .send(info, EducationRoot::create_from_discriminator_value, config)
            .await
    }

    /// Update the education root.
    pub async fn patch(
        &self,
        body: &EducationRoot,
        config: Option<&RequestConfiguration>,
    ) -> Result<Option<EducationRoot>> {
        let info = self.to_patch_request_information(body, config)?;
        self.base
            .send(info, EducationRoot::create_from_discriminator_value, config)
            .await
    }

    /// Assemble the `GET` request.
    pub fn to_get_request_information(
        &self,
        config: Option<&ItemRequestConfiguration>,
    ) -> Result<RequestInformation> {
        self.base.request_information(Method::Get, config)
    }

    /// Assemble the `PATCH` request.
    pub fn to_patch_request_information(
        &self,
        body: &EducationRoot,
        config: Option<&RequestConfiguration>,
    ) -> Result<RequestInformation> {
        self.base
            .request_information_with_body(Method::Patch, Self::URL_TEMPLATE, body, config)
    }
}
