//! `/education/schools`

#[allow(deprecated)]
use crate::models::SchoolsDeltaResponse;
use crate::models::{
    EducationSchool, EducationSchoolCollectionResponse, ModelFactory, SchoolsDeltaGetResponse,
};
use crate::{
    CollectionRequestConfiguration, ItemRequestConfiguration, Method, RequestConfiguration,
    RequestInformation, Result,
};

const SCHOOL_ID: &str = "educationSchool%2Did";

request_builder! {
    /// `/education/schools`
    SchoolsRequestBuilder => "{+baseurl}/education/schools{?%24count,%24expand,%24filter,%24orderby,%24search,%24select,%24skip,%24top}"
}

impl SchoolsRequestBuilder {
    /// `/education/schools/{educationSchool-id}`
    #[must_use]
    pub fn by_education_school_id(&self, id: impl Into<String>) -> SchoolItemRequestBuilder {
        SchoolItemRequestBuilder::child_of(&self.base, SCHOOL_ID, id.into())
    }

    /// `/education/schools/delta()`
    #[must_use]
    pub fn delta(&self) -> SchoolsDeltaRequestBuilder {
        SchoolsDeltaRequestBuilder::navigate_from(&self.base)
    }

    /// List schools.
    pub async fn get(
        &self,
        config: Option<&CollectionRequestConfiguration>,
    ) -> Result<Option<EducationSchoolCollectionResponse>> {
        let info = self.to_get_request_information(config)?;
        self.base
            .send(
                info,
                EducationSchoolCollectionResponse::create_from_discriminator_value,
                config,
            )
            .await
    }

    /// Create a school.
    pub async fn post(
        &self,
        body: &EducationSchool,
        config: Option<&RequestConfiguration>,
    ) -> Result<Option<EducationSchool>> {
        let info = self.to_post_request_information(body, config)?;
        self.base
            .send(info, EducationSchool::create_from_discriminator_value, config)
            .await
    }

    /// Assemble the `GET` request.
    pub fn to_get_request_information(
        &self,
        config: Option<&CollectionRequestConfiguration>,
    ) -> Result<RequestInformation> {
        self.base.request_information(Method::Get, config)
    }

    /// Assemble the `POST` request.
    pub fn to_post_request_information(
        &self,
        body: &EducationSchool,
        config: Option<&RequestConfiguration>,
    ) -> Result<RequestInformation> {
        self.base
            .request_information_with_body(Method::Post, Self::URL_TEMPLATE, body, config)
    }
}

request_builder! {
    /// `/education/schools/{educationSchool-id}`
    SchoolItemRequestBuilder => "{+baseurl}/education/schools/{educationSchool%2Did}{?%24expand,%24select}"
}

impl SchoolItemRequestBuilder {
    /// Read the school.
    pub async fn get(
        &self,
        config: Option<&ItemRequestConfiguration>,
    ) -> Result<Option<EducationSchool>> {
        let info = self.to_get_request_information(config)?;
        self.base
            .send(info, EducationSchool::create_from_discriminator_value, config)
            .await
    }

    /// Update the school.
    pub async fn patch(
        &self,
        body: &EducationSchool,
        config: Option<&RequestConfiguration>,
    ) -> Result<Option<EducationSchool>> {
        let info = self.to_patch_request_information(body, config)?;
        self.base
            .send(info, EducationSchool::create_from_discriminator_value, config)
            .await
    }

    /// Delete the school.
    pub async fn delete(&self, config: Option<&RequestConfiguration>) -> Result<()> {
        let info = self.to_delete_request_information(config)?;
        self.base.send_no_content(info, config).await
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
        body: &EducationSchool,
        config: Option<&RequestConfiguration>,
    ) -> Result<RequestInformation> {
        self.base
            .request_information_with_body(Method::Patch, Self::URL_TEMPLATE, body, config)
    }

    /// Assemble the `DELETE` request.
    pub fn to_delete_request_information(
        &self,
        config: Option<&RequestConfiguration>,
    ) -> Result<RequestInformation> {
        self.base.request_information(Method::Delete, config)
    }
}

request_builder! {
    /// `/education/schools/delta()`
    SchoolsDeltaRequestBuilder => "{+baseurl}/education/schools/delta(){?%24count,%24expand,%24filter,%24orderby,%24search,%24select,%24skip,%24top}"
}

impl SchoolsDeltaRequestBuilder {
    /// Read the schools changed since the last delta round.
    pub async fn get_as_delta_get_response(
        &self,
        config: Option<&CollectionRequestConfiguration>,
    ) -> Result<Option<SchoolsDeltaGetResponse>> {
        let info = self.to_get_request_information(config)?;
        self.base
            .send(info, SchoolsDeltaGetResponse::create_from_discriminator_value, config)
            .await
    }

    /// Read the schools changed since the last delta round, under the former response name.
    #[deprecated(note = "Use get_as_delta_get_response instead.")]
    #[allow(deprecated)]
    pub async fn get(
        &self,
        config: Option<&CollectionRequestConfiguration>,
    ) -> Result<Option<SchoolsDeltaResponse>> {
        let info = self.to_get_request_information(config)?;
        self.base
            .send(info, SchoolsDeltaResponse::create_from_discriminator_value, config)
            .await
    }

    /// Assemble the `GET` request.
    pub fn to_get_request_information(
        &self,
        config: Option<&CollectionRequestConfiguration>,
    ) -> Result<RequestInformation> {
        self.base.request_information(Method::Get, config)
    }
}
