//! `/education/users`

#[allow(deprecated)]
use crate::models::UsersDeltaResponse;
use crate::models::{
    EducationSchool, EducationSchoolCollectionResponse, EducationUser,
    EducationUserCollectionResponse, ModelFactory, UsersDeltaGetResponse,
};
use crate::{
    CollectionRequestConfiguration, ItemRequestConfiguration, Method, RequestConfiguration,
    RequestInformation, Result,
};

const USER_ID: &str = "educationUser%2Did";
const SCHOOL_ID: &str = "educationSchool%2Did";

request_builder! {
    /// `/education/users`
    UsersRequestBuilder => "{+baseurl}/education/users{?%24count,%24expand,%24filter,%24orderby,%24search,%24select,%24skip,%24top}"
}

impl UsersRequestBuilder {
    /// `/education/users/{educationUser-id}`
    #[must_use]
    pub fn by_education_user_id(&self, id: impl Into<String>) -> UserItemRequestBuilder {
        UserItemRequestBuilder::child_of(&self.base, USER_ID, id.into())
    }

    /// `/education/users/delta()`
    #[must_use]
    pub fn delta(&self) -> UsersDeltaRequestBuilder {
        UsersDeltaRequestBuilder::navigate_from(&self.base)
    }

    /// List users.
    pub async fn get(
        &self,
        config: Option<&CollectionRequestConfiguration>,
    ) -> Result<Option<EducationUserCollectionResponse>> {
        let info = self.to_get_request_information(config)?;
        self.base
            .send(
                info,
                EducationUserCollectionResponse::create_from_discriminator_value,
                config,
            )
            .await
    }

    /// Create a user.
    pub async fn post(
        &self,
        body: &EducationUser,
        config: Option<&RequestConfiguration>,
    ) -> Result<Option<EducationUser>> {
        let info = self.to_post_request_information(body, config)?;
        self.base
            .send(info, EducationUser::create_from_discriminator_value, config)
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
        body: &EducationUser,
        config: Option<&RequestConfiguration>,
    ) -> Result<RequestInformation> {
        self.base
            .request_information_with_body(Method::Post, Self::URL_TEMPLATE, body, config)
    }
}

request_builder! {
    /// `/education/users/{educationUser-id}`
    UserItemRequestBuilder => "{+baseurl}/education/users/{educationUser%2Did}{?%24expand,%24select}"
}

impl UserItemRequestBuilder {
    /// `…/schools`
    #[must_use]
    pub fn schools(&self) -> UserSchoolsRequestBuilder {
        UserSchoolsRequestBuilder::navigate_from(&self.base)
    }

    /// Read the user.
    pub async fn get(
        &self,
        config: Option<&ItemRequestConfiguration>,
    ) -> Result<Option<EducationUser>> {
        let info = self.to_get_request_information(config)?;
        self.base
            .send(info, EducationUser::create_from_discriminator_value, config)
            .await
    }

    /// Update the user.
    pub async fn patch(
        &self,
        body: &EducationUser,
        config: Option<&RequestConfiguration>,
    ) -> Result<Option<EducationUser>> {
        let info = self.to_patch_request_information(body, config)?;
        self.base
            .send(info, EducationUser::create_from_discriminator_value, config)
            .await
    }

    /// Delete the user.
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
        body: &EducationUser,
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
    /// `/education/users/{educationUser-id}/schools`
    UserSchoolsRequestBuilder => "{+baseurl}/education/users/{educationUser%2Did}/schools{?%24count,%24expand,%24filter,%24orderby,%24search,%24select,%24skip,%24top}"
}

impl UserSchoolsRequestBuilder {
    /// `…/schools/{educationSchool-id}`
    #[must_use]
    pub fn by_education_school_id(&self, id: impl Into<String>) -> UserSchoolItemRequestBuilder {
        UserSchoolItemRequestBuilder::child_of(&self.base, SCHOOL_ID, id.into())
    }

    /// List the schools of the user.
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

    /// Assemble the `GET` request.
    pub fn to_get_request_information(
        &self,
        config: Option<&CollectionRequestConfiguration>,
    ) -> Result<RequestInformation> {
        self.base.request_information(Method::Get, config)
    }
}

request_builder! {
    /// `/education/users/{educationUser-id}/schools/{educationSchool-id}`
    UserSchoolItemRequestBuilder => "{+baseurl}/education/users/{educationUser%2Did}/schools/{educationSchool%2Did}{?%24expand,%24select}"
}

impl UserSchoolItemRequestBuilder {
    /// Read one school of the user.
    pub async fn get(
        &self,
        config: Option<&ItemRequestConfiguration>,
    ) -> Result<Option<EducationSchool>> {
        let info = self.to_get_request_information(config)?;
        self.base
            .send(info, EducationSchool::create_from_discriminator_value, config)
            .await
    }

    /// Assemble the `GET` request.
    pub fn to_get_request_information(
        &self,
        config: Option<&ItemRequestConfiguration>,
    ) -> Result<RequestInformation> {
        self.base.request_information(Method::Get, config)
    }
}

request_builder! {
    /// `/education/users/delta()`
    UsersDeltaRequestBuilder => "{+baseurl}/education/users/delta(){?%24count,%24expand,%24filter,%24orderby,%24search,%24select,%24skip,%24top}"
}

impl UsersDeltaRequestBuilder {
    /// Read the users changed since the last delta round.
    pub async fn get_as_delta_get_response(
        &self,
        config: Option<&CollectionRequestConfiguration>,
    ) -> Result<Option<UsersDeltaGetResponse>> {
        let info = self.to_get_request_information(config)?;
        self.base
            .send(info, UsersDeltaGetResponse::create_from_discriminator_value, config)
            .await
    }

    /// Read the users changed since the last delta round, under the former response name.
    #[deprecated(note = "Use get_as_delta_get_response instead.")]
    #[allow(deprecated)]
    pub async fn get(
        &self,
        config: Option<&CollectionRequestConfiguration>,
    ) -> Result<Option<UsersDeltaResponse>> {
        let info = self.to_get_request_information(config)?;
        self.base
            .send(info, UsersDeltaResponse::create_from_discriminator_value, config)
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
