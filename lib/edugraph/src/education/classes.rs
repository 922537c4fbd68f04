//! `/education/classes` and everything below it.

use crate::models::{
    ClassesItemAssignmentCategoriesDeltaGetResponse, EducationAssignment,
    EducationAssignmentCollectionResponse, EducationCategory, EducationCategoryCollectionResponse,
    EducationClass, EducationClassCollectionResponse, ModelFactory,
};
#[allow(deprecated)]
use crate::models::ClassesItemAssignmentCategoriesDeltaResponse;
use crate::{
    CollectionRequestConfiguration, ItemRequestConfiguration, Method, RequestConfiguration,
    RequestInformation, Result,
};

const CLASS_ID: &str = "educationClass%2Did";
const CATEGORY_ID: &str = "educationCategory%2Did";
const ASSIGNMENT_ID: &str = "educationAssignment%2Did";

request_builder! {
    /// `/education/classes`
    ClassesRequestBuilder => "{+baseurl}/education/classes{?%24count,%24expand,%24filter,%24orderby,%24search,%24select,%24skip,%24top}"
}

impl ClassesRequestBuilder {
    /// `/education/classes/{educationClass-id}`
    #[must_use]
    pub fn by_education_class_id(&self, id: impl Into<String>) -> ClassItemRequestBuilder {
        ClassItemRequestBuilder::child_of(&self.base, CLASS_ID, id.into())
    }

    /// List classes.
    pub async fn get(
        &self,
        config: Option<&CollectionRequestConfiguration>,
    ) -> Result<Option<EducationClassCollectionResponse>> {
        let info = self.to_get_request_information(config)?;
        self.base
            .send(
                info,
                EducationClassCollectionResponse::create_from_discriminator_value,
                config,
            )
            .await
    }

    /// Create a class.
    pub async fn post(
        &self,
        body: &EducationClass,
        config: Option<&RequestConfiguration>,
    ) -> Result<Option<EducationClass>> {
        let info = self.to_post_request_information(body, config)?;
        self.base
            .send(info, EducationClass::create_from_discriminator_value, config)
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
        body: &EducationClass,
        config: Option<&RequestConfiguration>,
    ) -> Result<RequestInformation> {
        self.base
            .request_information_with_body(Method::Post, Self::URL_TEMPLATE, body, config)
    }
}

request_builder! {
    /// `/education/classes/{educationClass-id}`
    ClassItemRequestBuilder => "{+baseurl}/education/classes/{educationClass%2Did}{?%24expand,%24select}"
}

impl ClassItemRequestBuilder {
    /// `…/assignmentCategories`
    #[must_use]
    pub fn assignment_categories(&self) -> AssignmentCategoriesRequestBuilder {
        AssignmentCategoriesRequestBuilder::navigate_from(&self.base)
    }

    /// `…/assignments`
    #[must_use]
    pub fn assignments(&self) -> ClassAssignmentsRequestBuilder {
        ClassAssignmentsRequestBuilder::navigate_from(&self.base)
    }

    /// Read the class.
    pub async fn get(
        &self,
        config: Option<&ItemRequestConfiguration>,
    ) -> Result<Option<EducationClass>> {
        let info = self.to_get_request_information(config)?;
        self.base
            .send(info, EducationClass::create_from_discriminator_value, config)
            .await
    }

    /// Update the class.
    pub async fn patch(
        &self,
        body: &EducationClass,
        config: Option<&RequestConfiguration>,
    ) -> Result<Option<EducationClass>> {
        let info = self.to_patch_request_information(body, config)?;
        self.base
            .send(info, EducationClass::create_from_discriminator_value, config)
            .await
    }

    /// Delete the class.
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
        body: &EducationClass,
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

// ============================================================================
// Assignment categories
// ============================================================================

request_builder! {
    /// `/education/classes/{educationClass-id}/assignmentCategories`
    AssignmentCategoriesRequestBuilder => "{+baseurl}/education/classes/{educationClass%2Did}/assignmentCategories{?%24count,%24expand,%24filter,%24orderby,%24search,%24select,%24skip,%24top}"
}

impl AssignmentCategoriesRequestBuilder {
    /// `…/assignmentCategories/{educationCategory-id}`
    #[must_use]
    pub fn by_education_category_id(
        &self,
        id: impl Into<String>,
    ) -> EducationCategoryItemRequestBuilder {
        EducationCategoryItemRequestBuilder::child_of(&self.base, CATEGORY_ID, id.into())
    }

    /// `…/assignmentCategories/delta()`
    #[must_use]
    pub fn delta(&self) -> AssignmentCategoriesDeltaRequestBuilder {
        AssignmentCategoriesDeltaRequestBuilder::navigate_from(&self.base)
    }

    /// List the categories of the class.
    pub async fn get(
        &self,
        config: Option<&CollectionRequestConfiguration>,
    ) -> Result<Option<EducationCategoryCollectionResponse>> {
        let info = self.to_get_request_information(config)?;
        self.base
            .send(
                info,
                EducationCategoryCollectionResponse::create_from_discriminator_value,
                config,
            )
            .await
    }

    /// Create a category.
    pub async fn post(
        &self,
        body: &EducationCategory,
        config: Option<&RequestConfiguration>,
    ) -> Result<Option<EducationCategory>> {
        let info = self.to_post_request_information(body, config)?;
        self.base
            .send(info, EducationCategory::create_from_discriminator_value, config)
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
        body: &EducationCategory,
        config: Option<&RequestConfiguration>,
    ) -> Result<RequestInformation> {
        self.base
            .request_information_with_body(Method::Post, Self::URL_TEMPLATE, body, config)
    }
}

request_builder! {
    /// `/education/classes/{educationClass-id}/assignmentCategories/{educationCategory-id}`
    EducationCategoryItemRequestBuilder => "{+baseurl}/education/classes/{educationClass%2Did}/assignmentCategories/{educationCategory%2Did}{?%24expand,%24select}"
}

impl EducationCategoryItemRequestBuilder {
    /// Read the category.
    pub async fn get(
        &self,
        config: Option<&ItemRequestConfiguration>,
    ) -> Result<Option<EducationCategory>> {
        let info = self.to_get_request_information(config)?;
        self.base
            .send(info, EducationCategory::create_from_discriminator_value, config)
            .await
    }

    /// Delete the category.
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

    /// Assemble the `DELETE` request.
    pub fn to_delete_request_information(
        &self,
        config: Option<&RequestConfiguration>,
    ) -> Result<RequestInformation> {
        self.base.request_information(Method::Delete, config)
    }
}

request_builder! {
    /// `/education/classes/{educationClass-id}/assignmentCategories/delta()`
    AssignmentCategoriesDeltaRequestBuilder => "{+baseurl}/education/classes/{educationClass%2Did}/assignmentCategories/delta(){?%24count,%24expand,%24filter,%24orderby,%24search,%24select,%24skip,%24top}"
}

impl AssignmentCategoriesDeltaRequestBuilder {
    /// Read the categories changed since the last delta round.
    pub async fn get_as_delta_get_response(
        &self,
        config: Option<&CollectionRequestConfiguration>,
    ) -> Result<Option<ClassesItemAssignmentCategoriesDeltaGetResponse>> {
        let info = self.to_get_request_information(config)?;
        self.base
            .send(
                info,
                ClassesItemAssignmentCategoriesDeltaGetResponse::create_from_discriminator_value,
                config,
            )
            .await
    }

    /// Read the categories changed since the last delta round, under the former response name.
    #[deprecated(note = "Use get_as_delta_get_response instead.")]
    #[allow(deprecated)]
    pub async fn get(
        &self,
        config: Option<&CollectionRequestConfiguration>,
    ) -> Result<Option<ClassesItemAssignmentCategoriesDeltaResponse>> {
        let info = self.to_get_request_information(config)?;
        self.base
            .send(
                info,
                ClassesItemAssignmentCategoriesDeltaResponse::create_from_discriminator_value,
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

// ============================================================================
// Class assignments
// ============================================================================

request_builder! {
    /// `/education/classes/{educationClass-id}/assignments`
    ClassAssignmentsRequestBuilder => "{+baseurl}/education/classes/{educationClass%2Did}/assignments{?%24count,%24expand,%24filter,%24orderby,%24search,%24select,%24skip,%24top}"
}

impl ClassAssignmentsRequestBuilder {
    /// `…/assignments/{educationAssignment-id}`
    #[must_use]
    pub fn by_education_assignment_id(
        &self,
        id: impl Into<String>,
    ) -> ClassAssignmentItemRequestBuilder {
        ClassAssignmentItemRequestBuilder::child_of(&self.base, ASSIGNMENT_ID, id.into())
    }

    /// List the assignments of the class.
    pub async fn get(
        &self,
        config: Option<&CollectionRequestConfiguration>,
    ) -> Result<Option<EducationAssignmentCollectionResponse>> {
        let info = self.to_get_request_information(config)?;
        self.base
            .send(
                info,
                EducationAssignmentCollectionResponse::create_from_discriminator_value,
                config,
            )
            .await
    }

    /// Create an assignment in draft state.
    pub async fn post(
        &self,
        body: &EducationAssignment,
        config: Option<&RequestConfiguration>,
    ) -> Result<Option<EducationAssignment>> {
        let info = self.to_post_request_information(body, config)?;
        self.base
            .send(info, EducationAssignment::create_from_discriminator_value, config)
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
        body: &EducationAssignment,
        config: Option<&RequestConfiguration>,
    ) -> Result<RequestInformation> {
        self.base
            .request_information_with_body(Method::Post, Self::URL_TEMPLATE, body, config)
    }
}

request_builder! {
    /// `/education/classes/{educationClass-id}/assignments/{educationAssignment-id}`
    ClassAssignmentItemRequestBuilder => "{+baseurl}/education/classes/{educationClass%2Did}/assignments/{educationAssignment%2Did}{?%24expand,%24select}"
}

impl ClassAssignmentItemRequestBuilder {
    /// `…/publish`
    #[must_use]
    pub fn publish(&self) -> PublishRequestBuilder {
        PublishRequestBuilder::navigate_from(&self.base)
    }

    /// Read the assignment.
    pub async fn get(
        &self,
        config: Option<&ItemRequestConfiguration>,
    ) -> Result<Option<EducationAssignment>> {
        let info = self.to_get_request_information(config)?;
        self.base
            .send(info, EducationAssignment::create_from_discriminator_value, config)
            .await
    }

    /// Update the assignment.
    pub async fn patch(
        &self,
        body: &EducationAssignment,
        config: Option<&RequestConfiguration>,
    ) -> Result<Option<EducationAssignment>> {
        let info = self.to_patch_request_information(body, config)?;
        self.base
            .send(info, EducationAssignment::create_from_discriminator_value, config)
            .await
    }

    /// Delete the assignment.
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
        body: &EducationAssignment,
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
    /// `/education/classes/{educationClass-id}/assignments/{educationAssignment-id}/publish`
    PublishRequestBuilder => "{+baseurl}/education/classes/{educationClass%2Did}/assignments/{educationAssignment%2Did}/publish"
}

impl PublishRequestBuilder {
    /// Publish the assignment to its students.
    pub async fn post(
        &self,
        config: Option<&RequestConfiguration>,
    ) -> Result<Option<EducationAssignment>> {
        let info = self.to_post_request_information(config)?;
        self.base
            .send(info, EducationAssignment::create_from_discriminator_value, config)
            .await
    }

    /// Assemble the `POST` request.
    pub fn to_post_request_information(
        &self,
        config: Option<&RequestConfiguration>,
    ) -> Result<RequestInformation> {
        self.base.request_information(Method::Post, config)
    }
}
