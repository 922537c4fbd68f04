//! `/education/me`: the signed-in user, their assignments and submissions.

#[allow(deprecated)]
use crate::models::MeAssignmentsDeltaResponse;
use crate::models::{
    EducationAssignment, EducationAssignmentCollectionResponse, EducationSubmission,
    EducationSubmissionCollectionResponse, EducationUser, MeAssignmentsDeltaGetResponse,
    ModelFactory,
};
use crate::{
    CollectionRequestConfiguration, ItemRequestConfiguration, Method, RequestConfiguration,
    RequestInformation, Result,
};

const ASSIGNMENT_ID: &str = "educationAssignment%2Did";
const SUBMISSION_ID: &str = "educationSubmission%2Did";

request_builder! {
    /// `/education/me`
    MeRequestBuilder => "{+baseurl}/education/me{?%24expand,%24select}"
}

impl MeRequestBuilder {
    /// `/education/me/assignments`
    #[must_use]
    pub fn assignments(&self) -> MeAssignmentsRequestBuilder {
        MeAssignmentsRequestBuilder::navigate_from(&self.base)
    }

    /// Read the signed-in user.
    pub async fn get(
        &self,
        config: Option<&ItemRequestConfiguration>,
    ) -> Result<Option<EducationUser>> {
        let info = self.to_get_request_information(config)?;
        self.base
            .send(info, EducationUser::create_from_discriminator_value, config)
            .await
    }

    /// Update the signed-in user.
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
}

// ============================================================================
// Assignments
// ============================================================================

request_builder! {
    /// `/education/me/assignments`
    MeAssignmentsRequestBuilder => "{+baseurl}/education/me/assignments{?%24count,%24expand,%24filter,%24orderby,%24search,%24select,%24skip,%24top}"
}

impl MeAssignmentsRequestBuilder {
    /// `…/assignments/{educationAssignment-id}`
    #[must_use]
    pub fn by_education_assignment_id(&self, id: impl Into<String>) -> MeAssignmentItemRequestBuilder {
        MeAssignmentItemRequestBuilder::child_of(&self.base, ASSIGNMENT_ID, id.into())
    }

    /// `…/assignments/delta()`
    #[must_use]
    pub fn delta(&self) -> MeAssignmentsDeltaRequestBuilder {
        MeAssignmentsDeltaRequestBuilder::navigate_from(&self.base)
    }

    /// List the signed-in user's assignments.
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

    /// Assemble the `GET` request.
    pub fn to_get_request_information(
        &self,
        config: Option<&CollectionRequestConfiguration>,
    ) -> Result<RequestInformation> {
        self.base.request_information(Method::Get, config)
    }
}

request_builder! {
    /// `/education/me/assignments/delta()`
    MeAssignmentsDeltaRequestBuilder => "{+baseurl}/education/me/assignments/delta(){?%24count,%24expand,%24filter,%24orderby,%24search,%24select,%24skip,%24top}"
}

impl MeAssignmentsDeltaRequestBuilder {
    /// Read the assignments changed since the last delta round.
    pub async fn get_as_delta_get_response(
        &self,
        config: Option<&CollectionRequestConfiguration>,
    ) -> Result<Option<MeAssignmentsDeltaGetResponse>> {
        let info = self.to_get_request_information(config)?;
        self.base
            .send(
                info,
                MeAssignmentsDeltaGetResponse::create_from_discriminator_value,
                config,
            )
            .await
    }

    /// Read the assignments changed since the last delta round, under the former response name.
    #[deprecated(note = "Use get_as_delta_get_response instead.")]
    #[allow(deprecated)]
    pub async fn get(
        &self,
        config: Option<&CollectionRequestConfiguration>,
    ) -> Result<Option<MeAssignmentsDeltaResponse>> {
        let info = self.to_get_request_information(config)?;
        self.base
            .send(
                info,
                MeAssignmentsDeltaResponse::create_from_discriminator_value,
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
    /// `/education/me/assignments/{educationAssignment-id}`
    MeAssignmentItemRequestBuilder => "{+baseurl}/education/me/assignments/{educationAssignment%2Did}{?%24expand,%24select}"
}

impl MeAssignmentItemRequestBuilder {
    /// `…/submissions`
    #[must_use]
    pub fn submissions(&self) -> SubmissionsRequestBuilder {
        SubmissionsRequestBuilder::navigate_from(&self.base)
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

    /// Assemble the `GET` request.
    pub fn to_get_request_information(
        &self,
        config: Option<&ItemRequestConfiguration>,
    ) -> Result<RequestInformation> {
        self.base.request_information(Method::Get, config)
    }
}

// ============================================================================
// Submissions
// ============================================================================

request_builder! {
    /// `/education/me/assignments/{educationAssignment-id}/submissions`
    SubmissionsRequestBuilder => "{+baseurl}/education/me/assignments/{educationAssignment%2Did}/submissions{?%24count,%24expand,%24filter,%24orderby,%24search,%24select,%24skip,%24top}"
}

impl SubmissionsRequestBuilder {
    /// `…/submissions/{educationSubmission-id}`
    #[must_use]
    pub fn by_education_submission_id(&self, id: impl Into<String>) -> SubmissionItemRequestBuilder {
        SubmissionItemRequestBuilder::child_of(&self.base, SUBMISSION_ID, id.into())
    }

    /// List the submissions of the assignment.
    pub async fn get(
        &self,
        config: Option<&CollectionRequestConfiguration>,
    ) -> Result<Option<EducationSubmissionCollectionResponse>> {
        let info = self.to_get_request_information(config)?;
        self.base
            .send(
                info,
                EducationSubmissionCollectionResponse::create_from_discriminator_value,
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
    /// `/education/me/assignments/{educationAssignment-id}/submissions/{educationSubmission-id}`
    SubmissionItemRequestBuilder => "{+baseurl}/education/me/assignments/{educationAssignment%2Did}/submissions/{educationSubmission%2Did}{?%24expand,%24select}"
}

impl SubmissionItemRequestBuilder {
    /// `…/excuse`
    #[must_use]
    pub fn excuse(&self) -> ExcuseRequestBuilder {
        ExcuseRequestBuilder::navigate_from(&self.base)
    }

    /// `…/submit`
    #[must_use]
    pub fn submit(&self) -> SubmitRequestBuilder {
        SubmitRequestBuilder::navigate_from(&self.base)
    }

    /// `…/return`
    #[must_use]
    pub fn r#return(&self) -> ReturnRequestBuilder {
        ReturnRequestBuilder::navigate_from(&self.base)
    }

    /// `…/unsubmit`
    #[must_use]
    pub fn unsubmit(&self) -> UnsubmitRequestBuilder {
        UnsubmitRequestBuilder::navigate_from(&self.base)
    }

    /// Read the submission.
    pub async fn get(
        &self,
        config: Option<&ItemRequestConfiguration>,
    ) -> Result<Option<EducationSubmission>> {
        let info = self.to_get_request_information(config)?;
        self.base
            .send(info, EducationSubmission::create_from_discriminator_value, config)
            .await
    }

    /// Update the submission.
    pub async fn patch(
        &self,
        body: &EducationSubmission,
        config: Option<&RequestConfiguration>,
    ) -> Result<Option<EducationSubmission>> {
        let info = self.to_patch_request_information(body, config)?;
        self.base
            .send(info, EducationSubmission::create_from_discriminator_value, config)
            .await
    }

    /// Delete the submission.
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
        body: &EducationSubmission,
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

/// Declares a submission action: `POST` without a body, answering with the submission.
macro_rules! submission_action {
    ($(#[$meta:meta])* $name:ident => $template:literal) => {
        request_builder! {
            $(#[$meta])*
            $name => $template
        }

        impl $name {
            /// Invoke the action.
            pub async fn post(
                &self,
                config: Option<&RequestConfiguration>,
            ) -> Result<Option<EducationSubmission>> {
                let info = self.to_post_request_information(config)?;
                self.base
                    .send(info, EducationSubmission::create_from_discriminator_value, config)
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
    };
}

submission_action! {
    /// `…/submissions/{educationSubmission-id}/excuse`
    ExcuseRequestBuilder => "{+baseurl}/education/me/assignments/{educationAssignment%2Did}/submissions/{educationSubmission%2Did}/excuse"
}

submission_action! {
    /// `…/submissions/{educationSubmission-id}/submit`
    SubmitRequestBuilder => "{+baseurl}/education/me/assignments/{educationAssignment%2Did}/submissions/{educationSubmission%2Did}/submit"
}

submission_action! {
    /// `…/submissions/{educationSubmission-id}/return`
    ReturnRequestBuilder => "{+baseurl}/education/me/assignments/{educationAssignment%2Did}/submissions/{educationSubmission%2Did}/return"
}

submission_action! {
    /// `…/submissions/{educationSubmission-id}/unsubmit`
    UnsubmitRequestBuilder => "{+baseurl}/education/me/assignments/{educationAssignment%2Did}/submissions/{educationSubmission%2Did}/unsubmit"
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use assert2::{check, let_assert};

    use super::*;
    use crate::{HyperRequestAdapter, ParameterMap};

    fn submission() -> SubmissionItemRequestBuilder {
        let mut params = ParameterMap::new();
        params.insert("baseurl".into(), "https://graph.example/v1.0".into());
        MeRequestBuilder::new(Arc::new(HyperRequestAdapter::default()), &params)
            .assignments()
            .by_education_assignment_id("a1")
            .submissions()
            .by_education_submission_id("s1")
    }

    #[test]
    fn actions_post_without_body() {
        let base = "https://graph.example/v1.0/education/me/assignments/a1/submissions/s1";
        let cases = [
            (submission().excuse().to_post_request_information(None), "excuse"),
            (submission().submit().to_post_request_information(None), "submit"),
            (submission().r#return().to_post_request_information(None), "return"),
            (submission().unsubmit().to_post_request_information(None), "unsubmit"),
        ];
        for (info, action) in cases {
            let_assert!(Ok(mut info) = info);
            check!(info.method() == Method::Post);
            check!(info.content().is_none());
            let_assert!(Ok(url) = info.url());
            check!(url.as_str() == format!("{base}/{action}"));
        }
    }

    #[test]
    fn raw_url_keeps_endpoint_shape() {
        let next = submission().with_url("https://graph.example/v1.0/next");
        check!(next.base().url_template() == SubmissionItemRequestBuilder::URL_TEMPLATE);
        let_assert!(Ok(mut info) = next.to_get_request_information(None));
        let_assert!(Ok(url) = info.url());
        check!(url.as_str() == "https://graph.example/v1.0/next");
    }
}
