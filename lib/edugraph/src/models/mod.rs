//! Education models.
//!
//! Each model implements [`Parsable`] and [`ModelFactory`], which is what the request
//! builders hand to the adapter to materialize a response body.

mod education;
mod enums;
mod odata_error;
mod responses;

pub use education::{
    AnyEducationOrganization, EducationAssignment, EducationCategory, EducationClass,
    EducationOrganization, EducationRoot, EducationSchool, EducationSubmission, EducationUser,
};
pub use enums::{
    EducationAssignmentStatus, EducationExternalSource, EducationSubmissionStatus,
    EducationUserRole,
};
pub use odata_error::{ErrorDetails, InnerError, MainError, ODataError, odata_error_mappings};
#[allow(deprecated)]
pub use responses::{
    ClassesItemAssignmentCategoriesDeltaResponse, MeAssignmentsDeltaResponse, SchoolsDeltaResponse,
    UsersDeltaResponse,
};
pub use responses::{
    ClassesItemAssignmentCategoriesDeltaGetResponse, CollectionResponse, DeltaGetResponse,
    EducationAssignmentCollectionResponse, EducationCategoryCollectionResponse,
    EducationClassCollectionResponse, EducationSchoolCollectionResponse,
    EducationSubmissionCollectionResponse, EducationUserCollectionResponse,
    MeAssignmentsDeltaGetResponse, SchoolsDeltaGetResponse, UsersDeltaGetResponse,
};

use crate::{Parsable, ParseNode, Result};

/// A model that can be built from a parse node, resolving `@odata.type` when the
/// model heads a polymorphic family.
pub trait ModelFactory: Parsable + Sized {
    /// Build the model from `node`.
    fn create_from_discriminator_value(node: &dyn ParseNode) -> Result<Self>;
}
