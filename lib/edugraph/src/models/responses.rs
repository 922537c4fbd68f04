//! Collection pages, delta pages and the deprecated delta response names.

use std::ops::{Deref, DerefMut};

use edugraph_core::serialization::{AdditionalData, FieldDeserializers, field, parse_object};

use super::ModelFactory;
use super::education::{EducationAssignment, EducationCategory, EducationSchool, EducationUser};
use crate::{Parsable, ParseNode, Result, SerializationWriter};

/// One page of a collection: `value`, `@odata.count` and `@odata.nextLink`.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionResponse<T> {
    /// Items of the page.
    pub value: Option<Vec<T>>,
    /// Total count, present when `$count=true` was requested.
    pub odata_count: Option<i64>,
    /// Link to the next page.
    pub odata_next_link: Option<String>,
    /// Undeclared properties.
    pub additional_data: AdditionalData,
}

impl<T> Default for CollectionResponse<T> {
    fn default() -> Self {
        Self {
            value: None,
            odata_count: None,
            odata_next_link: None,
            additional_data: AdditionalData::new(),
        }
    }
}

impl<T> CollectionResponse<T> {
    /// Items of the page, empty when absent.
    #[must_use]
    pub fn items(&self) -> &[T] {
        self.value.as_deref().unwrap_or_default()
    }
}

impl<T: ModelFactory> ModelFactory for CollectionResponse<T> {
    fn create_from_discriminator_value(node: &dyn ParseNode) -> Result<Self> {
        parse_object(node)
    }
}

impl<T: ModelFactory> Parsable for CollectionResponse<T> {
    fn field_deserializers() -> FieldDeserializers<Self> {
        vec![
            field("value", |page: &mut Self, node| {
                page.value = node.collection_of_object_values(T::create_from_discriminator_value)?;
                Ok(())
            }),
            field("@odata.count", |page: &mut Self, node| {
                page.odata_count = node.i64_value()?;
                Ok(())
            }),
            field("@odata.nextLink", |page: &mut Self, node| {
                page.odata_next_link = node.string_value()?;
                Ok(())
            }),
        ]
    }

    fn serialize(&self, writer: &mut dyn SerializationWriter) -> Result<()> {
        writer.write_i64_value(Some("@odata.count"), self.odata_count)?;
        writer.write_string_value(Some("@odata.nextLink"), self.odata_next_link.as_deref())?;
        writer.write_collection_of_objects(Some("value"), self.value.as_deref())?;
        writer.write_additional_data(&self.additional_data)
    }

    fn additional_data(&self) -> &AdditionalData {
        &self.additional_data
    }

    fn additional_data_mut(&mut self) -> &mut AdditionalData {
        &mut self.additional_data
    }
}

/// One page of a delta query: `value`, `@odata.nextLink` and, on the last page,
/// `@odata.deltaLink`.
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaGetResponse<T> {
    /// Changed items.
    pub value: Option<Vec<T>>,
    /// Link to the next page.
    pub odata_next_link: Option<String>,
    /// Link for the next round of changes.
    pub odata_delta_link: Option<String>,
    /// Undeclared properties.
    pub additional_data: AdditionalData,
}

impl<T> Default for DeltaGetResponse<T> {
    fn default() -> Self {
        Self {
            value: None,
            odata_next_link: None,
            odata_delta_link: None,
            additional_data: AdditionalData::new(),
        }
    }
}

impl<T> DeltaGetResponse<T> {
    /// Changed items, empty when absent.
    #[must_use]
    pub fn items(&self) -> &[T] {
        self.value.as_deref().unwrap_or_default()
    }
}

impl<T: ModelFactory> ModelFactory for DeltaGetResponse<T> {
    fn create_from_discriminator_value(node: &dyn ParseNode) -> Result<Self> {
        parse_object(node)
    }
}

impl<T: ModelFactory> Parsable for DeltaGetResponse<T> {
    fn field_deserializers() -> FieldDeserializers<Self> {
        vec![
            field("value", |page: &mut Self, node| {
                page.value = node.collection_of_object_values(T::create_from_discriminator_value)?;
                Ok(())
            }),
            field("@odata.nextLink", |page: &mut Self, node| {
                page.odata_next_link = node.string_value()?;
                Ok(())
            }),
            field("@odata.deltaLink", |page: &mut Self, node| {
                page.odata_delta_link = node.string_value()?;
                Ok(())
            }),
        ]
    }

    fn serialize(&self, writer: &mut dyn SerializationWriter) -> Result<()> {
        writer.write_string_value(Some("@odata.deltaLink"), self.odata_delta_link.as_deref())?;
        writer.write_string_value(Some("@odata.nextLink"), self.odata_next_link.as_deref())?;
        writer.write_collection_of_objects(Some("value"), self.value.as_deref())?;
        writer.write_additional_data(&self.additional_data)
    }

    fn additional_data(&self) -> &AdditionalData {
        &self.additional_data
    }

    fn additional_data_mut(&mut self) -> &mut AdditionalData {
        &mut self.additional_data
    }
}

/// Delta page of `/education/classes/{id}/assignmentCategories/delta()`.
pub type ClassesItemAssignmentCategoriesDeltaGetResponse = DeltaGetResponse<EducationCategory>;
/// Delta page of `/education/me/assignments/delta()`.
pub type MeAssignmentsDeltaGetResponse = DeltaGetResponse<EducationAssignment>;
/// Delta page of `/education/schools/delta()`.
pub type SchoolsDeltaGetResponse = DeltaGetResponse<EducationSchool>;
/// Delta page of `/education/users/delta()`.
pub type UsersDeltaGetResponse = DeltaGetResponse<EducationUser>;

/// Collection page of classes.
pub type EducationClassCollectionResponse = CollectionResponse<super::EducationClass>;
/// Collection page of categories.
pub type EducationCategoryCollectionResponse = CollectionResponse<EducationCategory>;
/// Collection page of assignments.
pub type EducationAssignmentCollectionResponse = CollectionResponse<EducationAssignment>;
/// Collection page of submissions.
pub type EducationSubmissionCollectionResponse = CollectionResponse<super::EducationSubmission>;
/// Collection page of schools.
pub type EducationSchoolCollectionResponse = CollectionResponse<EducationSchool>;
/// Collection page of users.
pub type EducationUserCollectionResponse = CollectionResponse<EducationUser>;

/// Declares a deprecated wrapper that behaves exactly like its replacement.
///
/// Deserialization goes through the replacement's factory, so a body read as the
/// wrapper equals the same body read as the replacement.
macro_rules! deprecated_delta_response {
    ($(#[$meta:meta])* $name:ident => $replacement:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name(pub $replacement);

        #[allow(deprecated)]
        impl $name {
            /// Unwrap into the replacement type.
            #[must_use]
            pub fn into_inner(self) -> $replacement {
                self.0
            }
        }

        #[allow(deprecated)]
        impl Deref for $name {
            type Target = $replacement;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        #[allow(deprecated)]
        impl DerefMut for $name {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.0
            }
        }

        #[allow(deprecated)]
        impl From<$replacement> for $name {
            fn from(response: $replacement) -> Self {
                Self(response)
            }
        }

        #[allow(deprecated)]
        impl From<$name> for $replacement {
            fn from(response: $name) -> Self {
                response.0
            }
        }

        #[allow(deprecated)]
        impl ModelFactory for $name {
            fn create_from_discriminator_value(node: &dyn ParseNode) -> Result<Self> {
                $replacement::create_from_discriminator_value(node).map(Self)
            }
        }

        #[allow(deprecated)]
        impl Parsable for $name {
            fn field_deserializers() -> FieldDeserializers<Self> {
                edugraph_core::serialization::inherit(
                    $replacement::field_deserializers(),
                    |response: &mut Self| &mut response.0,
                )
            }

            fn serialize(&self, writer: &mut dyn SerializationWriter) -> Result<()> {
                self.0.serialize(writer)
            }

            fn additional_data(&self) -> &AdditionalData {
                self.0.additional_data()
            }

            fn additional_data_mut(&mut self) -> &mut AdditionalData {
                self.0.additional_data_mut()
            }
        }
    };
}

deprecated_delta_response! {
    /// Former name of the assignment category delta page.
    #[deprecated(note = "Use ClassesItemAssignmentCategoriesDeltaGetResponse instead.")]
    ClassesItemAssignmentCategoriesDeltaResponse => ClassesItemAssignmentCategoriesDeltaGetResponse
}

deprecated_delta_response! {
    /// Former name of the signed-in user's assignment delta page.
    #[deprecated(note = "Use MeAssignmentsDeltaGetResponse instead.")]
    MeAssignmentsDeltaResponse => MeAssignmentsDeltaGetResponse
}

deprecated_delta_response! {
    /// Former name of the school delta page.
    #[deprecated(note = "Use SchoolsDeltaGetResponse instead.")]
    SchoolsDeltaResponse => SchoolsDeltaGetResponse
}

deprecated_delta_response! {
    /// Former name of the user delta page.
    #[deprecated(note = "Use UsersDeltaGetResponse instead.")]
    UsersDeltaResponse => UsersDeltaGetResponse
}
