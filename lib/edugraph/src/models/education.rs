//! Education entities.
//!
//! Date-time properties are kept as their ISO 8601 wire strings.

use edugraph_core::serialization::{
    AdditionalData, DiscriminatorTable, FieldDeserializers, ODATA_TYPE_KEY, field, inherit,
    parse_object, resolve_discriminator,
};

use super::enums::{
    EducationAssignmentStatus, EducationExternalSource, EducationSubmissionStatus,
    EducationUserRole,
};
use super::ModelFactory;
use crate::{Parsable, ParseNode, Result, SerializationWriter};

// ============================================================================
// Root
// ============================================================================

/// The `/education` singleton.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EducationRoot {
    /// Classes.
    pub classes: Option<Vec<EducationClass>>,
    /// The signed-in user.
    pub me: Option<EducationUser>,
    /// Schools.
    pub schools: Option<Vec<EducationSchool>>,
    /// Users.
    pub users: Option<Vec<EducationUser>>,
    /// Undeclared properties.
    pub additional_data: AdditionalData,
}

impl ModelFactory for EducationRoot {
    fn create_from_discriminator_value(node: &dyn ParseNode) -> Result<Self> {
        parse_object(node)
    }
}

impl Parsable for EducationRoot {
    fn field_deserializers() -> FieldDeserializers<Self> {
        vec![
            field("classes", |root: &mut Self, node| {
                root.classes =
                    node.collection_of_object_values(EducationClass::create_from_discriminator_value)?;
                Ok(())
            }),
            field("me", |root: &mut Self, node| {
                root.me = node.object_value(EducationUser::create_from_discriminator_value)?;
                Ok(())
            }),
            field("schools", |root: &mut Self, node| {
                root.schools = node
                    .collection_of_object_values(EducationSchool::create_from_discriminator_value)?;
                Ok(())
            }),
            field("users", |root: &mut Self, node| {
                root.users =
                    node.collection_of_object_values(EducationUser::create_from_discriminator_value)?;
                Ok(())
            }),
        ]
    }

    fn serialize(&self, writer: &mut dyn SerializationWriter) -> Result<()> {
        writer.write_collection_of_objects(Some("classes"), self.classes.as_deref())?;
        writer.write_object(Some("me"), self.me.as_ref())?;
        writer.write_collection_of_objects(Some("schools"), self.schools.as_deref())?;
        writer.write_collection_of_objects(Some("users"), self.users.as_deref())?;
        writer.write_additional_data(&self.additional_data)
    }

    fn additional_data(&self) -> &AdditionalData {
        &self.additional_data
    }

    fn additional_data_mut(&mut self) -> &mut AdditionalData {
        &mut self.additional_data
    }
}

// ============================================================================
// Classes
// ============================================================================

/// A class within a school.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EducationClass {
    /// Identifier.
    pub id: Option<String>,
    /// Class code used by the school.
    pub class_code: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Display name.
    pub display_name: Option<String>,
    /// Identifier in the syncing system.
    pub external_id: Option<String>,
    /// Name in the syncing system.
    pub external_name: Option<String>,
    /// How the class was created.
    pub external_source: Option<EducationExternalSource>,
    /// Name of the syncing source.
    pub external_source_detail: Option<String>,
    /// Grade level.
    pub grade: Option<String>,
    /// Mail nickname of the class group.
    pub mail_nickname: Option<String>,
    /// Assignment categories.
    pub assignment_categories: Option<Vec<EducationCategory>>,
    /// Assignments.
    pub assignments: Option<Vec<EducationAssignment>>,
    /// Undeclared properties.
    pub additional_data: AdditionalData,
}

impl ModelFactory for EducationClass {
    fn create_from_discriminator_value(node: &dyn ParseNode) -> Result<Self> {
        parse_object(node)
    }
}

impl Parsable for EducationClass {
    fn field_deserializers() -> FieldDeserializers<Self> {
        vec![
            field("id", |class: &mut Self, node| {
                class.id = node.string_value()?;
                Ok(())
            }),
            field("classCode", |class: &mut Self, node| {
                class.class_code = node.string_value()?;
                Ok(())
            }),
            field("description", |class: &mut Self, node| {
                class.description = node.string_value()?;
                Ok(())
            }),
            field("displayName", |class: &mut Self, node| {
                class.display_name = node.string_value()?;
                Ok(())
            }),
            field("externalId", |class: &mut Self, node| {
                class.external_id = node.string_value()?;
                Ok(())
            }),
            field("externalName", |class: &mut Self, node| {
                class.external_name = node.string_value()?;
                Ok(())
            }),
            field("externalSource", |class: &mut Self, node| {
                class.external_source = node.enum_value_of()?;
                Ok(())
            }),
            field("externalSourceDetail", |class: &mut Self, node| {
                class.external_source_detail = node.string_value()?;
                Ok(())
            }),
            field("grade", |class: &mut Self, node| {
                class.grade = node.string_value()?;
                Ok(())
            }),
            field("mailNickname", |class: &mut Self, node| {
                class.mail_nickname = node.string_value()?;
                Ok(())
            }),
            field("assignmentCategories", |class: &mut Self, node| {
                class.assignment_categories = node
                    .collection_of_object_values(EducationCategory::create_from_discriminator_value)?;
                Ok(())
            }),
            field("assignments", |class: &mut Self, node| {
                class.assignments = node.collection_of_object_values(
                    EducationAssignment::create_from_discriminator_value,
                )?;
                Ok(())
            }),
        ]
    }

    fn serialize(&self, writer: &mut dyn SerializationWriter) -> Result<()> {
        writer.write_string_value(Some("id"), self.id.as_deref())?;
        writer.write_string_value(Some("classCode"), self.class_code.as_deref())?;
        writer.write_string_value(Some("description"), self.description.as_deref())?;
        writer.write_string_value(Some("displayName"), self.display_name.as_deref())?;
        writer.write_string_value(Some("externalId"), self.external_id.as_deref())?;
        writer.write_string_value(Some("externalName"), self.external_name.as_deref())?;
        writer.write_enum_value(Some("externalSource"), self.external_source.as_ref())?;
        writer.write_string_value(
            Some("externalSourceDetail"),
            self.external_source_detail.as_deref(),
        )?;
        writer.write_string_value(Some("grade"), self.grade.as_deref())?;
        writer.write_string_value(Some("mailNickname"), self.mail_nickname.as_deref())?;
        writer.write_collection_of_objects(
            Some("assignmentCategories"),
            self.assignment_categories.as_deref(),
        )?;
        writer.write_collection_of_objects(Some("assignments"), self.assignments.as_deref())?;
        writer.write_additional_data(&self.additional_data)
    }

    fn additional_data(&self) -> &AdditionalData {
        &self.additional_data
    }

    fn additional_data_mut(&mut self) -> &mut AdditionalData {
        &mut self.additional_data
    }
}

/// An assignment category of a class.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EducationCategory {
    /// Identifier.
    pub id: Option<String>,
    /// Display name.
    pub display_name: Option<String>,
    /// Undeclared properties.
    pub additional_data: AdditionalData,
}

impl ModelFactory for EducationCategory {
    fn create_from_discriminator_value(node: &dyn ParseNode) -> Result<Self> {
        parse_object(node)
    }
}

impl Parsable for EducationCategory {
    fn field_deserializers() -> FieldDeserializers<Self> {
        vec![
            field("id", |category: &mut Self, node| {
                category.id = node.string_value()?;
                Ok(())
            }),
            field("displayName", |category: &mut Self, node| {
                category.display_name = node.string_value()?;
                Ok(())
            }),
        ]
    }

    fn serialize(&self, writer: &mut dyn SerializationWriter) -> Result<()> {
        writer.write_string_value(Some("id"), self.id.as_deref())?;
        writer.write_string_value(Some("displayName"), self.display_name.as_deref())?;
        writer.write_additional_data(&self.additional_data)
    }

    fn additional_data(&self) -> &AdditionalData {
        &self.additional_data
    }

    fn additional_data_mut(&mut self) -> &mut AdditionalData {
        &mut self.additional_data
    }
}

// ============================================================================
// Assignments and submissions
// ============================================================================

/// An assignment of a class.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EducationAssignment {
    /// Identifier.
    pub id: Option<String>,
    /// Whether late submissions are accepted.
    pub allow_late_submissions: Option<bool>,
    /// Whether students may add resources.
    pub allow_students_to_add_resources_to_submission: Option<bool>,
    /// When the assignment becomes visible.
    pub assign_date_time: Option<String>,
    /// When the assignment was published.
    pub assigned_date_time: Option<String>,
    /// Owning class.
    pub class_id: Option<String>,
    /// When submissions close.
    pub close_date_time: Option<String>,
    /// Creation time.
    pub created_date_time: Option<String>,
    /// Display name.
    pub display_name: Option<String>,
    /// Due date.
    pub due_date_time: Option<String>,
    /// Last modification time.
    pub last_modified_date_time: Option<String>,
    /// Lifecycle status.
    pub status: Option<EducationAssignmentStatus>,
    /// Deep link.
    pub web_url: Option<String>,
    /// Categories.
    pub categories: Option<Vec<EducationCategory>>,
    /// Submissions.
    pub submissions: Option<Vec<EducationSubmission>>,
    /// Undeclared properties.
    pub additional_data: AdditionalData,
}

impl ModelFactory for EducationAssignment {
    fn create_from_discriminator_value(node: &dyn ParseNode) -> Result<Self> {
        parse_object(node)
    }
}

impl Parsable for EducationAssignment {
    fn field_deserializers() -> FieldDeserializers<Self> {
        vec![
            field("id", |assignment: &mut Self, node| {
                assignment.id = node.string_value()?;
                Ok(())
            }),
            field("allowLateSubmissions", |assignment: &mut Self, node| {
                assignment.allow_late_submissions = node.bool_value()?;
                Ok(())
            }),
            field(
                "allowStudentsToAddResourcesToSubmission",
                |assignment: &mut Self, node| {
                    assignment.allow_students_to_add_resources_to_submission = node.bool_value()?;
                    Ok(())
                },
            ),
            field("assignDateTime", |assignment: &mut Self, node| {
                assignment.assign_date_time = node.string_value()?;
                Ok(())
            }),
            field("assignedDateTime", |assignment: &mut Self, node| {
                assignment.assigned_date_time = node.string_value()?;
                Ok(())
            }),
            field("classId", |assignment: &mut Self, node| {
                assignment.class_id = node.string_value()?;
                Ok(())
            }),
            field("closeDateTime", |assignment: &mut Self, node| {
                assignment.close_date_time = node.string_value()?;
                Ok(())
            }),
            field("createdDateTime", |assignment: &mut Self, node| {
                assignment.created_date_time = node.string_value()?;
                Ok(())
            }),
            field("displayName", |assignment: &mut Self, node| {
                assignment.display_name = node.string_value()?;
                Ok(())
            }),
            field("dueDateTime", |assignment: &mut Self, node| {
                assignment.due_date_time = node.string_value()?;
                Ok(())
            }),
            field("lastModifiedDateTime", |assignment: &mut Self, node| {
                assignment.last_modified_date_time = node.string_value()?;
                Ok(())
            }),
            field("status", |assignment: &mut Self, node| {
                assignment.status = node.enum_value_of()?;
                Ok(())
            }),
            field("webUrl", |assignment: &mut Self, node| {
                assignment.web_url = node.string_value()?;
                Ok(())
            }),
            field("categories", |assignment: &mut Self, node| {
                assignment.categories = node
                    .collection_of_object_values(EducationCategory::create_from_discriminator_value)?;
                Ok(())
            }),
            field("submissions", |assignment: &mut Self, node| {
                assignment.submissions = node.collection_of_object_values(
                    EducationSubmission::create_from_discriminator_value,
                )?;
                Ok(())
            }),
        ]
    }

    fn serialize(&self, writer: &mut dyn SerializationWriter) -> Result<()> {
        writer.write_string_value(Some("id"), self.id.as_deref())?;
        writer.write_bool_value(Some("allowLateSubmissions"), self.allow_late_submissions)?;
        writer.write_bool_value(
            Some("allowStudentsToAddResourcesToSubmission"),
            self.allow_students_to_add_resources_to_submission,
        )?;
        writer.write_string_value(Some("assignDateTime"), self.assign_date_time.as_deref())?;
        writer.write_string_value(Some("assignedDateTime"), self.assigned_date_time.as_deref())?;
        writer.write_string_value(Some("classId"), self.class_id.as_deref())?;
        writer.write_string_value(Some("closeDateTime"), self.close_date_time.as_deref())?;
        writer.write_string_value(Some("createdDateTime"), self.created_date_time.as_deref())?;
        writer.write_string_value(Some("displayName"), self.display_name.as_deref())?;
        writer.write_string_value(Some("dueDateTime"), self.due_date_time.as_deref())?;
        writer.write_string_value(
            Some("lastModifiedDateTime"),
            self.last_modified_date_time.as_deref(),
        )?;
        writer.write_enum_value(Some("status"), self.status.as_ref())?;
        writer.write_string_value(Some("webUrl"), self.web_url.as_deref())?;
        writer.write_collection_of_objects(Some("categories"), self.categories.as_deref())?;
        writer.write_collection_of_objects(Some("submissions"), self.submissions.as_deref())?;
        writer.write_additional_data(&self.additional_data)
    }

    fn additional_data(&self) -> &AdditionalData {
        &self.additional_data
    }

    fn additional_data_mut(&mut self) -> &mut AdditionalData {
        &mut self.additional_data
    }
}

/// A student's submission for an assignment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EducationSubmission {
    /// Identifier.
    pub id: Option<String>,
    /// When the submission was excused.
    pub excused_date_time: Option<String>,
    /// When the submission was reassigned.
    pub reassigned_date_time: Option<String>,
    /// Folder holding the submission resources.
    pub resources_folder_url: Option<String>,
    /// When the submission was returned.
    pub returned_date_time: Option<String>,
    /// Lifecycle status.
    pub status: Option<EducationSubmissionStatus>,
    /// When the submission was turned in.
    pub submitted_date_time: Option<String>,
    /// When the submission was moved back to working.
    pub unsubmitted_date_time: Option<String>,
    /// Deep link.
    pub web_url: Option<String>,
    /// Undeclared properties.
    pub additional_data: AdditionalData,
}

impl ModelFactory for EducationSubmission {
    fn create_from_discriminator_value(node: &dyn ParseNode) -> Result<Self> {
        parse_object(node)
    }
}

impl Parsable for EducationSubmission {
    fn field_deserializers() -> FieldDeserializers<Self> {
        vec![
            field("id", |submission: &mut Self, node| {
                submission.id = node.string_value()?;
                Ok(())
            }),
            field("excusedDateTime", |submission: &mut Self, node| {
                submission.excused_date_time = node.string_value()?;
                Ok(())
            }),
            field("reassignedDateTime", |submission: &mut Self, node| {
                submission.reassigned_date_time = node.string_value()?;
                Ok(())
            }),
            field("resourcesFolderUrl", |submission: &mut Self, node| {
                submission.resources_folder_url = node.string_value()?;
                Ok(())
            }),
            field("returnedDateTime", |submission: &mut Self, node| {
                submission.returned_date_time = node.string_value()?;
                Ok(())
            }),
            field("status", |submission: &mut Self, node| {
                submission.status = node.enum_value_of()?;
                Ok(())
            }),
            field("submittedDateTime", |submission: &mut Self, node| {
                submission.submitted_date_time = node.string_value()?;
                Ok(())
            }),
            field("unsubmittedDateTime", |submission: &mut Self, node| {
                submission.unsubmitted_date_time = node.string_value()?;
                Ok(())
            }),
            field("webUrl", |submission: &mut Self, node| {
                submission.web_url = node.string_value()?;
                Ok(())
            }),
        ]
    }

    fn serialize(&self, writer: &mut dyn SerializationWriter) -> Result<()> {
        writer.write_string_value(Some("id"), self.id.as_deref())?;
        writer.write_string_value(Some("excusedDateTime"), self.excused_date_time.as_deref())?;
        writer.write_string_value(
            Some("reassignedDateTime"),
            self.reassigned_date_time.as_deref(),
        )?;
        writer.write_string_value(
            Some("resourcesFolderUrl"),
            self.resources_folder_url.as_deref(),
        )?;
        writer.write_string_value(Some("returnedDateTime"), self.returned_date_time.as_deref())?;
        writer.write_enum_value(Some("status"), self.status.as_ref())?;
        writer.write_string_value(
            Some("submittedDateTime"),
            self.submitted_date_time.as_deref(),
        )?;
        writer.write_string_value(
            Some("unsubmittedDateTime"),
            self.unsubmitted_date_time.as_deref(),
        )?;
        writer.write_string_value(Some("webUrl"), self.web_url.as_deref())?;
        writer.write_additional_data(&self.additional_data)
    }

    fn additional_data(&self) -> &AdditionalData {
        &self.additional_data
    }

    fn additional_data_mut(&mut self) -> &mut AdditionalData {
        &mut self.additional_data
    }
}

// ============================================================================
// Organizations
// ============================================================================

/// Base of the organization family.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EducationOrganization {
    /// Identifier.
    pub id: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Display name.
    pub display_name: Option<String>,
    /// How the organization was created.
    pub external_source: Option<EducationExternalSource>,
    /// Name of the syncing source.
    pub external_source_detail: Option<String>,
    /// Undeclared properties, including `@odata.type`.
    pub additional_data: AdditionalData,
}

impl EducationOrganization {
    fn write_fields(&self, writer: &mut dyn SerializationWriter) -> Result<()> {
        writer.write_string_value(Some("id"), self.id.as_deref())?;
        writer.write_string_value(Some("description"), self.description.as_deref())?;
        writer.write_string_value(Some("displayName"), self.display_name.as_deref())?;
        writer.write_enum_value(Some("externalSource"), self.external_source.as_ref())?;
        writer.write_string_value(
            Some("externalSourceDetail"),
            self.external_source_detail.as_deref(),
        )
    }
}

impl ModelFactory for EducationOrganization {
    fn create_from_discriminator_value(node: &dyn ParseNode) -> Result<Self> {
        parse_object(node)
    }
}

impl Parsable for EducationOrganization {
    fn field_deserializers() -> FieldDeserializers<Self> {
        vec![
            field("id", |organization: &mut Self, node| {
                organization.id = node.string_value()?;
                Ok(())
            }),
            field("description", |organization: &mut Self, node| {
                organization.description = node.string_value()?;
                Ok(())
            }),
            field("displayName", |organization: &mut Self, node| {
                organization.display_name = node.string_value()?;
                Ok(())
            }),
            field("externalSource", |organization: &mut Self, node| {
                organization.external_source = node.enum_value_of()?;
                Ok(())
            }),
            field("externalSourceDetail", |organization: &mut Self, node| {
                organization.external_source_detail = node.string_value()?;
                Ok(())
            }),
        ]
    }

    fn serialize(&self, writer: &mut dyn SerializationWriter) -> Result<()> {
        self.write_fields(writer)?;
        writer.write_additional_data(&self.additional_data)
    }

    fn additional_data(&self) -> &AdditionalData {
        &self.additional_data
    }

    fn additional_data_mut(&mut self) -> &mut AdditionalData {
        &mut self.additional_data
    }
}

/// A school: `#microsoft.graph.educationSchool`.
#[derive(Debug, Clone, PartialEq)]
pub struct EducationSchool {
    /// Organization properties.
    pub organization: EducationOrganization,
    /// Identifier in the syncing system.
    pub external_id: Option<String>,
    /// Principal id in the syncing system.
    pub external_principal_id: Option<String>,
    /// Fax number.
    pub fax: Option<String>,
    /// Highest grade taught.
    pub highest_grade: Option<String>,
    /// Lowest grade taught.
    pub lowest_grade: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Principal email address.
    pub principal_email: Option<String>,
    /// Principal name.
    pub principal_name: Option<String>,
    /// School number.
    pub school_number: Option<String>,
}

impl Default for EducationSchool {
    /// An empty school whose `@odata.type` is already set.
    fn default() -> Self {
        let mut organization = EducationOrganization::default();
        organization
            .additional_data
            .insert(ODATA_TYPE_KEY.to_string(), Self::ODATA_TYPE.into());
        Self {
            organization,
            external_id: None,
            external_principal_id: None,
            fax: None,
            highest_grade: None,
            lowest_grade: None,
            phone: None,
            principal_email: None,
            principal_name: None,
            school_number: None,
        }
    }
}

impl EducationSchool {
    /// Discriminator written for schools.
    pub const ODATA_TYPE: &'static str = "#microsoft.graph.educationSchool";

    /// Identifier of the school.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.organization.id.as_deref()
    }
}

impl ModelFactory for EducationSchool {
    fn create_from_discriminator_value(node: &dyn ParseNode) -> Result<Self> {
        parse_object(node)
    }
}

impl Parsable for EducationSchool {
    fn field_deserializers() -> FieldDeserializers<Self> {
        let mut fields = inherit(EducationOrganization::field_deserializers(), |school: &mut Self| {
            &mut school.organization
        });
        fields.extend([
            field("externalId", |school: &mut Self, node| {
                school.external_id = node.string_value()?;
                Ok(())
            }),
            field("externalPrincipalId", |school: &mut Self, node| {
                school.external_principal_id = node.string_value()?;
                Ok(())
            }),
            field("fax", |school: &mut Self, node| {
                school.fax = node.string_value()?;
                Ok(())
            }),
            field("highestGrade", |school: &mut Self, node| {
                school.highest_grade = node.string_value()?;
                Ok(())
            }),
            field("lowestGrade", |school: &mut Self, node| {
                school.lowest_grade = node.string_value()?;
                Ok(())
            }),
            field("phone", |school: &mut Self, node| {
                school.phone = node.string_value()?;
                Ok(())
            }),
            field("principalEmail", |school: &mut Self, node| {
                school.principal_email = node.string_value()?;
                Ok(())
            }),
            field("principalName", |school: &mut Self, node| {
                school.principal_name = node.string_value()?;
                Ok(())
            }),
            field("schoolNumber", |school: &mut Self, node| {
                school.school_number = node.string_value()?;
                Ok(())
            }),
        ]);
        fields
    }

    fn serialize(&self, writer: &mut dyn SerializationWriter) -> Result<()> {
        if !self.organization.additional_data.contains_key(ODATA_TYPE_KEY) {
            writer.write_string_value(Some(ODATA_TYPE_KEY), Some(Self::ODATA_TYPE))?;
        }
        self.organization.write_fields(writer)?;
        writer.write_string_value(Some("externalId"), self.external_id.as_deref())?;
        writer.write_string_value(
            Some("externalPrincipalId"),
            self.external_principal_id.as_deref(),
        )?;
        writer.write_string_value(Some("fax"), self.fax.as_deref())?;
        writer.write_string_value(Some("highestGrade"), self.highest_grade.as_deref())?;
        writer.write_string_value(Some("lowestGrade"), self.lowest_grade.as_deref())?;
        writer.write_string_value(Some("phone"), self.phone.as_deref())?;
        writer.write_string_value(Some("principalEmail"), self.principal_email.as_deref())?;
        writer.write_string_value(Some("principalName"), self.principal_name.as_deref())?;
        writer.write_string_value(Some("schoolNumber"), self.school_number.as_deref())?;
        writer.write_additional_data(&self.organization.additional_data)
    }

    fn additional_data(&self) -> &AdditionalData {
        &self.organization.additional_data
    }

    fn additional_data_mut(&mut self) -> &mut AdditionalData {
        &mut self.organization.additional_data
    }
}

/// A member of the organization family, resolved through `@odata.type`.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyEducationOrganization {
    /// The base type, also used for unknown discriminators.
    Organization(EducationOrganization),
    /// `#microsoft.graph.educationSchool`.
    School(EducationSchool),
}

impl Default for AnyEducationOrganization {
    fn default() -> Self {
        Self::Organization(EducationOrganization::default())
    }
}

const ORGANIZATION_TYPES: DiscriminatorTable<AnyEducationOrganization> =
    &[("microsoft.graph.educationSchool", |node| {
        EducationSchool::create_from_discriminator_value(node).map(AnyEducationOrganization::School)
    })];

impl AnyEducationOrganization {
    /// The organization properties shared by every member.
    #[must_use]
    pub fn organization(&self) -> &EducationOrganization {
        match self {
            Self::Organization(organization) => organization,
            Self::School(school) => &school.organization,
        }
    }

    fn organization_mut(&mut self) -> &mut EducationOrganization {
        match self {
            Self::Organization(organization) => organization,
            Self::School(school) => &mut school.organization,
        }
    }
}

impl ModelFactory for AnyEducationOrganization {
    fn create_from_discriminator_value(node: &dyn ParseNode) -> Result<Self> {
        resolve_discriminator(node, ORGANIZATION_TYPES, |node| {
            EducationOrganization::create_from_discriminator_value(node)
                .map(AnyEducationOrganization::Organization)
        })
    }
}

impl Parsable for AnyEducationOrganization {
    fn field_deserializers() -> FieldDeserializers<Self> {
        inherit(
            EducationOrganization::field_deserializers(),
            Self::organization_mut,
        )
    }

    fn serialize(&self, writer: &mut dyn SerializationWriter) -> Result<()> {
        match self {
            Self::Organization(organization) => organization.serialize(writer),
            Self::School(school) => school.serialize(writer),
        }
    }

    fn additional_data(&self) -> &AdditionalData {
        &self.organization().additional_data
    }

    fn additional_data_mut(&mut self) -> &mut AdditionalData {
        &mut self.organization_mut().additional_data
    }
}

// ============================================================================
// Users
// ============================================================================

/// A student, teacher or faculty member.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EducationUser {
    /// Identifier.
    pub id: Option<String>,
    /// Whether the account is enabled.
    pub account_enabled: Option<bool>,
    /// Business phone numbers.
    pub business_phones: Option<Vec<String>>,
    /// Department.
    pub department: Option<String>,
    /// Display name.
    pub display_name: Option<String>,
    /// How the user was created.
    pub external_source: Option<EducationExternalSource>,
    /// Given name.
    pub given_name: Option<String>,
    /// Email address.
    pub mail: Option<String>,
    /// Mail alias.
    pub mail_nickname: Option<String>,
    /// Middle name.
    pub middle_name: Option<String>,
    /// Mobile phone.
    pub mobile_phone: Option<String>,
    /// Default role.
    pub primary_role: Option<EducationUserRole>,
    /// Surname.
    pub surname: Option<String>,
    /// User principal name.
    pub user_principal_name: Option<String>,
    /// Member or Guest.
    pub user_type: Option<String>,
    /// Classes the user belongs to.
    pub classes: Option<Vec<EducationClass>>,
    /// Schools the user belongs to.
    pub schools: Option<Vec<EducationSchool>>,
    /// Undeclared properties.
    pub additional_data: AdditionalData,
}

impl ModelFactory for EducationUser {
    fn create_from_discriminator_value(node: &dyn ParseNode) -> Result<Self> {
        parse_object(node)
    }
}

impl Parsable for EducationUser {
    fn field_deserializers() -> FieldDeserializers<Self> {
        vec![
            field("id", |user: &mut Self, node| {
                user.id = node.string_value()?;
                Ok(())
            }),
            field("accountEnabled", |user: &mut Self, node| {
                user.account_enabled = node.bool_value()?;
                Ok(())
            }),
            field("businessPhones", |user: &mut Self, node| {
                user.business_phones = node.collection_of_primitive_values()?;
                Ok(())
            }),
            field("department", |user: &mut Self, node| {
                user.department = node.string_value()?;
                Ok(())
            }),
            field("displayName", |user: &mut Self, node| {
                user.display_name = node.string_value()?;
                Ok(())
            }),
            field("externalSource", |user: &mut Self, node| {
                user.external_source = node.enum_value_of()?;
                Ok(())
            }),
            field("givenName", |user: &mut Self, node| {
                user.given_name = node.string_value()?;
                Ok(())
            }),
            field("mail", |user: &mut Self, node| {
                user.mail = node.string_value()?;
                Ok(())
            }),
            field("mailNickname", |user: &mut Self, node| {
                user.mail_nickname = node.string_value()?;
                Ok(())
            }),
            field("middleName", |user: &mut Self, node| {
                user.middle_name = node.string_value()?;
                Ok(())
            }),
            field("mobilePhone", |user: &mut Self, node| {
                user.mobile_phone = node.string_value()?;
                Ok(())
            }),
            field("primaryRole", |user: &mut Self, node| {
                user.primary_role = node.enum_value_of()?;
                Ok(())
            }),
            field("surname", |user: &mut Self, node| {
                user.surname = node.string_value()?;
                Ok(())
            }),
            field("userPrincipalName", |user: &mut Self, node| {
                user.user_principal_name = node.string_value()?;
                Ok(())
            }),
            field("userType", |user: &mut Self, node| {
                user.user_type = node.string_value()?;
                Ok(())
            }),
            field("classes", |user: &mut Self, node| {
                user.classes =
                    node.collection_of_object_values(EducationClass::create_from_discriminator_value)?;
                Ok(())
            }),
            field("schools", |user: &mut Self, node| {
                user.schools = node
                    .collection_of_object_values(EducationSchool::create_from_discriminator_value)?;
                Ok(())
            }),
        ]
    }

    fn serialize(&self, writer: &mut dyn SerializationWriter) -> Result<()> {
        writer.write_string_value(Some("id"), self.id.as_deref())?;
        writer.write_bool_value(Some("accountEnabled"), self.account_enabled)?;
        writer.write_collection_of_string_values(
            Some("businessPhones"),
            self.business_phones.as_deref(),
        )?;
        writer.write_string_value(Some("department"), self.department.as_deref())?;
        writer.write_string_value(Some("displayName"), self.display_name.as_deref())?;
        writer.write_enum_value(Some("externalSource"), self.external_source.as_ref())?;
        writer.write_string_value(Some("givenName"), self.given_name.as_deref())?;
        writer.write_string_value(Some("mail"), self.mail.as_deref())?;
        writer.write_string_value(Some("mailNickname"), self.mail_nickname.as_deref())?;
        writer.write_string_value(Some("middleName"), self.middle_name.as_deref())?;
        writer.write_string_value(Some("mobilePhone"), self.mobile_phone.as_deref())?;
        writer.write_enum_value(Some("primaryRole"), self.primary_role.as_ref())?;
        writer.write_string_value(Some("surname"), self.surname.as_deref())?;
        writer.write_string_value(
            Some("userPrincipalName"),
            self.user_principal_name.as_deref(),
        )?;
        writer.write_string_value(Some("userType"), self.user_type.as_deref())?;
        writer.write_collection_of_objects(Some("classes"), self.classes.as_deref())?;
        writer.write_collection_of_objects(Some("schools"), self.schools.as_deref())?;
        writer.write_additional_data(&self.additional_data)
    }

    fn additional_data(&self) -> &AdditionalData {
        &self.additional_data
    }

    fn additional_data_mut(&mut self) -> &mut AdditionalData {
        &mut self.additional_data
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use edugraph_core::serialization::{
        JsonParseNode, JsonSerializationWriter, ParseNodeFactoryRegistry,
    };

    use super::*;

    fn parse<T: ModelFactory>(body: &[u8]) -> T {
        let root = JsonParseNode::from_slice(body).expect("valid json");
        T::create_from_discriminator_value(&root).expect("parses")
    }

    #[test]
    fn submission_status_and_extras() {
        let submission: EducationSubmission =
            parse(br#"{"id":"s1","status":"excused","gradeOverride":"A"}"#);

        check!(submission.id.as_deref() == Some("s1"));
        check!(submission.status == Some(EducationSubmissionStatus::Excused));
        check!(submission.additional_data.get("gradeOverride") == Some(&serde_json::json!("A")));
    }

    #[test]
    fn school_discriminator_selects_school() {
        let organization: AnyEducationOrganization = parse(
            br##"{"@odata.type":"#microsoft.graph.educationSchool","id":"sch","principalName":"P"}"##,
        );

        let_assert!(AnyEducationOrganization::School(school) = &organization);
        check!(school.id() == Some("sch"));
        check!(school.principal_name.as_deref() == Some("P"));
    }

    #[test]
    fn unknown_discriminator_keeps_base() {
        let organization: AnyEducationOrganization =
            parse(br##"{"@odata.type":"#microsoft.graph.futureType","id":"X","extra":1}"##);

        let_assert!(AnyEducationOrganization::Organization(base) = &organization);
        check!(base.id.as_deref() == Some("X"));
        check!(
            base.additional_data.get("@odata.type")
                == Some(&serde_json::json!("#microsoft.graph.futureType"))
        );
        check!(base.additional_data.get("extra") == Some(&serde_json::json!(1)));
    }

    fn write(model: &dyn Parsable) -> bytes::Bytes {
        let mut writer = JsonSerializationWriter::new();
        let_assert!(Ok(()) = writer.write_object_value(None, Some(model)));
        let_assert!(Ok(content) = writer.content());
        content
    }

    #[test]
    fn school_built_in_code_round_trips() {
        let organization = AnyEducationOrganization::School(EducationSchool {
            principal_name: Some("P".into()),
            ..EducationSchool::default()
        });

        let again: AnyEducationOrganization = parse(&write(&organization));
        let_assert!(AnyEducationOrganization::School(school) = &again);
        check!(school.principal_name.as_deref() == Some("P"));
        check!(again == organization);
    }

    #[test]
    fn school_writes_discriminator_when_missing() {
        let mut school = EducationSchool {
            school_number: Some("42".into()),
            ..EducationSchool::default()
        };
        school.organization.additional_data.clear();

        let content = write(&school);
        let_assert!(Ok(json) = serde_json::from_slice::<serde_json::Value>(&content));
        check!(json["@odata.type"] == EducationSchool::ODATA_TYPE);

        let organization: AnyEducationOrganization = parse(&content);
        let_assert!(AnyEducationOrganization::School(read) = organization);
        check!(read.school_number.as_deref() == Some("42"));
    }

    #[test]
    fn round_trip_keeps_undeclared_properties() {
        let body = br#"{"id":"u1","displayName":"Ada","primaryRole":"teacher","businessPhones":["1"],"customFlag":true}"#;
        let user: EducationUser = parse(body);

        let mut writer = JsonSerializationWriter::new();
        let_assert!(Ok(()) = writer.write_object_value(None, Some(&user)));
        let_assert!(Ok(content) = writer.content());

        let registry = ParseNodeFactoryRegistry::with_defaults();
        let_assert!(Ok(node) = registry.root_parse_node("application/json", &content));
        let_assert!(Ok(again) = EducationUser::create_from_discriminator_value(node.as_ref()));
        check!(again == user);
        check!(again.additional_data.get("customFlag") == Some(&serde_json::json!(true)));
    }

    #[test]
    fn nested_navigation_collections() {
        let class: EducationClass = parse(
            br#"{"id":"c1","externalSource":"sis","assignments":[{"id":"a1","status":"assigned","submissions":[{"id":"s1","status":"working"}]}]}"#,
        );

        check!(class.external_source == Some(EducationExternalSource::Sis));
        let_assert!(Some([assignment]) = class.assignments.as_deref());
        check!(assignment.status == Some(EducationAssignmentStatus::Assigned));
        let_assert!(Some([submission]) = assignment.submissions.as_deref());
        check!(submission.status == Some(EducationSubmissionStatus::Working));
    }
}
