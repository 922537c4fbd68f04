//! Education enumerations.
//!
//! Every enumeration carries `UnknownFutureValue`, which is also where wire values
//! added by newer service versions land.

use crate::ParsableEnum;

macro_rules! education_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$variant_meta:meta])* $variant:ident => $wire:literal,)+ }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$variant_meta])* $variant,)+
            /// Evolvable enumeration sentinel.
            UnknownFutureValue,
        }

        impl ParsableEnum for $name {
            fn parse(value: &str) -> Self {
                match value {
                    $($wire => Self::$variant,)+
                    _ => Self::UnknownFutureValue,
                }
            }

            fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                    Self::UnknownFutureValue => "unknownFutureValue",
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

education_enum! {
    /// Where an education object was provisioned from.
    EducationExternalSource {
        /// Synced from a student information system.
        Sis => "sis",
        /// Created manually.
        Manual => "manual",
    }
}

education_enum! {
    /// Lifecycle of an assignment.
    EducationAssignmentStatus {
        /// Not yet published.
        Draft => "draft",
        /// Publishing in progress.
        Published => "published",
        /// Visible to students.
        Assigned => "assigned",
        /// No longer active.
        Inactive => "inactive",
    }
}

education_enum! {
    /// Lifecycle of a submission.
    EducationSubmissionStatus {
        /// Student is working on it.
        Working => "working",
        /// Turned in.
        Submitted => "submitted",
        /// Released to the teacher.
        Released => "released",
        /// Returned with feedback.
        Returned => "returned",
        /// Sent back for rework.
        Reassigned => "reassigned",
        /// Excused by the teacher.
        Excused => "excused",
    }
}

education_enum! {
    /// Role of an education user.
    EducationUserRole {
        /// Student.
        Student => "student",
        /// Teacher.
        Teacher => "teacher",
        /// No role.
        None => "none",
        /// Faculty member.
        Faculty => "faculty",
    }
}

#[cfg(test)]
mod tests {
    use assert2::check;

    use super::*;

    #[test]
    fn known_values() {
        check!(EducationSubmissionStatus::parse("excused") == EducationSubmissionStatus::Excused);
        check!(EducationAssignmentStatus::Assigned.as_str() == "assigned");
        check!(EducationUserRole::parse("faculty") == EducationUserRole::Faculty);
    }

    #[test]
    fn unknown_values_fall_back() {
        check!(EducationExternalSource::parse("lms") == EducationExternalSource::UnknownFutureValue);
        check!(EducationUserRole::UnknownFutureValue.to_string() == "unknownFutureValue");
    }
}
