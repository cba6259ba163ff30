use std::fmt;

use serde::{Serialize, Serializer};

/// Stand-in for a missing integer field.
pub const NULL_INT: i64 = -1;
/// Stand-in for a missing text field.
pub const NULL_STRING: &str = "";

/// A categorical field read from a fixed label on the detail page.
pub trait LabelValue: Copy + Sized {
    /// Value used when the label is absent or its text is unrecognized.
    const UNSET: Self;

    fn from_label(text: &str) -> Option<Self>;
    fn as_str(&self) -> &'static str;

    fn is_unset(&self) -> bool;
}

macro_rules! label_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => $text:literal),+ $(,)?
        }
        unset: $unset:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
            $unset,
        }

        impl $name {
            /// Every real value, in page order.
            pub const VALUES: &'static [$name] = &[$($name::$variant),+];
        }

        impl LabelValue for $name {
            const UNSET: Self = $name::$unset;

            fn from_label(text: &str) -> Option<Self> {
                match text.trim() {
                    $($text => Some($name::$variant),)+
                    _ => None,
                }
            }

            fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                    $name::$unset => NULL_STRING,
                }
            }

            fn is_unset(&self) -> bool {
                matches!(self, $name::$unset)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

label_enum! {
    /// Open and unfiled cases legitimately have no status block.
    CaseStatus {
        Open => "OPEN",
        Closed => "CLOSED",
    }
    unset: Unknown
}

label_enum! {
    UnionStatus {
        Union => "Union",
        NonUnion => "NonUnion",
    }
    unset: Unset
}

label_enum! {
    InspectionType {
        Planned => "Planned",
        Referral => "Referral",
        Complaint => "Complaint",
        UnprogRel => "Unprog Rel",
        FatCat => "Fat/Cat",
        ProgOther => "Prog Other",
        Accident => "Accident",
        ProgRelated => "Prog Related",
        FollowUp => "FollowUp",
        UnprogOther => "Unprog Other",
        Other => "Other",
        Monitoring => "Monitoring",
    }
    unset: Unset
}

label_enum! {
    Scope {
        Partial => "Partial",
        Complete => "Complete",
        Records => "Records",
    }
    unset: Unset
}

label_enum! {
    AdvanceNotice {
        Yes => "Y",
        No => "N",
    }
    unset: Unset
}

label_enum! {
    Ownership {
        Private => "Private",
        LocalGovt => "LocalGovt",
        StateGovt => "StateGovt",
    }
    unset: Unknown
}

label_enum! {
    SafetyOrHealth {
        Safety => "Safety",
        Health => "Health",
    }
    unset: Unset
}

/// One parsed inspection-detail page.
///
/// Every field always holds a value: missing data is encoded with
/// [`NULL_INT`], [`NULL_STRING`] or the enum's unset variant, so rows built
/// from records are always the same width.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Inspection {
    pub case_status: CaseStatus,
    pub employer_name: String,
    pub union_status: UnionStatus,
    pub naics_code: i64,
    pub naics_name: String,
    pub inspection_type: InspectionType,
    pub scope: Scope,
    pub advance_notice: AdvanceNotice,
    pub ownership: Ownership,
    pub safety_or_health: SafetyOrHealth,
    pub total_initial_violations: i64,
    pub total_current_violations: i64,
    pub total_initial_penalty: String,
    pub total_current_penalty: String,
    pub total_fta_penalty: String,
}

impl Inspection {
    /// Column names, in the order [`Inspection::to_row`] emits values.
    pub const FIELD_NAMES: [&'static str; 15] = [
        "case_status",
        "employer_name",
        "union_status",
        "naics_code",
        "naics_name",
        "inspection_type",
        "scope",
        "advance_notice",
        "ownership",
        "safety_or_health",
        "total_initial_violations",
        "total_current_violations",
        "total_initial_penalty",
        "total_current_penalty",
        "total_fta_penalty",
    ];

    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.case_status.to_string(),
            self.employer_name.clone(),
            self.union_status.to_string(),
            self.naics_code.to_string(),
            self.naics_name.clone(),
            self.inspection_type.to_string(),
            self.scope.to_string(),
            self.advance_notice.to_string(),
            self.ownership.to_string(),
            self.safety_or_health.to_string(),
            self.total_initial_violations.to_string(),
            self.total_current_violations.to_string(),
            self.total_initial_penalty.clone(),
            self.total_current_penalty.clone(),
            self.total_fta_penalty.clone(),
        ]
    }

    /// Row for a dataset entry that has no parsed page.
    pub fn null_row() -> Vec<String> {
        Self::FIELD_NAMES
            .iter()
            .map(|name| match *name {
                "naics_code" | "total_initial_violations" | "total_current_violations" => {
                    NULL_INT.to_string()
                }
                _ => NULL_STRING.to_string(),
            })
            .collect()
    }

    pub fn is_closed(&self) -> bool {
        self.case_status == CaseStatus::Closed
    }
}
