use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};
use validator::Validate;

use crate::{Error, ValidationError};

#[derive(
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FormKind {
    Contact,
    Membership,
    Chat,
}

#[derive(
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MembershipCategory {
    Ordinary,
    Associate,
    Honorary,
    Ambassador,
}

impl MembershipCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ordinary => "Ordinary Membership",
            Self::Associate => "Associate Membership",
            Self::Honorary => "Honorary Membership",
            Self::Ambassador => "Ambassador Membership",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Ordinary => "For active participants in environmental activities",
            Self::Associate => "For supporters and well-wishers of GKI",
            Self::Honorary => {
                "Awarded for exceptional contribution to environmental conservation"
            }
            Self::Ambassador => "For representatives promoting GKI values regionally/nationally",
        }
    }
}

#[derive(
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
pub enum Interest {
    #[strum(serialize = "Tree Planting")]
    #[serde(rename = "Tree Planting")]
    TreePlanting,
    #[strum(serialize = "Community Clean-up")]
    #[serde(rename = "Community Clean-up")]
    CommunityCleanUp,
    #[strum(serialize = "Youth Education")]
    #[serde(rename = "Youth Education")]
    YouthEducation,
    #[strum(serialize = "Water Conservation")]
    #[serde(rename = "Water Conservation")]
    WaterConservation,
    #[strum(serialize = "Sustainable Agriculture")]
    #[serde(rename = "Sustainable Agriculture")]
    SustainableAgriculture,
    #[strum(serialize = "Digital Advocacy")]
    #[serde(rename = "Digital Advocacy")]
    DigitalAdvocacy,
    #[strum(serialize = "Event Organization")]
    #[serde(rename = "Event Organization")]
    EventOrganization,
    #[strum(serialize = "Fundraising")]
    #[serde(rename = "Fundraising")]
    Fundraising,
}

const CONTACT_FIELDS: &[&str] = &["name", "email", "subject", "message"];
const MEMBERSHIP_FIELDS: &[&str] = &[
    "name",
    "email",
    "phone",
    "location",
    "message",
    "category",
    "interests",
];
const CHAT_FIELDS: &[&str] = &["message"];

fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }

    Ok(())
}

#[derive(Validate, Default, Clone, Debug, PartialEq, Serialize)]
pub struct ContactForm {
    #[validate(custom(function = "not_blank", message = "Please enter your name."))]
    pub name: String,
    #[validate(
        custom(function = "not_blank", message = "Please enter your email address."),
        email(message = "Please enter a valid email address.")
    )]
    pub email: String,
    #[validate(custom(function = "not_blank", message = "Please enter a subject."))]
    pub subject: String,
    #[validate(custom(function = "not_blank", message = "Please enter your message."))]
    pub message: String,
}

#[derive(Validate, Default, Clone, Debug, PartialEq, Serialize)]
pub struct MembershipForm {
    #[validate(custom(function = "not_blank", message = "Please enter your full name."))]
    pub name: String,
    #[validate(
        custom(function = "not_blank", message = "Please enter your email address."),
        email(message = "Please enter a valid email address.")
    )]
    pub email: String,
    #[validate(custom(function = "not_blank", message = "Please enter your phone number."))]
    pub phone: String,
    #[validate(custom(function = "not_blank", message = "Please enter your location."))]
    pub location: String,
    #[validate(required(message = "Please select a membership category."))]
    pub category: Option<MembershipCategory>,
    #[validate(length(min = 1, message = "Please select at least one area of interest."))]
    pub interests: BTreeSet<Interest>,
    pub experience: String,
    #[validate(custom(
        function = "not_blank",
        message = "Please tell us why you want to join."
    ))]
    pub message: String,
}

#[derive(Validate, Default, Clone, Debug, PartialEq, Serialize)]
pub struct ChatForm {
    #[validate(custom(function = "not_blank", message = "Please type a message."))]
    pub message: String,
}

/// A single keystroke or toggle applied to a mounted form.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldEdit {
    Set { field: String, value: String },
    SelectCategory(MembershipCategory),
    ToggleInterest(Interest),
}

impl FieldEdit {
    pub fn set(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Set {
            field: field.into(),
            value: value.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FormState {
    Contact(ContactForm),
    Membership(MembershipForm),
    Chat(ChatForm),
}

impl FormState {
    pub fn new(kind: FormKind) -> Self {
        match kind {
            FormKind::Contact => Self::Contact(ContactForm::default()),
            FormKind::Membership => Self::Membership(MembershipForm::default()),
            FormKind::Chat => Self::Chat(ChatForm::default()),
        }
    }

    pub fn kind(&self) -> FormKind {
        match self {
            Self::Contact(_) => FormKind::Contact,
            Self::Membership(_) => FormKind::Membership,
            Self::Chat(_) => FormKind::Chat,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.kind());
    }

    pub fn is_default(&self) -> bool {
        *self == Self::new(self.kind())
    }

    pub fn apply(&mut self, edit: FieldEdit) -> Result<(), Error> {
        let kind = self.kind();

        match edit {
            FieldEdit::Set { field, value } => {
                let Some(slot) = self.text_field_mut(&field) else {
                    return Err(Error::UnknownField { kind, field });
                };
                *slot = value;
            }
            FieldEdit::SelectCategory(category) => {
                let Self::Membership(form) = self else {
                    return Err(Error::UnknownField {
                        kind,
                        field: "category".to_owned(),
                    });
                };
                form.category = Some(category);
            }
            FieldEdit::ToggleInterest(interest) => {
                let Self::Membership(form) = self else {
                    return Err(Error::UnknownField {
                        kind,
                        field: "interests".to_owned(),
                    });
                };
                if !form.interests.remove(&interest) {
                    form.interests.insert(interest);
                }
            }
        }

        Ok(())
    }

    fn text_field_mut(&mut self, field: &str) -> Option<&mut String> {
        let slot = match (self, field) {
            (Self::Contact(form), "name") => &mut form.name,
            (Self::Contact(form), "email") => &mut form.email,
            (Self::Contact(form), "subject") => &mut form.subject,
            (Self::Contact(form), "message") => &mut form.message,
            (Self::Membership(form), "name") => &mut form.name,
            (Self::Membership(form), "email") => &mut form.email,
            (Self::Membership(form), "phone") => &mut form.phone,
            (Self::Membership(form), "location") => &mut form.location,
            (Self::Membership(form), "experience") => &mut form.experience,
            (Self::Membership(form), "message") => &mut form.message,
            (Self::Chat(form), "message") => &mut form.message,
            _ => return None,
        };

        Some(slot)
    }

    /// Checks required fields in the order the visitor sees them on the page.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::Contact(form) => form
                .validate()
                .map_err(|errors| ValidationError::first_of(&errors, CONTACT_FIELDS)),
            Self::Membership(form) => form
                .validate()
                .map_err(|errors| ValidationError::first_of(&errors, MEMBERSHIP_FIELDS)),
            Self::Chat(form) => form
                .validate()
                .map_err(|errors| ValidationError::first_of(&errors, CHAT_FIELDS)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn amina() -> FormState {
        let mut form = FormState::new(FormKind::Contact);
        for (field, value) in [
            ("name", "Amina"),
            ("email", "a@x.com"),
            ("subject", "Volunteering"),
            ("message", "I'd like to help"),
        ] {
            form.apply(FieldEdit::set(field, value)).unwrap();
        }
        form
    }

    fn membership() -> MembershipForm {
        MembershipForm {
            name: "Baraka Otieno".to_owned(),
            email: "baraka@example.com".to_owned(),
            phone: "+254 700 000 000".to_owned(),
            location: "Kilifi".to_owned(),
            category: Some(MembershipCategory::Ordinary),
            interests: BTreeSet::from([Interest::TreePlanting]),
            experience: String::new(),
            message: "I love trees".to_owned(),
        }
    }

    #[test]
    fn test_valid_contact_form() {
        assert!(amina().validate().is_ok());
    }

    #[test]
    fn test_blank_message_is_required() {
        let mut form = amina();
        form.apply(FieldEdit::set("message", "   ")).unwrap();

        let err = form.validate().unwrap_err();
        assert_eq!(err.field, "message");
        assert_eq!(err.message, "Please enter your message.");
    }

    #[test]
    fn test_blank_email_reports_required_before_format() {
        let mut form = amina();
        form.apply(FieldEdit::set("email", "")).unwrap();

        let err = form.validate().unwrap_err();
        assert_eq!(err.field, "email");
        assert_eq!(err.message, "Please enter your email address.");
    }

    #[test]
    fn test_malformed_email() {
        let mut form = amina();
        form.apply(FieldEdit::set("email", "not-an-email")).unwrap();

        let err = form.validate().unwrap_err();
        assert_eq!(err.message, "Please enter a valid email address.");
    }

    #[test]
    fn test_membership_without_category() {
        let form = FormState::Membership(MembershipForm {
            category: None,
            ..membership()
        });

        let err = form.validate().unwrap_err();
        assert_eq!(err.field, "category");
        assert_eq!(err.message, "Please select a membership category.");
    }

    #[test]
    fn test_membership_without_interests() {
        let form = FormState::Membership(MembershipForm {
            interests: BTreeSet::new(),
            ..membership()
        });

        let err = form.validate().unwrap_err();
        assert_eq!(err.message, "Please select at least one area of interest.");
    }

    #[test]
    fn test_category_checked_before_interests() {
        let form = FormState::Membership(MembershipForm {
            category: None,
            interests: BTreeSet::new(),
            ..membership()
        });

        assert_eq!(form.validate().unwrap_err().field, "category");
    }

    #[test]
    fn test_experience_is_optional() {
        let form = FormState::Membership(membership());
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_toggle_interest_twice_deselects() {
        let mut form = FormState::new(FormKind::Membership);
        form.apply(FieldEdit::ToggleInterest(Interest::Fundraising))
            .unwrap();
        form.apply(FieldEdit::ToggleInterest(Interest::Fundraising))
            .unwrap();

        assert!(form.is_default());
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let mut form = FormState::new(FormKind::Chat);
        let err = form.apply(FieldEdit::set("phone", "123")).unwrap_err();
        assert!(matches!(err, Error::UnknownField { kind: FormKind::Chat, .. }));

        let err = form
            .apply(FieldEdit::SelectCategory(MembershipCategory::Honorary))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownField { .. }));
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut form = amina();
        form.reset();

        assert_eq!(form, FormState::Contact(ContactForm::default()));
    }

    #[test]
    fn test_parse_choices() {
        assert_eq!(
            MembershipCategory::from_str("ambassador").unwrap(),
            MembershipCategory::Ambassador
        );
        assert_eq!(
            Interest::from_str("Community Clean-up").unwrap(),
            Interest::CommunityCleanUp
        );
        assert_eq!(FormKind::from_str("chat").unwrap(), FormKind::Chat);
        assert!(Interest::from_str("Knitting").is_err());
    }
}
