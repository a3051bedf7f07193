use std::{collections::BTreeSet, str::FromStr};

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use greenkenya_submission::{
    Error as SubmissionError, FieldEdit, FormKind, FormState, Interest, MembershipCategory,
};
use serde::Deserialize;
use strum::VariantArray;

use crate::{error::AppError, routes::AppState};

#[derive(Deserialize)]
pub struct MountInput {
    pub kind: String,
}

/// Submitted field values. Absent fields keep their defaults.
#[derive(Deserialize, Default)]
pub struct SubmitInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub experience: Option<String>,
    pub message: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
}

impl SubmitInput {
    pub fn into_form(self, kind: FormKind) -> Result<FormState, AppError> {
        let mut form = FormState::new(kind);

        let fields = [
            ("name", self.name),
            ("email", self.email),
            ("subject", self.subject),
            ("phone", self.phone),
            ("location", self.location),
            ("experience", self.experience),
            ("message", self.message),
        ];

        for (field, value) in fields {
            let Some(value) = value else {
                continue;
            };

            form.apply(FieldEdit::set(field, value))?;
        }

        if let Some(category) = self.category.filter(|category| !category.is_empty()) {
            let Ok(category) = MembershipCategory::from_str(&category) else {
                return Err(AppError::InvalidInput(format!(
                    "unknown membership category '{category}'"
                )));
            };

            form.apply(FieldEdit::SelectCategory(category))?;
        }

        let mut interests = BTreeSet::new();
        for interest in self.interests {
            let Ok(parsed) = Interest::from_str(&interest) else {
                return Err(AppError::InvalidInput(format!(
                    "unknown area of interest '{interest}'"
                )));
            };
            interests.insert(parsed);
        }

        for interest in interests {
            form.apply(FieldEdit::ToggleInterest(interest))?;
        }

        Ok(form)
    }
}

/// POST /sessions
pub async fn mount(
    State(app_state): State<AppState>,
    Form(input): Form<MountInput>,
) -> Result<impl IntoResponse, AppError> {
    let Ok(kind) = FormKind::from_str(&input.kind) else {
        let expected = FormKind::VARIANTS
            .iter()
            .map(|kind| kind.as_ref())
            .collect::<Vec<_>>()
            .join(", ");

        return Err(AppError::InvalidInput(format!(
            "unknown form kind '{}', expected one of {expected}",
            input.kind
        )));
    };

    let session = app_state.forms.mount(kind).await;

    Ok((StatusCode::CREATED, Json(session.view().await)))
}

/// GET /sessions/{id}
pub async fn show(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let session = app_state.forms.get(&id).await.ok_or(AppError::NotFound)?;

    Ok(Json(session.view().await))
}

/// POST /sessions/{id}/submit
///
/// Answers once the delivery attempt has resolved. A validation failure
/// answers 422 with the session view carrying the inline notice.
pub async fn submit(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Form(input): Form<SubmitInput>,
) -> Result<Response, AppError> {
    let session = app_state.forms.get(&id).await.ok_or(AppError::NotFound)?;
    let form = input.into_form(session.kind().await)?;

    match session.submit(form).await {
        Ok(status) => {
            tracing::info!(session = %id, status = %status, "Submission resolved");
            Ok(Json(session.view().await).into_response())
        }
        Err(SubmissionError::Validation(err)) => {
            tracing::debug!(session = %id, field = err.field, "Submission failed validation");
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(session.view().await)).into_response())
        }
        Err(err) => Err(err.into()),
    }
}

/// DELETE /sessions/{id}
pub async fn unmount(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !app_state.forms.unmount(&id).await {
        return Err(AppError::NotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}
