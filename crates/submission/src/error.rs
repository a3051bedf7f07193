use crate::FormKind;

/// First failing field of a form, in on-page order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub(crate) fn first_of(errors: &validator::ValidationErrors, order: &[&'static str]) -> Self {
        let field_errors = errors.field_errors();

        for field in order {
            let Some(errs) = field_errors.get(*field) else {
                continue;
            };

            let err = errs
                .iter()
                .find(|err| err.code == "blank")
                .or_else(|| errs.first());

            if let Some(err) = err {
                let message = err
                    .message
                    .as_ref()
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| format!("{field} is invalid"));

                return Self { field, message };
            }
        }

        Self {
            field: "form",
            message: errors.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("a submission is already in flight")]
    InFlight,

    #[error("{kind} form has no field `{field}`")]
    UnknownField { kind: FormKind, field: String },

    #[error("expected a {expected} form, got {actual}")]
    WrongKind { expected: FormKind, actual: FormKind },

    #[error("failed to render message: {0}")]
    Render(#[from] askama::Error),

    #[error("failed to format timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
}

pub type Result<T> = std::result::Result<T, Error>;
