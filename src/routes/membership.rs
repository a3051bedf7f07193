use axum::{Json, response::IntoResponse};
use greenkenya_submission::{Interest, MembershipCategory};
use serde::Serialize;
use strum::VariantArray;

#[derive(Serialize)]
pub struct CategoryOption {
    pub value: MembershipCategory,
    pub label: &'static str,
    pub description: &'static str,
}

#[derive(Serialize)]
pub struct MembershipOptions {
    pub categories: Vec<CategoryOption>,
    pub interests: &'static [Interest],
}

/// GET /membership/options - Choices offered on the application form
pub async fn options() -> impl IntoResponse {
    let categories = MembershipCategory::VARIANTS
        .iter()
        .map(|category| CategoryOption {
            value: *category,
            label: category.label(),
            description: category.description(),
        })
        .collect();

    Json(MembershipOptions {
        categories,
        interests: Interest::VARIANTS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_options_list_every_choice() {
        let response = options().await.into_response();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["categories"].as_array().unwrap().len(), 4);
        assert_eq!(json["categories"][3]["value"], "ambassador");
        assert_eq!(json["categories"][3]["label"], "Ambassador Membership");
        assert_eq!(json["interests"].as_array().unwrap().len(), 8);
        assert_eq!(json["interests"][1], "Community Clean-up");
    }
}
