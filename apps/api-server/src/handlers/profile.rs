//! Dietary profile updates.

use actix_web::{HttpResponse, web};

use nutrivision_core::domain::DietProfile;
use nutrivision_shared::dto::UpdateProfileRequest;

use crate::handlers::users::{load_user, user_response};
use crate::middleware::auth::CurrentUser;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn profile_from_request(req: UpdateProfileRequest) -> DietProfile {
    let diet = req
        .diet
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| DietProfile::default().diet);

    DietProfile {
        diet,
        health_conditions: req.health_conditions.into_vec(),
        allergies: req.allergies.into_vec(),
        favorite_dishes: req.favorite_dishes.into_vec(),
        disliked_dishes: req.disliked_dishes.into_vec(),
    }
}

/// POST /api/profile - replaces the whole profile
pub async fn update_profile(
    state: web::Data<AppState>,
    current: CurrentUser,
    body: web::Json<UpdateProfileRequest>,
) -> AppResult<HttpResponse> {
    let mut user = load_user(&state, current.user.id).await?;
    user.set_profile(profile_from_request(body.into_inner()));

    let saved = state.users.save(user).await?;
    tracing::info!(user_id = %saved.id, diet = %saved.profile.diet, "Profile updated");

    Ok(HttpResponse::Ok().json(user_response(&saved)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nutrivision_shared::dto::StringList;

    #[test]
    fn test_blank_diet_falls_back_to_none() {
        let profile = profile_from_request(UpdateProfileRequest {
            diet: Some("  ".to_string()),
            allergies: StringList::Text("gluten, lactose".to_string()),
            ..UpdateProfileRequest::default()
        });

        assert_eq!(profile.diet, "none");
        assert_eq!(profile.allergies, vec!["gluten", "lactose"]);
    }
}
