use crate::api::error::ApiError;
use crate::api::interfaces::MessageResponse;
use crate::api::policy::can_manage_roles;
use crate::api::users::interfaces::{CreatorAccessResponse, RequestCreatorRequest, UpdateRoleRequest};
use crate::database::DataStore;
use crate::database::app_user::UserRole;
use tracing::{info, instrument};

/// Change the role of `user_id`. Only admins may do this.
#[instrument(skip(store), err(Debug))]
pub async fn update_user_role(
    store: &dyn DataStore,
    user_id: i32,
    request: &UpdateRoleRequest,
) -> Result<MessageResponse, ApiError> {
    let is_admin = store
        .find_user(request.admin_id)
        .await?
        .is_some_and(|caller| can_manage_roles(&caller));
    if !is_admin {
        return Err(ApiError::forbidden("Admin access required"));
    }

    let role: UserRole = request
        .new_role
        .parse()
        .map_err(|_| ApiError::validation("Invalid role"))?;

    store
        .set_user_role(user_id, role)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    info!("User {} is now {} (by admin {})", user_id, role, request.admin_id);

    Ok(MessageResponse::new("User role updated successfully"))
}

/// Grant the creator role. Requests are approved automatically.
#[instrument(skip(store, request), fields(user_id = request.user_id), err(Debug))]
pub async fn request_creator_access(
    store: &dyn DataStore,
    request: &RequestCreatorRequest,
) -> Result<CreatorAccessResponse, ApiError> {
    if store.find_user(request.user_id).await?.is_none() {
        return Err(ApiError::not_found("User not found"));
    }
    let user = store
        .set_user_role(request.user_id, UserRole::Creator)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    info!(
        "Creator access granted to user {}. Reason: {}",
        user.id,
        request.reason.as_deref().unwrap_or("(none given)")
    );

    Ok(CreatorAccessResponse {
        message: "Creator access granted successfully".to_owned(),
        user: user.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryDataStore;
    use crate::database::app_user::NewUser;
    use color_eyre::Result;

    async fn user(store: &MemoryDataStore, sub: &str, role: UserRole) -> Result<i32> {
        let user = store
            .upsert_user(&NewUser {
                identity_provider_id: sub.to_owned(),
                email: format!("{sub}@example.com"),
                display_name: sub.to_owned(),
                picture_url: None,
            })
            .await?;
        store.set_user_role(user.id, role).await?;
        Ok(user.id)
    }

    fn role_request(admin_id: i32, new_role: &str) -> UpdateRoleRequest {
        UpdateRoleRequest {
            admin_id,
            new_role: new_role.to_owned(),
        }
    }

    #[tokio::test]
    async fn admin_changes_roles() -> Result<()> {
        let store = MemoryDataStore::new();
        let admin = user(&store, "admin", UserRole::Admin).await?;
        let target = user(&store, "target", UserRole::Consumer).await?;

        update_user_role(&store, target, &role_request(admin, "creator")).await?;
        let role = store.find_user(target).await?.map(|u| u.role);
        assert_eq!(role, Some(UserRole::Creator));
        Ok(())
    }

    #[tokio::test]
    async fn role_changes_are_checked() -> Result<()> {
        let store = MemoryDataStore::new();
        let admin = user(&store, "admin", UserRole::Admin).await?;
        let creator = user(&store, "creator", UserRole::Creator).await?;

        let not_admin = update_user_role(&store, creator, &role_request(creator, "admin")).await;
        assert!(matches!(not_admin, Err(ApiError::Forbidden(_))));

        let unknown_admin = update_user_role(&store, creator, &role_request(999, "admin")).await;
        assert!(matches!(unknown_admin, Err(ApiError::Forbidden(_))));

        let bad_role = update_user_role(&store, creator, &role_request(admin, "owner")).await;
        assert!(matches!(bad_role, Err(ApiError::Validation(_))));

        let missing = update_user_role(&store, 999, &role_request(admin, "creator")).await;
        assert!(matches!(missing, Err(ApiError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn creator_request_is_auto_approved() -> Result<()> {
        let store = MemoryDataStore::new();
        let consumer = user(&store, "c", UserRole::Consumer).await?;
        let request = RequestCreatorRequest {
            user_id: consumer,
            reason: Some("I take photos".to_owned()),
        };
        let response = request_creator_access(&store, &request).await?;
        assert_eq!(response.user.role, UserRole::Creator);

        let missing = RequestCreatorRequest {
            user_id: 999,
            reason: None,
        };
        assert!(matches!(
            request_creator_access(&store, &missing).await,
            Err(ApiError::NotFound(_))
        ));
        Ok(())
    }
}
