//! Apartment write-path service.

use std::sync::Arc;

use tracing::info;
use validator::Validate;

use homehunt_core::error::AppError;
use homehunt_core::result::AppResult;
use homehunt_core::types::ApartmentId;
use homehunt_database::store::ApartmentStore;
use homehunt_entity::apartment::{Apartment, Comment};

use super::input::{CreateApartment, CreateComment};
use crate::context::RequestContext;

/// Result of [`ApartmentService::add_comment`].
#[derive(Debug, Clone)]
pub struct CommentAdded {
    /// The apartment commented on.
    pub apartment: Apartment,
    /// The stored comment.
    pub comment: Comment,
}

/// Result of [`ApartmentService::toggle_favorite`].
#[derive(Debug, Clone)]
pub struct FavoriteToggled {
    /// The apartment toggled.
    pub apartment: Apartment,
    /// `true` when the favorite was created, `false` when it was removed.
    pub favorited: bool,
}

/// Creates listings, comments and favorites.
///
/// Only the primary write happens here; callers trigger notification
/// fan-out once a call returns `Ok`.
#[derive(Clone)]
pub struct ApartmentService {
    store: Arc<dyn ApartmentStore>,
}

impl ApartmentService {
    /// Creates a new apartment service.
    pub fn new(store: Arc<dyn ApartmentStore>) -> Self {
        Self { store }
    }

    /// Every apartment, newest first.
    pub async fn list_apartments(&self) -> AppResult<Vec<Apartment>> {
        self.store.list_apartments().await
    }

    /// Add a listing owned by the acting user.
    pub async fn create_apartment(
        &self,
        ctx: &RequestContext,
        input: CreateApartment,
    ) -> AppResult<Apartment> {
        let input = CreateApartment {
            label: input.label.trim().to_string(),
            address: input
                .address
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty()),
            ..input
        };
        input
            .validate()
            .map_err(|e| AppError::validation(format!("Invalid apartment: {e}")))?;

        let apartment = Apartment::new(
            ctx.user_id,
            input.label,
            input.address,
            input.latitude,
            input.longitude,
        );
        let stored = self.store.insert_apartment(&apartment).await?;
        info!(apartment_id = %stored.id, owner = %ctx.user_id, "Apartment created");
        Ok(stored)
    }

    /// Comment on an existing apartment.
    pub async fn add_comment(
        &self,
        ctx: &RequestContext,
        apartment_id: ApartmentId,
        input: CreateComment,
    ) -> AppResult<CommentAdded> {
        let input = CreateComment {
            body: input.body.trim().to_string(),
        };
        input
            .validate()
            .map_err(|e| AppError::validation(format!("Invalid comment: {e}")))?;

        let apartment = self.require_apartment(apartment_id).await?;
        let comment = Comment::new(apartment_id, ctx.user_id, input.body);
        let comment = self.store.insert_comment(&comment).await?;
        info!(
            apartment_id = %apartment_id,
            comment_id = %comment.id,
            author = %ctx.user_id,
            "Comment added"
        );
        Ok(CommentAdded { apartment, comment })
    }

    /// Flip the acting user's favorite on an apartment.
    pub async fn toggle_favorite(
        &self,
        ctx: &RequestContext,
        apartment_id: ApartmentId,
    ) -> AppResult<FavoriteToggled> {
        let apartment = self.require_apartment(apartment_id).await?;
        let favorited = self.store.toggle_favorite(ctx.user_id, apartment_id).await?;
        info!(
            apartment_id = %apartment_id,
            user_id = %ctx.user_id,
            favorited = favorited,
            "Favorite toggled"
        );
        Ok(FavoriteToggled {
            apartment,
            favorited,
        })
    }

    async fn require_apartment(&self, id: ApartmentId) -> AppResult<Apartment> {
        self.store
            .find_apartment(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Apartment {id} not found")))
    }
}

impl std::fmt::Debug for ApartmentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApartmentService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use homehunt_core::error::ErrorKind;
    use homehunt_core::types::UserId;
    use homehunt_database::InMemoryStore;

    fn setup() -> (ApartmentService, RequestContext) {
        (
            ApartmentService::new(Arc::new(InMemoryStore::new())),
            RequestContext::new(UserId::new(), "Ana"),
        )
    }

    fn loft() -> CreateApartment {
        CreateApartment {
            label: "  Loft  ".into(),
            address: Some("".into()),
            latitude: 48.85,
            longitude: 2.35,
        }
    }

    #[tokio::test]
    async fn test_create_apartment_trims_input() {
        let (service, ctx) = setup();
        let apt = service.create_apartment(&ctx, loft()).await.expect("create");
        assert_eq!(apt.label, "Loft");
        assert_eq!(apt.address, None);
        assert_eq!(apt.owner_id, ctx.user_id);
        assert_eq!(service.list_apartments().await.expect("list").len(), 1);
    }

    #[tokio::test]
    async fn test_blank_label_is_rejected() {
        let (service, ctx) = setup();
        let input = CreateApartment {
            label: "   ".into(),
            ..loft()
        };
        let err = service.create_apartment(&ctx, input).await.expect_err("invalid");
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_comment_on_missing_apartment_is_not_found() {
        let (service, ctx) = setup();
        let err = service
            .add_comment(&ctx, ApartmentId::new(), CreateComment { body: "hi".into() })
            .await
            .expect_err("missing");
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_comment_returns_apartment_for_formatting() {
        let (service, ctx) = setup();
        let apt = service.create_apartment(&ctx, loft()).await.expect("create");
        let added = service
            .add_comment(&ctx, apt.id, CreateComment { body: " nice light ".into() })
            .await
            .expect("comment");
        assert_eq!(added.apartment.label, "Loft");
        assert_eq!(added.comment.body, "nice light");
    }

    #[tokio::test]
    async fn test_toggle_favorite_reports_creation() {
        let (service, ctx) = setup();
        let apt = service.create_apartment(&ctx, loft()).await.expect("create");
        assert!(service.toggle_favorite(&ctx, apt.id).await.expect("on").favorited);
        assert!(!service.toggle_favorite(&ctx, apt.id).await.expect("off").favorited);
    }
}
