//! Repository pattern for database operations
//!
//! Provides a clean interface for all data access operations with proper
//! error handling and transaction support. Each mutating method is one
//! atomic unit of work; the moderation transitions run inside explicit
//! transactions so approval is all-or-nothing.

use crate::db::models::*;
use crate::db::DbPool;
use crate::errors::{AppError, Result};
use crate::moderation::{self, AppliedEdit, EditSnapshot, ReviewDecision, ReviewStatus};
use crate::policy::Role;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, Statement, TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;

/// An author row on the authors listing: a user plus their count of
/// publicly visible articles.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorListing {
    pub user_id: Uuid,
    pub username: String,
    pub article_count: i64,
}

/// Repository for data access operations
#[derive(Clone)]
pub struct Repository {
    pool: DbPool,
}

impl Repository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get the read connection
    fn read_conn(&self) -> &DatabaseConnection {
        self.pool.read()
    }

    /// Get the write connection
    fn write_conn(&self) -> &DatabaseConnection {
        self.pool.write()
    }

    // ========================================================================
    // Health Check
    // ========================================================================

    /// Ping the database
    pub async fn ping(&self) -> Result<()> {
        self.pool.ping().await
    }

    // ========================================================================
    // User Operations
    // ========================================================================

    /// Create a new user; a duplicate username surfaces as Conflict
    pub async fn create_user(
        &self,
        username: String,
        email: String,
        password_hash: String,
    ) -> Result<User> {
        let user = UserActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(username),
            email: Set(email),
            password_hash: Set(password_hash),
            created_at: Set(chrono::Utc::now().into()),
        };

        user.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// Find user by ID
    pub async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        UserEntity::find_by_id(id)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Find user by username (login path)
    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        UserEntity::find()
            .filter(UserColumn::Username.eq(username))
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// All users with their profiles, for the manage-users surface
    pub async fn list_users_with_profiles(&self) -> Result<Vec<(User, Option<UserProfile>)>> {
        UserEntity::find()
            .find_also_related(UserProfileEntity)
            .order_by_asc(UserColumn::Username)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Profile Operations
    // ========================================================================

    /// Find the profile for a user
    pub async fn find_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>> {
        UserProfileEntity::find()
            .filter(UserProfileColumn::UserId.eq(user_id))
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Get the profile for a user, creating a USER-role one if absent
    pub async fn get_or_create_profile(&self, user_id: Uuid) -> Result<UserProfile> {
        if let Some(profile) = self.find_profile(user_id).await? {
            return Ok(profile);
        }

        let now = chrono::Utc::now();
        let profile = UserProfileActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            role: Set(String::from(Role::User)),
            is_banned: Set(false),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        profile.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// Set a user's role, creating the profile if absent
    pub async fn set_role(&self, user_id: Uuid, role: Role) -> Result<UserProfile> {
        let profile = self.get_or_create_profile(user_id).await?;

        let mut active: UserProfileActiveModel = profile.into();
        active.role = Set(String::from(role));
        active.updated_at = Set(chrono::Utc::now().into());

        active.update(self.write_conn()).await.map_err(Into::into)
    }

    /// Bulk ban/unban, creating missing profiles so the flag sticks
    pub async fn set_banned(&self, user_ids: &[Uuid], banned: bool) -> Result<usize> {
        let mut updated = 0;
        for &user_id in user_ids {
            let profile = self.get_or_create_profile(user_id).await?;
            let mut active: UserProfileActiveModel = profile.into();
            active.is_banned = Set(banned);
            active.updated_at = Set(chrono::Utc::now().into());
            active.update(self.write_conn()).await?;
            updated += 1;
        }
        Ok(updated)
    }

    // ========================================================================
    // Category Operations
    // ========================================================================

    /// Create a category, deriving the slug from the name when not supplied
    pub async fn create_category(&self, name: String, slug: Option<String>) -> Result<Category> {
        let slug = match slug.filter(|s| !s.trim().is_empty()) {
            Some(s) => s,
            None => slugify(&name),
        };

        let category = CategoryActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            slug: Set(slug),
        };

        category.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// All categories ordered by name
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        CategoryEntity::find()
            .order_by_asc(CategoryColumn::Name)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Find category by ID
    pub async fn find_category_by_id(&self, id: Uuid) -> Result<Option<Category>> {
        CategoryEntity::find_by_id(id)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Find category by slug
    pub async fn find_category_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        CategoryEntity::find()
            .filter(CategoryColumn::Slug.eq(slug))
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Article Operations
    // ========================================================================

    /// Create a new article; always starts unapproved and unpublished
    #[allow(clippy::too_many_arguments)]
    pub async fn create_article(
        &self,
        author_id: Uuid,
        title: String,
        category_id: Uuid,
        image: Option<String>,
        image_url: Option<String>,
        summary: String,
        content: String,
    ) -> Result<Article> {
        let now = chrono::Utc::now();

        let article = ArticleActiveModel {
            id: Set(Uuid::new_v4()),
            author_id: Set(author_id),
            category_id: Set(category_id),
            title: Set(title),
            image: Set(image),
            image_url: Set(image_url),
            summary: Set(summary),
            content: Set(content),
            is_approved: Set(false),
            is_published: Set(false),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        article.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// Find article by ID
    pub async fn find_article_by_id(&self, id: Uuid) -> Result<Option<Article>> {
        ArticleEntity::find_by_id(id)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Direct admin edit: apply the fields and force re-review. An edit
    /// submitted without a new upload keeps the currently stored file.
    pub async fn update_article_direct(
        &self,
        article_id: Uuid,
        applied: AppliedEdit,
        image: Option<String>,
    ) -> Result<Article> {
        let article = self
            .find_article_by_id(article_id)
            .await?
            .ok_or_else(|| AppError::ArticleNotFound {
                id: article_id.to_string(),
            })?;

        let image = merge_image(image, article.image.clone());
        let mut active: ArticleActiveModel = article.into();
        active.title = Set(applied.title);
        active.category_id = Set(applied.category_id);
        active.image = Set(image);
        active.image_url = Set(applied.image_url);
        active.summary = Set(applied.summary);
        active.content = Set(applied.content);
        active.is_approved = Set(applied.is_approved);
        active.is_published = Set(applied.is_published);
        active.updated_at = Set(chrono::Utc::now().into());

        active.update(self.write_conn()).await.map_err(Into::into)
    }

    /// Explicit publication decision: approve sets both flags, reject clears both
    pub async fn set_publication(&self, article_id: Uuid, publish: bool) -> Result<Article> {
        let article = self
            .find_article_by_id(article_id)
            .await?
            .ok_or_else(|| AppError::ArticleNotFound {
                id: article_id.to_string(),
            })?;

        let mut active: ArticleActiveModel = article.into();
        active.is_approved = Set(publish);
        active.is_published = Set(publish);
        active.updated_at = Set(chrono::Utc::now().into());

        active.update(self.write_conn()).await.map_err(Into::into)
    }

    /// Delete article by ID; dependents cascade at the schema level
    pub async fn delete_article(&self, id: Uuid) -> Result<bool> {
        let result = ArticleEntity::delete_by_id(id)
            .exec(self.write_conn())
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Public listing: approved and published, newest first
    pub async fn list_public_articles(&self) -> Result<Vec<Article>> {
        ArticleEntity::find()
            .filter(ArticleColumn::IsApproved.eq(true))
            .filter(ArticleColumn::IsPublished.eq(true))
            .order_by_desc(ArticleColumn::CreatedAt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Public listing restricted to one category
    pub async fn list_public_by_category(&self, category_id: Uuid) -> Result<Vec<Article>> {
        ArticleEntity::find()
            .filter(ArticleColumn::CategoryId.eq(category_id))
            .filter(ArticleColumn::IsApproved.eq(true))
            .filter(ArticleColumn::IsPublished.eq(true))
            .order_by_desc(ArticleColumn::CreatedAt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Public listing restricted to one author
    pub async fn list_public_by_author(&self, author_id: Uuid) -> Result<Vec<Article>> {
        ArticleEntity::find()
            .filter(ArticleColumn::AuthorId.eq(author_id))
            .filter(ArticleColumn::IsApproved.eq(true))
            .filter(ArticleColumn::IsPublished.eq(true))
            .order_by_desc(ArticleColumn::CreatedAt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Everything an author wrote, any state (own-profile listing)
    pub async fn list_articles_by_author(&self, author_id: Uuid) -> Result<Vec<Article>> {
        ArticleEntity::find()
            .filter(ArticleColumn::AuthorId.eq(author_id))
            .order_by_desc(ArticleColumn::CreatedAt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Public articles whose mean rating reaches the popularity threshold,
    /// best-rated first
    pub async fn list_popular_articles(&self) -> Result<Vec<Article>> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            SELECT a.*
            FROM articles a
            JOIN article_ratings r ON r.article_id = a.id
            WHERE a.is_approved AND a.is_published
            GROUP BY a.id
            HAVING AVG(r.score) >= $1
            ORDER BY AVG(r.score) DESC, a.created_at DESC
            "#,
            vec![POPULAR_THRESHOLD.into()],
        );

        ArticleEntity::find()
            .from_raw_sql(stmt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Users with at least one public article, most prolific first
    pub async fn list_authors(&self) -> Result<Vec<AuthorListing>> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            SELECT u.id, u.username, COUNT(a.id) AS article_count
            FROM users u
            JOIN articles a
              ON a.author_id = u.id AND a.is_approved AND a.is_published
            GROUP BY u.id, u.username
            ORDER BY article_count DESC, u.username ASC
            "#,
            vec![],
        );

        let rows = self.read_conn().query_all(stmt).await?;
        let mut authors = Vec::with_capacity(rows.len());
        for row in rows {
            authors.push(AuthorListing {
                user_id: row.try_get::<Uuid>("", "id")?,
                username: row.try_get::<String>("", "username")?,
                article_count: row.try_get::<i64>("", "article_count")?,
            });
        }
        Ok(authors)
    }

    /// Public articles the user liked or bookmarked, newest first
    pub async fn list_favorite_articles(&self, user_id: Uuid) -> Result<Vec<Article>> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            SELECT DISTINCT a.*
            FROM articles a
            LEFT JOIN reactions re
              ON re.article_id = a.id AND re.user_id = $1 AND re.kind = 'like'
            LEFT JOIN bookmarks b
              ON b.article_id = a.id AND b.user_id = $1
            WHERE a.is_approved AND a.is_published
              AND (re.id IS NOT NULL OR b.id IS NOT NULL)
            ORDER BY a.created_at DESC
            "#,
            vec![user_id.into()],
        );

        ArticleEntity::find()
            .from_raw_sql(stmt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// The user's most recently liked articles (profile page strip)
    pub async fn list_recently_liked(&self, user_id: Uuid, limit: u64) -> Result<Vec<Article>> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            SELECT a.*
            FROM articles a
            JOIN reactions re
              ON re.article_id = a.id AND re.user_id = $1 AND re.kind = 'like'
            ORDER BY re.created_at DESC
            LIMIT $2
            "#,
            vec![user_id.into(), (limit as i64).into()],
        );

        ArticleEntity::find()
            .from_raw_sql(stmt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Reaction Operations (like/dislike)
    // ========================================================================

    /// Toggle a like or dislike. Toggling the present kind removes it;
    /// toggling the opposite kind replaces it (removal before add), so a
    /// user is never in both sets. Returns whether the reaction is active
    /// after the toggle.
    pub async fn toggle_reaction(
        &self,
        article_id: Uuid,
        user_id: Uuid,
        kind: ReactionKind,
    ) -> Result<bool> {
        let existing = ReactionEntity::find()
            .filter(ReactionColumn::ArticleId.eq(article_id))
            .filter(ReactionColumn::UserId.eq(user_id))
            .one(self.write_conn())
            .await?;

        match existing {
            Some(reaction) if reaction.kind() == kind.opposite() => {
                // Opposite membership: remove first, then add
                let txn = self.write_conn().begin().await?;
                ReactionEntity::delete_by_id(reaction.id).exec(&txn).await?;
                ReactionActiveModel {
                    id: Set(Uuid::new_v4()),
                    article_id: Set(article_id),
                    user_id: Set(user_id),
                    kind: Set(String::from(kind)),
                    created_at: Set(chrono::Utc::now().into()),
                }
                .insert(&txn)
                .await?;
                txn.commit().await?;
                Ok(true)
            }
            Some(reaction) => {
                // Pure toggle off
                ReactionEntity::delete_by_id(reaction.id)
                    .exec(self.write_conn())
                    .await?;
                Ok(false)
            }
            None => {
                ReactionActiveModel {
                    id: Set(Uuid::new_v4()),
                    article_id: Set(article_id),
                    user_id: Set(user_id),
                    kind: Set(String::from(kind)),
                    created_at: Set(chrono::Utc::now().into()),
                }
                .insert(self.write_conn())
                .await?;
                Ok(true)
            }
        }
    }

    /// Like and dislike counts for an article
    pub async fn reaction_counts(&self, article_id: Uuid) -> Result<(u64, u64)> {
        let likes = ReactionEntity::find()
            .filter(ReactionColumn::ArticleId.eq(article_id))
            .filter(ReactionColumn::Kind.eq(String::from(ReactionKind::Like)))
            .count(self.read_conn())
            .await?;

        let dislikes = ReactionEntity::find()
            .filter(ReactionColumn::ArticleId.eq(article_id))
            .filter(ReactionColumn::Kind.eq(String::from(ReactionKind::Dislike)))
            .count(self.read_conn())
            .await?;

        Ok((likes, dislikes))
    }

    // ========================================================================
    // Rating Operations
    // ========================================================================

    /// Upsert a rating: one row per (article, user), latest score wins
    pub async fn upsert_rating(&self, article_id: Uuid, user_id: Uuid, score: i16) -> Result<()> {
        let now = chrono::Utc::now();
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            INSERT INTO article_ratings (id, article_id, user_id, score, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            ON CONFLICT (article_id, user_id) DO UPDATE SET
                score = EXCLUDED.score,
                updated_at = EXCLUDED.updated_at
            "#,
            vec![
                Uuid::new_v4().into(),
                article_id.into(),
                user_id.into(),
                score.into(),
                now.into(),
            ],
        );

        self.write_conn().execute(stmt).await?;
        Ok(())
    }

    /// The viewer's own rating of an article, if any
    pub async fn find_rating(&self, article_id: Uuid, user_id: Uuid) -> Result<Option<ArticleRating>> {
        ArticleRatingEntity::find()
            .filter(ArticleRatingColumn::ArticleId.eq(article_id))
            .filter(ArticleRatingColumn::UserId.eq(user_id))
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Mean rating of an article (2 decimals, 0.0 when unrated)
    pub async fn article_rating(&self, article_id: Uuid) -> Result<f64> {
        let scores: Vec<i16> = ArticleRatingEntity::find()
            .filter(ArticleRatingColumn::ArticleId.eq(article_id))
            .all(self.read_conn())
            .await?
            .into_iter()
            .map(|r| r.score)
            .collect();

        Ok(average_score(&scores))
    }

    // ========================================================================
    // Bookmark Operations
    // ========================================================================

    /// Toggle a bookmark; returns whether it exists after the toggle
    pub async fn toggle_bookmark(&self, article_id: Uuid, user_id: Uuid) -> Result<bool> {
        let existing = BookmarkEntity::find()
            .filter(BookmarkColumn::ArticleId.eq(article_id))
            .filter(BookmarkColumn::UserId.eq(user_id))
            .one(self.write_conn())
            .await?;

        match existing {
            Some(bookmark) => {
                BookmarkEntity::delete_by_id(bookmark.id)
                    .exec(self.write_conn())
                    .await?;
                Ok(false)
            }
            None => {
                BookmarkActiveModel {
                    id: Set(Uuid::new_v4()),
                    user_id: Set(user_id),
                    article_id: Set(article_id),
                    created_at: Set(chrono::Utc::now().into()),
                }
                .insert(self.write_conn())
                .await?;
                Ok(true)
            }
        }
    }

    /// Whether the viewer bookmarked an article
    pub async fn is_bookmarked(&self, article_id: Uuid, user_id: Uuid) -> Result<bool> {
        let count = BookmarkEntity::find()
            .filter(BookmarkColumn::ArticleId.eq(article_id))
            .filter(BookmarkColumn::UserId.eq(user_id))
            .count(self.read_conn())
            .await?;
        Ok(count > 0)
    }

    /// The user's bookmarks with their articles, newest first
    pub async fn list_bookmarks_with_articles(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<(Bookmark, Option<Article>)>> {
        BookmarkEntity::find()
            .filter(BookmarkColumn::UserId.eq(user_id))
            .find_also_related(ArticleEntity)
            .order_by_desc(BookmarkColumn::CreatedAt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Comment Operations
    // ========================================================================

    /// Append a comment
    pub async fn add_comment(
        &self,
        article_id: Uuid,
        user_id: Uuid,
        content: String,
    ) -> Result<Comment> {
        let comment = CommentActiveModel {
            id: Set(Uuid::new_v4()),
            article_id: Set(article_id),
            user_id: Set(user_id),
            content: Set(content),
            created_at: Set(chrono::Utc::now().into()),
        };

        comment.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// All comments on an article with their authors, oldest first
    pub async fn list_comments(&self, article_id: Uuid) -> Result<Vec<(Comment, Option<User>)>> {
        CommentEntity::find()
            .filter(CommentColumn::ArticleId.eq(article_id))
            .find_also_related(UserEntity)
            .order_by_asc(CommentColumn::CreatedAt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Moderation: Edit Requests
    // ========================================================================

    /// Submit an edit request: snapshot the proposed fields, leave the
    /// live article untouched
    pub async fn create_edit_request(
        &self,
        article_id: Uuid,
        user_id: Uuid,
        snapshot: EditSnapshot,
    ) -> Result<ArticleEditRequest> {
        let request = ArticleEditRequestActiveModel {
            id: Set(Uuid::new_v4()),
            article_id: Set(article_id),
            user_id: Set(user_id),
            title: Set(snapshot.title),
            category_id: Set(snapshot.category_id),
            image_url: Set(snapshot.image_url),
            summary: Set(snapshot.summary),
            content: Set(snapshot.content),
            status: Set(String::from(ReviewStatus::Pending)),
            reviewed_by: Set(None),
            reviewed_at: Set(None),
            rejection_reason: Set(None),
            created_at: Set(chrono::Utc::now().into()),
        };

        request.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// Find edit request by ID
    pub async fn find_edit_request(&self, id: Uuid) -> Result<Option<ArticleEditRequest>> {
        ArticleEditRequestEntity::find_by_id(id)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// All pending edit requests, newest first (admin panel)
    pub async fn list_pending_edit_requests(&self) -> Result<Vec<ArticleEditRequest>> {
        ArticleEditRequestEntity::find()
            .filter(ArticleEditRequestColumn::Status.eq(String::from(ReviewStatus::Pending)))
            .order_by_desc(ArticleEditRequestColumn::CreatedAt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Whether the user has an outstanding edit request for the article
    pub async fn has_pending_edit_request(&self, article_id: Uuid, user_id: Uuid) -> Result<bool> {
        let count = ArticleEditRequestEntity::find()
            .filter(ArticleEditRequestColumn::ArticleId.eq(article_id))
            .filter(ArticleEditRequestColumn::UserId.eq(user_id))
            .filter(ArticleEditRequestColumn::Status.eq(String::from(ReviewStatus::Pending)))
            .count(self.read_conn())
            .await?;
        Ok(count > 0)
    }

    /// The user's most recently rejected edit request for the article
    pub async fn latest_rejected_edit_request(
        &self,
        article_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ArticleEditRequest>> {
        ArticleEditRequestEntity::find()
            .filter(ArticleEditRequestColumn::ArticleId.eq(article_id))
            .filter(ArticleEditRequestColumn::UserId.eq(user_id))
            .filter(ArticleEditRequestColumn::Status.eq(String::from(ReviewStatus::Rejected)))
            .order_by_desc(ArticleEditRequestColumn::CreatedAt)
            .limit(1)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Approve an edit request: copy the snapshot onto the live article,
    /// force re-review, and mark the request approved, atomically
    pub async fn approve_edit_request(
        &self,
        request_id: Uuid,
        reviewer_id: Uuid,
    ) -> Result<ArticleEditRequest> {
        let request = self
            .find_edit_request(request_id)
            .await?
            .ok_or_else(|| AppError::RequestNotFound {
                id: request_id.to_string(),
            })?;
        moderation::ensure_pending(request.review_status())?;

        let article = self
            .find_article_by_id(request.article_id)
            .await?
            .ok_or_else(|| AppError::ArticleNotFound {
                id: request.article_id.to_string(),
            })?;

        let applied = moderation::apply_edit(request.snapshot());
        let decision = ReviewDecision::approve(reviewer_id);

        let txn = self.write_conn().begin().await?;

        let mut article_active: ArticleActiveModel = article.into();
        article_active.title = Set(applied.title);
        article_active.category_id = Set(applied.category_id);
        article_active.image_url = Set(applied.image_url);
        article_active.summary = Set(applied.summary);
        article_active.content = Set(applied.content);
        article_active.is_approved = Set(applied.is_approved);
        article_active.is_published = Set(applied.is_published);
        article_active.updated_at = Set(chrono::Utc::now().into());
        article_active.update(&txn).await?;

        let mut request_active: ArticleEditRequestActiveModel = request.into();
        request_active.status = Set(String::from(decision.status));
        request_active.reviewed_by = Set(Some(decision.reviewed_by));
        request_active.reviewed_at = Set(Some(decision.reviewed_at.into()));
        let updated = request_active.update(&txn).await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Reject an edit request, storing the reason verbatim
    pub async fn reject_edit_request(
        &self,
        request_id: Uuid,
        reviewer_id: Uuid,
        reason: String,
    ) -> Result<ArticleEditRequest> {
        let request = self
            .find_edit_request(request_id)
            .await?
            .ok_or_else(|| AppError::RequestNotFound {
                id: request_id.to_string(),
            })?;
        moderation::ensure_pending(request.review_status())?;

        let decision = ReviewDecision::reject(reviewer_id, reason);

        let mut active: ArticleEditRequestActiveModel = request.into();
        active.status = Set(String::from(decision.status));
        active.reviewed_by = Set(Some(decision.reviewed_by));
        active.reviewed_at = Set(Some(decision.reviewed_at.into()));
        active.rejection_reason = Set(decision.rejection_reason);

        active.update(self.write_conn()).await.map_err(Into::into)
    }

    // ========================================================================
    // Moderation: Delete Requests
    // ========================================================================

    /// Submit a delete request; the article stays until an admin approves
    pub async fn create_delete_request(
        &self,
        article_id: Uuid,
        user_id: Uuid,
    ) -> Result<ArticleDeleteRequest> {
        let request = ArticleDeleteRequestActiveModel {
            id: Set(Uuid::new_v4()),
            article_id: Set(Some(article_id)),
            user_id: Set(user_id),
            status: Set(String::from(ReviewStatus::Pending)),
            reviewed_by: Set(None),
            reviewed_at: Set(None),
            rejection_reason: Set(None),
            created_at: Set(chrono::Utc::now().into()),
        };

        request.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// Find delete request by ID
    pub async fn find_delete_request(&self, id: Uuid) -> Result<Option<ArticleDeleteRequest>> {
        ArticleDeleteRequestEntity::find_by_id(id)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// All pending delete requests, newest first (admin panel)
    pub async fn list_pending_delete_requests(&self) -> Result<Vec<ArticleDeleteRequest>> {
        ArticleDeleteRequestEntity::find()
            .filter(ArticleDeleteRequestColumn::Status.eq(String::from(ReviewStatus::Pending)))
            .order_by_desc(ArticleDeleteRequestColumn::CreatedAt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Whether the user has an outstanding delete request for the article
    pub async fn has_pending_delete_request(
        &self,
        article_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool> {
        let count = ArticleDeleteRequestEntity::find()
            .filter(ArticleDeleteRequestColumn::ArticleId.eq(article_id))
            .filter(ArticleDeleteRequestColumn::UserId.eq(user_id))
            .filter(ArticleDeleteRequestColumn::Status.eq(String::from(ReviewStatus::Pending)))
            .count(self.read_conn())
            .await?;
        Ok(count > 0)
    }

    /// The user's most recently rejected delete request for the article
    pub async fn latest_rejected_delete_request(
        &self,
        article_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ArticleDeleteRequest>> {
        ArticleDeleteRequestEntity::find()
            .filter(ArticleDeleteRequestColumn::ArticleId.eq(article_id))
            .filter(ArticleDeleteRequestColumn::UserId.eq(user_id))
            .filter(ArticleDeleteRequestColumn::Status.eq(String::from(ReviewStatus::Rejected)))
            .order_by_desc(ArticleDeleteRequestColumn::CreatedAt)
            .limit(1)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Approve a delete request: mark it resolved first, then delete the
    /// article. The request FK detaches on delete (SET NULL) so the
    /// resolved row survives the cascade that removes the article's
    /// ratings, bookmarks, comments, reactions, and pending edit requests.
    pub async fn approve_delete_request(
        &self,
        request_id: Uuid,
        reviewer_id: Uuid,
    ) -> Result<ArticleDeleteRequest> {
        let request = self
            .find_delete_request(request_id)
            .await?
            .ok_or_else(|| AppError::RequestNotFound {
                id: request_id.to_string(),
            })?;
        moderation::ensure_pending(request.review_status())?;

        let article_id = request.article_id.ok_or_else(|| AppError::ArticleNotFound {
            id: "detached".to_string(),
        })?;

        let decision = ReviewDecision::approve(reviewer_id);

        let txn = self.write_conn().begin().await?;

        let mut request_active: ArticleDeleteRequestActiveModel = request.into();
        request_active.status = Set(String::from(decision.status));
        request_active.reviewed_by = Set(Some(decision.reviewed_by));
        request_active.reviewed_at = Set(Some(decision.reviewed_at.into()));
        let updated = request_active.update(&txn).await?;

        ArticleEntity::delete_by_id(article_id).exec(&txn).await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Reject a delete request, storing the reason verbatim
    pub async fn reject_delete_request(
        &self,
        request_id: Uuid,
        reviewer_id: Uuid,
        reason: String,
    ) -> Result<ArticleDeleteRequest> {
        let request = self
            .find_delete_request(request_id)
            .await?
            .ok_or_else(|| AppError::RequestNotFound {
                id: request_id.to_string(),
            })?;
        moderation::ensure_pending(request.review_status())?;

        let decision = ReviewDecision::reject(reviewer_id, reason);

        let mut active: ArticleDeleteRequestActiveModel = request.into();
        active.status = Set(String::from(decision.status));
        active.reviewed_by = Set(Some(decision.reviewed_by));
        active.reviewed_at = Set(Some(decision.reviewed_at.into()));
        active.rejection_reason = Set(decision.rejection_reason);

        active.update(self.write_conn()).await.map_err(Into::into)
    }
}
