//! In-memory fakes of every port, for service tests
//!
//! Uniqueness and cascade rules mirror the database constraints so services
//! see the same errors they would against PostgreSQL.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use blog_common::auth::{JwtService, PasswordService};
use blog_core::traits::{
    AssetStore, CategoryRepository, CommentRepository, FollowRepository, Page, PageRequest,
    PostFilter, PostRepository, ProfileRepository, RepoResult, SessionStore, UserRepository,
    ViewRepository,
};
use blog_core::{
    AssetKind, AssetRef, AuthorTotals, Category, Comment, DomainError, FollowState, NewAsset, Post,
    PostView, Profile, Session, User,
};
use uuid::Uuid;

use super::context::ServiceContext;
use crate::dto::SignupRequest;

pub(crate) fn signup_request(username: &str) -> SignupRequest {
    SignupRequest {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password: "Secret123".to_string(),
        password_confirm: "Secret123".to_string(),
    }
}

#[derive(Default)]
pub(crate) struct Memory {
    users: Mutex<Vec<(User, String)>>,
    profiles: Mutex<HashMap<Uuid, Profile>>,
    follows: Mutex<HashSet<(Uuid, Uuid)>>,
    categories: Mutex<Vec<Category>>,
    posts: Mutex<Vec<Post>>,
    comments: Mutex<Vec<Comment>>,
    views: Mutex<Vec<PostView>>,
    sessions: Mutex<HashMap<Uuid, Session>>,
    stored_assets: Mutex<Vec<AssetRef>>,
    deleted_assets: Mutex<Vec<AssetRef>>,
    fail_post_writes: AtomicBool,
    fail_asset_deletes: AtomicBool,
}

pub(crate) struct TestBackend {
    pub memory: Arc<Memory>,
}

impl TestBackend {
    pub fn new() -> Self {
        Self {
            memory: Arc::new(Memory::default()),
        }
    }

    pub fn context(&self) -> ServiceContext {
        let m = &self.memory;
        ServiceContext::builder()
            .user_repo(m.clone())
            .profile_repo(m.clone())
            .follow_repo(m.clone())
            .category_repo(m.clone())
            .post_repo(m.clone())
            .comment_repo(m.clone())
            .view_repo(m.clone())
            .session_store(m.clone())
            .asset_store(m.clone())
            .jwt_service(Arc::new(JwtService::new("test-secret", 900, 3600)))
            .password_service(PasswordService::new())
            .build()
            .unwrap()
    }

    /// Insert a user and its default profile without going through signup
    pub fn add_user(&self, username: &str) -> User {
        let user = User::new(username.to_string(), format!("{username}@example.com"));
        self.memory
            .users
            .lock()
            .unwrap()
            .push((user.clone(), "unused".to_string()));
        self.memory
            .profiles
            .lock()
            .unwrap()
            .insert(user.id, Profile::for_new_user(user.id));
        user
    }

    pub fn set_author(&self, user_id: Uuid, is_author: bool) {
        if let Some(profile) = self.memory.profiles.lock().unwrap().get_mut(&user_id) {
            profile.is_author = is_author;
        }
    }

    pub fn posts(&self) -> Vec<Post> {
        self.memory.posts.lock().unwrap().clone()
    }

    pub fn comment_count(&self) -> usize {
        self.memory.comments.lock().unwrap().len()
    }

    pub fn view_events(&self) -> usize {
        self.memory.views.lock().unwrap().len()
    }

    pub fn stored_assets(&self) -> Vec<AssetRef> {
        self.memory.stored_assets.lock().unwrap().clone()
    }

    pub fn deleted_assets(&self) -> Vec<AssetRef> {
        self.memory.deleted_assets.lock().unwrap().clone()
    }

    pub fn fail_post_writes(&self) {
        self.memory.fail_post_writes.store(true, Ordering::SeqCst);
    }

    pub fn fail_asset_deletes(&self) {
        self.memory.fail_asset_deletes.store(true, Ordering::SeqCst);
    }
}

fn find_user(users: &[(User, String)], id: Uuid) -> Option<User> {
    users.iter().find(|(u, _)| u.id == id).map(|(u, _)| u.clone())
}

// ============================================================================
// Repositories
// ============================================================================

#[async_trait]
impl UserRepository for Memory {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>> {
        Ok(find_user(&self.users.lock().unwrap(), id))
    }

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|(u, _)| u.username == username)
            .map(|(u, _)| u.clone()))
    }

    async fn find_by_login(&self, login: &str) -> RepoResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|(u, _)| u.matches_login(login))
            .map(|(u, _)| u.clone()))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> RepoResult<Vec<User>> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .filter(|(u, _)| ids.contains(&u.id))
            .map(|(u, _)| u.clone())
            .collect())
    }

    async fn username_exists(&self, username: &str) -> RepoResult<bool> {
        Ok(self.find_by_username(username).await?.is_some())
    }

    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().any(|(u, _)| u.email.eq_ignore_ascii_case(email)))
    }

    async fn create_with_profile(
        &self,
        user: &User,
        password_hash: &str,
        profile: &Profile,
    ) -> RepoResult<()> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|(u, _)| u.username == user.username) {
            return Err(DomainError::UsernameTaken);
        }
        if users.iter().any(|(u, _)| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(DomainError::EmailTaken);
        }
        users.push((user.clone(), password_hash.to_string()));
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.user_id, profile.clone());
        Ok(())
    }

    async fn get_password_hash(&self, id: Uuid) -> RepoResult<Option<String>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|(u, _)| u.id == id).map(|(_, h)| h.clone()))
    }
}

#[async_trait]
impl ProfileRepository for Memory {
    async fn find_by_user(&self, user_id: Uuid) -> RepoResult<Option<Profile>> {
        Ok(self.profiles.lock().unwrap().get(&user_id).cloned())
    }

    async fn update(&self, profile: &Profile) -> RepoResult<()> {
        let mut profiles = self.profiles.lock().unwrap();
        match profiles.get_mut(&profile.user_id) {
            Some(existing) => {
                *existing = profile.clone();
                Ok(())
            }
            None => Err(DomainError::ProfileNotFound(profile.user_id)),
        }
    }
}

#[async_trait]
impl FollowRepository for Memory {
    async fn toggle(&self, follower_id: Uuid, following_id: Uuid) -> RepoResult<FollowState> {
        if follower_id == following_id {
            return Err(DomainError::SelfFollow);
        }
        let mut follows = self.follows.lock().unwrap();
        if follows.remove(&(follower_id, following_id)) {
            Ok(FollowState::Unfollowed)
        } else {
            follows.insert((follower_id, following_id));
            Ok(FollowState::Followed)
        }
    }

    async fn exists(&self, follower_id: Uuid, following_id: Uuid) -> RepoResult<bool> {
        Ok(self
            .follows
            .lock()
            .unwrap()
            .contains(&(follower_id, following_id)))
    }

    async fn follower_count(&self, user_id: Uuid) -> RepoResult<i64> {
        let follows = self.follows.lock().unwrap();
        Ok(follows.iter().filter(|(_, to)| *to == user_id).count() as i64)
    }

    async fn following_count(&self, user_id: Uuid) -> RepoResult<i64> {
        let follows = self.follows.lock().unwrap();
        Ok(follows.iter().filter(|(from, _)| *from == user_id).count() as i64)
    }
}

#[async_trait]
impl CategoryRepository for Memory {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Category>> {
        let categories = self.categories.lock().unwrap();
        Ok(categories.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Category>> {
        let categories = self.categories.lock().unwrap();
        Ok(categories.iter().find(|c| c.name == name).cloned())
    }

    async fn list_all(&self) -> RepoResult<Vec<Category>> {
        let mut categories = self.categories.lock().unwrap().clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn get_or_create(&self, category: &Category) -> RepoResult<Category> {
        let mut categories = self.categories.lock().unwrap();
        if let Some(existing) = categories.iter().find(|c| c.name == category.name) {
            return Ok(existing.clone());
        }
        if categories.iter().any(|c| c.slug == category.slug) {
            return Err(DomainError::CategorySlugTaken(category.slug.to_string()));
        }
        categories.push(category.clone());
        Ok(category.clone())
    }
}

#[async_trait]
impl PostRepository for Memory {
    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Post>> {
        let posts = self.posts.lock().unwrap();
        Ok(posts.iter().find(|p| p.slug.as_str() == slug).cloned())
    }

    async fn slug_exists(&self, slug: &str) -> RepoResult<bool> {
        Ok(self.find_by_slug(slug).await?.is_some())
    }

    async fn create(&self, post: &Post) -> RepoResult<()> {
        if self.fail_post_writes.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("write failed".to_string()));
        }
        let mut posts = self.posts.lock().unwrap();
        if posts.iter().any(|p| p.slug == post.slug) {
            return Err(DomainError::SlugTaken(post.slug.to_string()));
        }
        posts.push(post.clone());
        Ok(())
    }

    async fn update(&self, post: &Post) -> RepoResult<()> {
        if self.fail_post_writes.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("write failed".to_string()));
        }
        let mut posts = self.posts.lock().unwrap();
        match posts.iter_mut().find(|p| p.id == post.id) {
            Some(existing) => {
                let views = existing.views;
                *existing = post.clone();
                existing.views = views;
                Ok(())
            }
            None => Err(DomainError::PostNotFound(post.slug.to_string())),
        }
    }

    async fn delete(&self, id: Uuid) -> RepoResult<bool> {
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|p| p.id != id);
        let deleted = posts.len() != before;
        if deleted {
            self.comments.lock().unwrap().retain(|c| c.post_id != id);
            self.views.lock().unwrap().retain(|v| v.post_id != id);
        }
        Ok(deleted)
    }

    async fn list_published(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> RepoResult<Page<Post>> {
        let mut matching: Vec<Post> = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.published && filter.matches(&p.title, &p.content))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok(Page::new(items, total, page))
    }

    async fn count_published(&self) -> RepoResult<i64> {
        Ok(self.posts.lock().unwrap().iter().filter(|p| p.published).count() as i64)
    }

    async fn find_by_author(&self, author_id: Uuid, published_only: bool) -> RepoResult<Vec<Post>> {
        let mut posts: Vec<Post> = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.author_id == author_id && (p.published || !published_only))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn author_totals(&self, author_id: Uuid) -> RepoResult<AuthorTotals> {
        let posts = self.posts.lock().unwrap();
        let own: Vec<&Post> = posts.iter().filter(|p| p.author_id == author_id).collect();
        let comments = self.comments.lock().unwrap();
        Ok(AuthorTotals {
            post_count: own.len() as i64,
            total_views: own.iter().map(|p| p.views).sum(),
            total_comments: comments
                .iter()
                .filter(|c| own.iter().any(|p| p.id == c.post_id))
                .count() as i64,
        })
    }
}

#[async_trait]
impl CommentRepository for Memory {
    async fn create(&self, comment: &Comment) -> RepoResult<()> {
        let exists = self.posts.lock().unwrap().iter().any(|p| p.id == comment.post_id);
        if !exists {
            return Err(DomainError::PostNotFound(comment.post_id.to_string()));
        }
        self.comments.lock().unwrap().push(comment.clone());
        Ok(())
    }

    async fn find_by_post(&self, post_id: Uuid) -> RepoResult<Vec<Comment>> {
        let mut comments: Vec<Comment> = self
            .comments
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(comments)
    }

    async fn count_by_post(&self, post_id: Uuid) -> RepoResult<i64> {
        let comments = self.comments.lock().unwrap();
        Ok(comments.iter().filter(|c| c.post_id == post_id).count() as i64)
    }
}

#[async_trait]
impl ViewRepository for Memory {
    async fn record(&self, view: &PostView) -> RepoResult<i64> {
        let mut posts = self.posts.lock().unwrap();
        let post = posts
            .iter_mut()
            .find(|p| p.id == view.post_id)
            .ok_or_else(|| DomainError::PostNotFound(view.post_id.to_string()))?;
        self.views.lock().unwrap().push(view.clone());
        post.views += 1;
        Ok(post.views)
    }
}

// ============================================================================
// Collaborators
// ============================================================================

#[async_trait]
impl SessionStore for Memory {
    async fn create(&self, session: &Session) -> RepoResult<()> {
        self.sessions
            .lock()
            .unwrap()
            .insert(session.id, session.clone());
        Ok(())
    }

    async fn find(&self, session_id: Uuid) -> RepoResult<Option<Session>> {
        Ok(self.sessions.lock().unwrap().get(&session_id).cloned())
    }

    async fn revoke(&self, session_id: Uuid) -> RepoResult<()> {
        self.sessions.lock().unwrap().remove(&session_id);
        Ok(())
    }

    async fn revoke_all_for_user(&self, user_id: Uuid) -> RepoResult<u64> {
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|_, s| s.user_id != user_id);
        Ok((before - sessions.len()) as u64)
    }
}

#[async_trait]
impl AssetStore for Memory {
    async fn store(&self, kind: AssetKind, asset: NewAsset) -> RepoResult<AssetRef> {
        let format = asset.image_format(kind)?;
        let reference = AssetRef::new(format!("{}/{}.{}", kind.prefix(), Uuid::new_v4(), format.extension()));
        self.stored_assets.lock().unwrap().push(reference.clone());
        Ok(reference)
    }

    async fn delete(&self, asset: &AssetRef) -> RepoResult<()> {
        self.deleted_assets.lock().unwrap().push(asset.clone());
        if self.fail_asset_deletes.load(Ordering::SeqCst) {
            return Err(DomainError::StorageError("disk gone".to_string()));
        }
        Ok(())
    }

    fn url_for(&self, asset: &AssetRef) -> String {
        format!("/media/{asset}")
    }
}
