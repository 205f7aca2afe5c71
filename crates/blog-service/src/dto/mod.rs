//! Data transfer objects
//!
//! This module provides:
//! - Request DTOs with validation for form and JSON inputs
//! - Response DTOs serialized to JSON or handed to templates
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    AddCommentRequest, ImageChange, ListPostsQuery, LoginRequest, PostFormRequest,
    PostViewRequest, RefreshTokenRequest, SignupRequest, ToggleFollowRequest,
    UpdateProfileRequest,
};

pub use responses::{
    AddCommentResponse, AuthResponse, AuthorPageResponse, CategoryResponse, CommentResponse,
    CurrentUserResponse, DashboardResponse, DashboardTotals, HealthChecks, HealthResponse,
    HomeResponse, PaginatedResponse, PaginationMeta, PostDetailResponse, PostResponse,
    PostViewResponse, ProfileResponse, PublicUserResponse, ReadinessResponse, SessionUser,
    ToggleFollowResponse,
};

pub use mappers::{CommentWithAuthor, PostWithDetails, UserProfile, EXCERPT_CHARS};
