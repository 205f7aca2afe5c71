//! # blog-service
//!
//! Application layer containing business logic, services, and DTOs.

pub mod dto;
pub mod services;

pub use services::{
    AuthService, CategoryService, CommentService, DashboardService, FollowService, PostService,
    ProfileService, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
    ViewService,
};
