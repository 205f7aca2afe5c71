//! User / profile entity <-> model mappers

use blog_core::entities::{Profile, User};
use blog_core::value_objects::AssetRef;

use crate::models::{ProfileModel, UserModel};

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: model.id,
            username: model.username,
            email: model.email,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<ProfileModel> for Profile {
    fn from(model: ProfileModel) -> Self {
        Profile {
            user_id: model.user_id,
            bio: model.bio,
            avatar: model.avatar.map(AssetRef::new),
            is_author: model.is_author,
            created_at: model.created_at,
        }
    }
}
