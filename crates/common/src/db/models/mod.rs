//! SeaORM entity models
//!
//! Database entities for the StudyPoint catalog. The `Model` types double
//! as the domain types consumed by the catalog core and the HTTP layer.

mod admin_user;
mod field;
mod resource;
mod subject;

pub use resource::{
    ActiveModel as ResourceActiveModel, Column as ResourceColumn, Entity as ResourceEntity,
    Model as Resource, ResourceKind,
};

pub use field::{
    ActiveModel as FieldActiveModel, Column as FieldColumn, Entity as FieldEntity, Model as Field,
};

pub use subject::{
    ActiveModel as SubjectActiveModel, Column as SubjectColumn, Entity as SubjectEntity,
    Model as Subject,
};

pub use admin_user::{
    ActiveModel as AdminUserActiveModel, Column as AdminUserColumn, Entity as AdminUserEntity,
    Model as AdminUser,
};
