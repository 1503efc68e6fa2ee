//! Resource entity
//!
//! A downloadable academic artifact (notes, past questions, syllabus)
//! tagged with field, subject and semester. The `field` and `subject`
//! columns are denormalized display names; `field_id` is the optional
//! reference into the fields table kept for newer rows.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of study resource
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum ResourceKind {
    #[sea_orm(string_value = "Notes")]
    Notes,
    #[sea_orm(string_value = "Questions")]
    Questions,
    #[sea_orm(string_value = "Syllabus")]
    Syllabus,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "resources")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub kind: ResourceKind,

    #[sea_orm(column_type = "Text")]
    pub subject: String,

    pub semester: i16,

    /// Denormalized field display name (e.g. "BCA")
    #[sea_orm(column_type = "Text")]
    pub field: String,

    #[sea_orm(nullable)]
    pub field_id: Option<Uuid>,

    /// Set at creation, immutable afterwards
    #[serde(rename = "uploadDate")]
    pub upload_date: DateTimeWithTimeZone,

    /// Opaque locator; may be a placeholder, blob reference or remote URL
    #[sea_orm(column_type = "Text")]
    #[serde(rename = "fileUrl")]
    pub file_url: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::field::Entity",
        from = "Column::FieldId",
        to = "super::field::Column::Id"
    )]
    Field,
}

impl Related<super::field::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Field.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
