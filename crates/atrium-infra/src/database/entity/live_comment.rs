//! Live-comment entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "live_comments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub text: String,
    pub name: String,
    pub color: String,
    #[sea_orm(column_type = "Double")]
    pub top: f64,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for atrium_core::domain::LiveComment {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            text: model.text,
            name: model.name,
            color: model.color,
            top: model.top,
            created_at: model.created_at.into(),
        }
    }
}

impl From<atrium_core::domain::LiveComment> for ActiveModel {
    fn from(comment: atrium_core::domain::LiveComment) -> Self {
        Self {
            id: Set(comment.id),
            text: Set(comment.text),
            name: Set(comment.name),
            color: Set(comment.color),
            top: Set(comment.top),
            created_at: Set(comment.created_at.into()),
        }
    }
}
