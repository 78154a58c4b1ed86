//! Media entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "media")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// MIME type; serialized to clients as `type`.
    #[sea_orm(column_name = "type")]
    pub media_type: String,
    #[sea_orm(column_type = "Text")]
    pub url: String,
    pub filename: String,
    pub original_name: String,
    pub post_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Post,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for atrium_core::domain::Media {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            media_type: model.media_type,
            url: model.url,
            filename: model.filename,
            original_name: model.original_name,
            post_id: model.post_id,
            created_at: model.created_at.into(),
        }
    }
}

impl From<atrium_core::domain::Media> for ActiveModel {
    fn from(media: atrium_core::domain::Media) -> Self {
        Self {
            id: Set(media.id),
            media_type: Set(media.media_type),
            url: Set(media.url),
            filename: Set(media.filename),
            original_name: Set(media.original_name),
            post_id: Set(media.post_id),
            created_at: Set(media.created_at.into()),
        }
    }
}
