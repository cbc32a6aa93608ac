use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::block::PageBlocks;

/// One page-editor document. `page` is the natural key; `blocks` is replaced
/// wholesale on every save.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "page_content")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub page: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub blocks: PageBlocks,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
