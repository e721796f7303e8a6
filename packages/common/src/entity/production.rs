use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "production")]
pub struct Model {
    /// Short lowercase GUID, also the object store prefix.
    #[sea_orm(primary_key, auto_increment = false)]
    pub guid: String,

    /// Unique slug. The unique index is the authority for name conflicts.
    #[sea_orm(unique)]
    pub name: String,

    pub title: String,
    pub summary: String,

    /// Client ID of the owner.
    #[sea_orm(indexed)]
    pub owner: String,

    pub feed: String,
    pub new_feed: String,

    /// Unix timestamps (seconds).
    pub pub_date: i64,
    pub build_date: i64,
    pub created: i64,
    pub updated: i64,
}

impl ActiveModelBehavior for ActiveModel {}
