use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "asset")]
pub struct Model {
    /// `{parent}/{fingerprinted name}`, stable for a given (parent, source) pair.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub parent: String,

    /// Fingerprinted object name.
    pub name: String,

    /// Identity checksum of the source URI.
    pub checksum: String,

    pub kind: String,
    pub source: String,
    pub location: String,
    pub content_type: String,
    pub size: i64,
    pub duration: i64,
    pub updated: i64,
}

impl ActiveModelBehavior for ActiveModel {}
