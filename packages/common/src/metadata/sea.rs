use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};

use super::{MetadataError, MetadataStore};
use crate::entity::{asset, production};
use crate::production::{AssetRecord, Production};

/// Metadata store backed by a relational database through sea-orm.
#[derive(Clone)]
pub struct SeaOrmMetadataStore {
    db: DatabaseConnection,
}

impl SeaOrmMetadataStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn backend(err: DbErr) -> MetadataError {
    MetadataError::Backend(err.to_string())
}

impl From<production::Model> for Production {
    fn from(model: production::Model) -> Self {
        Self {
            guid: model.guid,
            name: model.name,
            title: model.title,
            summary: model.summary,
            owner: model.owner,
            feed: model.feed,
            new_feed: model.new_feed,
            pub_date: model.pub_date,
            build_date: model.build_date,
            created: model.created,
            updated: model.updated,
        }
    }
}

impl From<asset::Model> for AssetRecord {
    fn from(model: asset::Model) -> Self {
        Self {
            name: model.name,
            parent: model.parent,
            checksum: model.checksum,
            kind: model.kind,
            source: model.source,
            location: model.location,
            content_type: model.content_type,
            size: model.size,
            duration: model.duration,
            updated: model.updated,
        }
    }
}

fn asset_id(parent: &str, name: &str) -> String {
    format!("{parent}/{name}")
}

#[async_trait]
impl MetadataStore for SeaOrmMetadataStore {
    async fn create_production(&self, p: &Production) -> Result<(), MetadataError> {
        let model = production::ActiveModel {
            guid: Set(p.guid.clone()),
            name: Set(p.name.clone()),
            title: Set(p.title.clone()),
            summary: Set(p.summary.clone()),
            owner: Set(p.owner.clone()),
            feed: Set(p.feed.clone()),
            new_feed: Set(p.new_feed.clone()),
            pub_date: Set(p.pub_date),
            build_date: Set(p.build_date),
            created: Set(p.created),
            updated: Set(p.updated),
        };

        match production::Entity::insert(model)
            .exec_without_returning(&self.db)
            .await
        {
            Ok(_) => Ok(()),
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Err(MetadataError::Conflict(
                    format!("production '{}' already exists", p.name),
                )),
                _ => Err(backend(e)),
            },
        }
    }

    async fn get_production(&self, guid: &str) -> Result<Option<Production>, MetadataError> {
        let model = production::Entity::find_by_id(guid.to_string())
            .one(&self.db)
            .await
            .map_err(backend)?;
        Ok(model.map(Production::from))
    }

    async fn find_production_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Production>, MetadataError> {
        let model = production::Entity::find()
            .filter(production::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(backend)?;
        Ok(model.map(Production::from))
    }

    async fn list_productions(&self, owner: &str) -> Result<Vec<Production>, MetadataError> {
        let models = production::Entity::find()
            .filter(production::Column::Owner.eq(owner))
            .order_by_asc(production::Column::Name)
            .all(&self.db)
            .await
            .map_err(backend)?;
        Ok(models.into_iter().map(Production::from).collect())
    }

    async fn delete_production(&self, guid: &str) -> Result<bool, MetadataError> {
        let result = production::Entity::delete_by_id(guid.to_string())
            .exec(&self.db)
            .await
            .map_err(backend)?;
        Ok(result.rows_affected > 0)
    }

    async fn record_build(
        &self,
        guid: &str,
        feed: &str,
        build_date: i64,
    ) -> Result<(), MetadataError> {
        let update = production::ActiveModel {
            guid: Set(guid.to_string()),
            feed: Set(feed.to_string()),
            build_date: Set(build_date),
            updated: Set(build_date),
            ..Default::default()
        };
        match update.update(&self.db).await {
            Ok(_) => Ok(()),
            Err(DbErr::RecordNotUpdated) => {
                Err(MetadataError::NotFound(format!("production '{guid}'")))
            }
            Err(e) => Err(backend(e)),
        }
    }

    async fn upsert_asset(&self, a: &AssetRecord) -> Result<(), MetadataError> {
        let model = asset::ActiveModel {
            id: Set(asset_id(&a.parent, &a.name)),
            parent: Set(a.parent.clone()),
            name: Set(a.name.clone()),
            checksum: Set(a.checksum.clone()),
            kind: Set(a.kind.clone()),
            source: Set(a.source.clone()),
            location: Set(a.location.clone()),
            content_type: Set(a.content_type.clone()),
            size: Set(a.size),
            duration: Set(a.duration),
            updated: Set(a.updated),
        };

        asset::Entity::insert(model)
            .on_conflict(
                OnConflict::column(asset::Column::Id)
                    .update_columns([
                        asset::Column::Checksum,
                        asset::Column::Kind,
                        asset::Column::Source,
                        asset::Column::Location,
                        asset::Column::ContentType,
                        asset::Column::Size,
                        asset::Column::Duration,
                        asset::Column::Updated,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(backend)?;
        Ok(())
    }

    async fn get_asset(
        &self,
        parent: &str,
        name: &str,
    ) -> Result<Option<AssetRecord>, MetadataError> {
        let model = asset::Entity::find_by_id(asset_id(parent, name))
            .one(&self.db)
            .await
            .map_err(backend)?;
        Ok(model.map(AssetRecord::from))
    }

    async fn list_assets(&self, parent: &str) -> Result<Vec<AssetRecord>, MetadataError> {
        let models = asset::Entity::find()
            .filter(asset::Column::Parent.eq(parent))
            .order_by_asc(asset::Column::Name)
            .all(&self.db)
            .await
            .map_err(backend)?;
        Ok(models.into_iter().map(AssetRecord::from).collect())
    }
}
