use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DbConn, EntityName, EntityTrait, PrimaryKeyTrait, Schema};

use blog_core::error::RepoError;
use blog_core::ports::BaseRepository;

use super::error::map_db_err;

/// Ties a SeaORM entity to the domain type its rows convert into.
pub trait DomainMapped: EntityTrait {
    type Domain: From<Self::Model> + Send + Sync + 'static;
}

/// Generic SeaORM repository; one instance per entity over a shared pool.
pub struct PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub(crate) db: Arc<DbConn>,
    _entity: PhantomData<E>,
}

impl<E> PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    /// Accepts an owned connection or a pool already shared with other repositories.
    pub fn new(db: impl Into<Arc<DbConn>>) -> Self {
        Self {
            db: db.into(),
            _entity: PhantomData,
        }
    }
}

#[async_trait]
impl<E> BaseRepository<E::Domain, i64> for PostgresBaseRepository<E>
where
    E: DomainMapped,
    E::Model: Sync + Send,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = i64>,
{
    async fn init_schema(&self) -> Result<(), RepoError> {
        let backend = self.db.get_database_backend();
        let mut stmt = Schema::new(backend).create_table_from_entity(E::default());
        stmt.if_not_exists();

        self.db
            .execute(backend.build(&stmt))
            .await
            .map_err(map_db_err)?;

        tracing::debug!(table = %E::default().table_name(), "Schema ready");
        Ok(())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<E::Domain>, RepoError> {
        let result = E::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}
