use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Place: lookups by owner back `GET /api/places/user/:uid`
        manager
            .create_index(
                Index::create()
                    .name("idx_place_creator")
                    .table(Place::Table)
                    .col(Place::CreatorId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_place_creator").table(Place::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Place { Table, CreatorId }
