use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Recorded result of a matchup, NULL until one is posted.
        // SQLite accepts one column per ALTER TABLE.
        manager
            .alter_table(
                Table::alter()
                    .table(Matchups::Table)
                    .add_column(ColumnDef::new(Matchups::HomePoints).integer().null())
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Matchups::Table)
                    .add_column(ColumnDef::new(Matchups::AwayPoints).integer().null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Matchups::Table)
                    .drop_column(Matchups::AwayPoints)
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Matchups::Table)
                    .drop_column(Matchups::HomePoints)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Matchups {
    Table,
    HomePoints,
    AwayPoints,
}
