use sea_orm_migration::prelude::*;

const POSITIONS: [(&str, &str); 4] = [
    ("Goalkeeper", "GK"),
    ("Defender", "DEF"),
    ("Midfielder", "MID"),
    ("Forward", "FWD"),
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = Query::insert();
        insert
            .into_table(Positions::Table)
            .columns([Positions::Name, Positions::Abbreviation]);
        for (name, abbreviation) in POSITIONS {
            insert
                .values([name.into(), abbreviation.into()])
                .map_err(|err| DbErr::Migration(err.to_string()))?;
        }

        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let delete = Query::delete()
            .from_table(Positions::Table)
            .and_where(Expr::col(Positions::Abbreviation).is_in(POSITIONS.map(|(_, abbreviation)| abbreviation)))
            .to_owned();

        manager.exec_stmt(delete).await
    }
}

#[derive(DeriveIden)]
enum Positions {
    Table,
    Name,
    Abbreviation,
}
