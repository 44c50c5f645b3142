use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_items_table::Migration),
            Box::new(m20240101_000002_create_movimentos_table::Migration),
        ]
    }
}

mod m20240101_000001_create_items_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Items::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Items::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Items::Setor).string().not_null())
                        .col(ColumnDef::new(Items::CodigoGce).string().not_null())
                        .col(ColumnDef::new(Items::ItemNome).string().not_null())
                        .col(
                            ColumnDef::new(Items::EstoqueMinimo)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Items::EstoqueAtual)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Items::PatrimonioAtual)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Items::StatusEstoque).string().not_null())
                        .col(ColumnDef::new(Items::ValorReferencia).double().null())
                        .col(ColumnDef::new(Items::Ata).string().null())
                        .col(ColumnDef::new(Items::NumeroPedido).string().null())
                        .col(
                            ColumnDef::new(Items::ValidadeValorReferencia)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(Items::ValidadeAta).timestamp_with_time_zone().null())
                        .col(ColumnDef::new(Items::Observacoes).string().null())
                        .col(
                            ColumnDef::new(Items::Ativo)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Items::Version)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .col(
                            ColumnDef::new(Items::DataAtualizacao)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Items::CreatedAt).timestamp_with_time_zone().not_null())
                        .to_owned(),
                )
                .await?;

            // Display names are globally unique; codigo_gce is not (the
            // advance sentinel code may be shared), so it only gets a
            // lookup index.
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_items_item_nome")
                        .table(Items::Table)
                        .col(Items::ItemNome)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_items_codigo_gce")
                        .table(Items::Table)
                        .col(Items::CodigoGce)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_items_setor")
                        .table(Items::Table)
                        .col(Items::Setor)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Items::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum Items {
        Table,
        Id,
        Setor,
        CodigoGce,
        ItemNome,
        EstoqueMinimo,
        EstoqueAtual,
        PatrimonioAtual,
        StatusEstoque,
        ValorReferencia,
        Ata,
        NumeroPedido,
        ValidadeValorReferencia,
        ValidadeAta,
        Observacoes,
        Ativo,
        Version,
        DataAtualizacao,
        CreatedAt,
    }
}

mod m20240101_000002_create_movimentos_table {

    use sea_orm_migration::prelude::*;

    use super::m20240101_000001_create_items_table::Items;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_movimentos_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Movimentos::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Movimentos::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Movimentos::ItemId).uuid().not_null())
                        .col(ColumnDef::new(Movimentos::Tipo).string().not_null())
                        .col(ColumnDef::new(Movimentos::Quantidade).integer().not_null())
                        .col(ColumnDef::new(Movimentos::NumeroChamado).string().null())
                        .col(ColumnDef::new(Movimentos::Setor).string().null())
                        .col(ColumnDef::new(Movimentos::Responsavel).string().null())
                        .col(ColumnDef::new(Movimentos::Ata).string().null())
                        .col(ColumnDef::new(Movimentos::ValidadeAta).timestamp_with_time_zone().null())
                        .col(
                            ColumnDef::new(Movimentos::ValidadeValorReferencia)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(Movimentos::UsuarioAd).string().null())
                        .col(ColumnDef::new(Movimentos::Observacoes).string().null())
                        .col(
                            ColumnDef::new(Movimentos::DataMovimento)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Movimentos::CreatedAt).timestamp_with_time_zone().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_movimentos_item_id")
                                .from(Movimentos::Table, Movimentos::ItemId)
                                .to(Items::Table, Items::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_movimentos_item_id")
                        .table(Movimentos::Table)
                        .col(Movimentos::ItemId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_movimentos_data_movimento")
                        .table(Movimentos::Table)
                        .col(Movimentos::DataMovimento)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_movimentos_tipo")
                        .table(Movimentos::Table)
                        .col(Movimentos::Tipo)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Movimentos::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Movimentos {
        Table,
        Id,
        ItemId,
        Tipo,
        Quantidade,
        NumeroChamado,
        Setor,
        Responsavel,
        Ata,
        ValidadeAta,
        ValidadeValorReferencia,
        UsuarioAd,
        Observacoes,
        DataMovimento,
        CreatedAt,
    }
}
