use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// An inventory line: one material tracked across the consumable maintenance
/// balance (`estoque_atual`) and the asset reserve (`patrimonio_atual`).
///
/// The two balance columns are only ever written by the movement processor;
/// `status_estoque` is a cached label recomputed on every mutation and
/// `version` is the optimistic-concurrency token guarding balance updates.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub setor: String,
    pub codigo_gce: String,
    pub item_nome: String,
    pub estoque_minimo: i32,
    pub estoque_atual: i32,
    pub patrimonio_atual: i32,
    pub status_estoque: String,
    pub valor_referencia: Option<f64>,
    pub ata: Option<String>,
    pub numero_pedido: Option<String>,
    pub validade_valor_referencia: Option<DateTimeUtc>,
    pub validade_ata: Option<DateTimeUtc>,
    pub observacoes: Option<String>,
    pub ativo: bool,
    pub version: i32,
    pub data_atualizacao: DateTimeUtc,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::movimento::Entity")]
    Movimento,
}

impl Related<super::movimento::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Movimento.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
