use async_trait::async_trait;
use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};
use strum::{EnumIter as StrumEnumIter, EnumString};

/// The closed set of movement types. Every balance effect in the system is
/// derived from one of these discriminants; a request carrying any other
/// string is rejected before it reaches the ledger.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, StrumEnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementType {
    /// Withdrawal of consumables by a maintenance team against a ticket.
    RetiradaManutencao,
    /// Return of previously withdrawn material to the maintenance balance.
    RetornoManutencao,
    /// Intake of new assets into the reserve, optionally carrying
    /// procurement metadata that overwrites the item's own fields.
    EntradaPatrimonio,
    /// Transfer from the asset reserve into the maintenance balance.
    PedidoPatrimonio,
    /// Direct advance into the maintenance balance, bypassing the reserve.
    AdiantamentoManutencao,
    /// Withdrawal by the conservation team; needs an accountable person
    /// but no ticket or sector.
    RetiradaConservacao,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::RetiradaManutencao => "RETIRADA_MANUTENCAO",
            MovementType::RetornoManutencao => "RETORNO_MANUTENCAO",
            MovementType::EntradaPatrimonio => "ENTRADA_PATRIMONIO",
            MovementType::PedidoPatrimonio => "PEDIDO_PATRIMONIO",
            MovementType::AdiantamentoManutencao => "ADIANTAMENTO_MANUTENCAO",
            MovementType::RetiradaConservacao => "RETIRADA_CONSERVACAO",
        }
    }

    /// Human label, matching what the front-end shows in movement history.
    pub fn label(&self) -> &'static str {
        match self {
            MovementType::RetiradaManutencao => "Retirada (Manutenção)",
            MovementType::RetornoManutencao => "Retorno (Manutenção)",
            MovementType::EntradaPatrimonio => "Entrada (Patrimônio)",
            MovementType::PedidoPatrimonio => "Pedido (Patrimônio -> Manutenção)",
            MovementType::AdiantamentoManutencao => "Adiantamento (Manutenção)",
            MovementType::RetiradaConservacao => "Retirada (Conservação)",
        }
    }
}

/// One immutable ledger entry. `quantidade` is always the stored magnitude;
/// the direction of the balance effect is implied by `tipo`, never by sign.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "movimentos")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub item_id: Uuid,
    pub tipo: String,
    pub quantidade: i32,
    pub numero_chamado: Option<String>,
    pub setor: Option<String>,
    pub responsavel: Option<String>,
    pub ata: Option<String>,
    pub validade_ata: Option<DateTimeUtc>,
    pub validade_valor_referencia: Option<DateTimeUtc>,
    pub usuario_ad: Option<String>,
    pub observacoes: Option<String>,
    pub data_movimento: DateTimeUtc,
    pub created_at: DateTimeUtc,
}

impl Model {
    /// Movement type decoded from the stored discriminant. Rows are only
    /// ever written through the processor, so this cannot fail for
    /// persisted data.
    pub fn movement_type(&self) -> Option<MovementType> {
        self.tipo.parse().ok()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::item::Entity",
        from = "Column::ItemId",
        to = "super::item::Column::Id",
        on_delete = "Cascade"
    )]
    Item,
}

impl Related<super::item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Item.def()
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C: ConnectionTrait>(self, _db: &C, _insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;
        if let ActiveValue::NotSet = active_model.created_at {
            active_model.created_at = Set(Utc::now());
        }
        Ok(active_model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn movement_type_round_trips_through_storage_string() {
        for tipo in MovementType::iter() {
            let parsed: MovementType = tipo.as_str().parse().expect("known discriminant");
            assert_eq!(parsed, tipo);
        }
    }

    #[test]
    fn unknown_discriminant_is_rejected() {
        assert!("AJUSTE_LIVRE".parse::<MovementType>().is_err());
        assert!("retirada_manutencao".parse::<MovementType>().is_err());
    }
}
