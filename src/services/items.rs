use crate::{
    db::DbPool,
    domain::{
        alerts::{self, Alert},
        status,
    },
    entities::{
        item::{self, Entity as Item},
        movimento::{self, Entity as Movimento},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionError,
    TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Catalog code reserved for advance/unlinked items. Uniqueness of
/// `codigo_gce` is relaxed for exactly this value: any number of distinct
/// items may share it.
pub const CODIGO_ADIANTAMENTO: &str = "ADIANTAMENTO";

#[derive(Debug, Clone)]
pub struct NewItem {
    pub setor: String,
    pub codigo_gce: String,
    pub item_nome: String,
    pub estoque_minimo: i32,
    pub estoque_atual: i32,
    pub patrimonio_atual: i32,
    pub valor_referencia: Option<f64>,
    pub ata: Option<String>,
    pub numero_pedido: Option<String>,
    pub validade_valor_referencia: Option<DateTime<Utc>>,
    pub validade_ata: Option<DateTime<Utc>>,
    pub observacoes: Option<String>,
    pub ativo: bool,
}

/// Partial edit of an item's administrative fields. Balances are absent on
/// purpose: they move only through the movement processor.
#[derive(Debug, Clone, Default)]
pub struct ItemUpdate {
    pub setor: Option<String>,
    pub codigo_gce: Option<String>,
    pub item_nome: Option<String>,
    pub estoque_minimo: Option<i32>,
    pub valor_referencia: Option<f64>,
    pub ata: Option<String>,
    pub numero_pedido: Option<String>,
    pub validade_valor_referencia: Option<DateTime<Utc>>,
    pub validade_ata: Option<DateTime<Utc>>,
    pub observacoes: Option<String>,
    pub ativo: Option<bool>,
}

/// Administrative item operations: creation, field edits, lookups and the
/// alert listing. Everything that touches a balance lives in
/// `MovementService` instead.
#[derive(Clone)]
pub struct ItemService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl ItemService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self, new_item), fields(codigo_gce = %new_item.codigo_gce))]
    pub async fn create(&self, new_item: NewItem) -> Result<item::Model, ServiceError> {
        if new_item.setor.trim().is_empty() {
            return Err(ServiceError::ValidationError("setor cannot be empty".into()));
        }
        if new_item.codigo_gce.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "codigo_gce cannot be empty".into(),
            ));
        }
        if new_item.item_nome.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "item_nome cannot be empty".into(),
            ));
        }
        if new_item.estoque_minimo < 0
            || new_item.estoque_atual < 0
            || new_item.patrimonio_atual < 0
        {
            return Err(ServiceError::ValidationError(
                "stock fields cannot be negative".into(),
            ));
        }

        let now = Utc::now();
        let initial_status = status::derive_status(
            new_item.estoque_atual,
            new_item.estoque_minimo,
            new_item.ativo,
        );

        let created = self
            .db
            .transaction::<_, item::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    if new_item.codigo_gce != CODIGO_ADIANTAMENTO {
                        let existing = Item::find()
                            .filter(item::Column::CodigoGce.eq(new_item.codigo_gce.clone()))
                            .one(txn)
                            .await
                            .map_err(ServiceError::storage)?;
                        if existing.is_some() {
                            return Err(ServiceError::Conflict(format!(
                                "codigo_gce '{}' already in use",
                                new_item.codigo_gce
                            )));
                        }
                    }

                    let existing = Item::find()
                        .filter(item::Column::ItemNome.eq(new_item.item_nome.clone()))
                        .one(txn)
                        .await
                        .map_err(ServiceError::storage)?;
                    if existing.is_some() {
                        return Err(ServiceError::Conflict(format!(
                            "item_nome '{}' already in use",
                            new_item.item_nome
                        )));
                    }

                    let row = item::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        setor: Set(new_item.setor),
                        codigo_gce: Set(new_item.codigo_gce),
                        item_nome: Set(new_item.item_nome),
                        estoque_minimo: Set(new_item.estoque_minimo),
                        estoque_atual: Set(new_item.estoque_atual),
                        patrimonio_atual: Set(new_item.patrimonio_atual),
                        status_estoque: Set(initial_status.as_str().to_string()),
                        valor_referencia: Set(new_item.valor_referencia),
                        ata: Set(new_item.ata),
                        numero_pedido: Set(new_item.numero_pedido),
                        validade_valor_referencia: Set(new_item.validade_valor_referencia),
                        validade_ata: Set(new_item.validade_ata),
                        observacoes: Set(new_item.observacoes),
                        ativo: Set(new_item.ativo),
                        version: Set(1),
                        data_atualizacao: Set(now),
                        created_at: Set(now),
                    };

                    row.insert(txn).await.map_err(ServiceError::storage)
                })
            })
            .await
            .map_err(unwrap_txn_err)?;

        info!(item_id = %created.id, "Item created");
        self.event_sender.send(Event::ItemCreated(created.id)).await;

        Ok(created)
    }

    #[instrument(skip(self, changes))]
    pub async fn update(&self, id: Uuid, changes: ItemUpdate) -> Result<item::Model, ServiceError> {
        let now = Utc::now();

        let updated = self
            .db
            .transaction::<_, item::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let current = Item::find_by_id(id)
                        .one(txn)
                        .await
                        .map_err(ServiceError::storage)?
                        .ok_or(ServiceError::ItemNotFound(id))?;

                    if let Some(codigo) = &changes.codigo_gce {
                        if codigo != &current.codigo_gce && codigo.as_str() != CODIGO_ADIANTAMENTO {
                            let taken = Item::find()
                                .filter(item::Column::CodigoGce.eq(codigo.clone()))
                                .filter(item::Column::Id.ne(id))
                                .one(txn)
                                .await
                                .map_err(ServiceError::storage)?;
                            if taken.is_some() {
                                return Err(ServiceError::Conflict(format!(
                                    "codigo_gce '{}' already in use",
                                    codigo
                                )));
                            }
                        }
                    }

                    if let Some(nome) = &changes.item_nome {
                        if nome != &current.item_nome {
                            let taken = Item::find()
                                .filter(item::Column::ItemNome.eq(nome.clone()))
                                .filter(item::Column::Id.ne(id))
                                .one(txn)
                                .await
                                .map_err(ServiceError::storage)?;
                            if taken.is_some() {
                                return Err(ServiceError::Conflict(format!(
                                    "item_nome '{}' already in use",
                                    nome
                                )));
                            }
                        }
                    }

                    if let Some(minimo) = changes.estoque_minimo {
                        if minimo < 0 {
                            return Err(ServiceError::ValidationError(
                                "estoque_minimo cannot be negative".into(),
                            ));
                        }
                    }

                    let estoque_minimo =
                        changes.estoque_minimo.unwrap_or(current.estoque_minimo);
                    let ativo = changes.ativo.unwrap_or(current.ativo);
                    let new_status =
                        status::derive_status(current.estoque_atual, estoque_minimo, ativo);

                    let mut update = item::ActiveModel {
                        estoque_minimo: Set(estoque_minimo),
                        ativo: Set(ativo),
                        status_estoque: Set(new_status.as_str().to_string()),
                        data_atualizacao: Set(now),
                        version: Set(current.version + 1),
                        ..Default::default()
                    };
                    if let Some(setor) = changes.setor {
                        update.setor = Set(setor);
                    }
                    if let Some(codigo) = changes.codigo_gce {
                        update.codigo_gce = Set(codigo);
                    }
                    if let Some(nome) = changes.item_nome {
                        update.item_nome = Set(nome);
                    }
                    if let Some(valor) = changes.valor_referencia {
                        update.valor_referencia = Set(Some(valor));
                    }
                    if let Some(ata) = changes.ata {
                        update.ata = Set(Some(ata));
                    }
                    if let Some(pedido) = changes.numero_pedido {
                        update.numero_pedido = Set(Some(pedido));
                    }
                    if let Some(validade) = changes.validade_valor_referencia {
                        update.validade_valor_referencia = Set(Some(validade));
                    }
                    if let Some(validade) = changes.validade_ata {
                        update.validade_ata = Set(Some(validade));
                    }
                    if let Some(obs) = changes.observacoes {
                        update.observacoes = Set(Some(obs));
                    }

                    let result = Item::update_many()
                        .set(update)
                        .filter(item::Column::Id.eq(id))
                        .filter(item::Column::Version.eq(current.version))
                        .exec(txn)
                        .await
                        .map_err(ServiceError::storage)?;

                    if result.rows_affected != 1 {
                        return Err(ServiceError::ConcurrentModification(id));
                    }

                    Item::find_by_id(id)
                        .one(txn)
                        .await
                        .map_err(ServiceError::storage)?
                        .ok_or(ServiceError::ItemNotFound(id))
                })
            })
            .await
            .map_err(unwrap_txn_err)?;

        self.event_sender.send(Event::ItemUpdated(updated.id)).await;

        Ok(updated)
    }

    /// Removes an item together with its movement history.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        self.db
            .transaction::<_, (), ServiceError>(move |txn| {
                Box::pin(async move {
                    Movimento::delete_many()
                        .filter(movimento::Column::ItemId.eq(id))
                        .exec(txn)
                        .await
                        .map_err(ServiceError::storage)?;

                    let result = Item::delete_by_id(id)
                        .exec(txn)
                        .await
                        .map_err(ServiceError::storage)?;

                    if result.rows_affected == 0 {
                        return Err(ServiceError::ItemNotFound(id));
                    }

                    Ok(())
                })
            })
            .await
            .map_err(unwrap_txn_err)?;

        self.event_sender.send(Event::ItemDeleted(id)).await;

        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> Result<item::Model, ServiceError> {
        Item::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(ServiceError::storage)?
            .ok_or(ServiceError::ItemNotFound(id))
    }

    pub async fn get_by_codigo(&self, codigo: &str) -> Result<Option<item::Model>, ServiceError> {
        Item::find()
            .filter(item::Column::CodigoGce.eq(codigo))
            .one(self.db.as_ref())
            .await
            .map_err(ServiceError::storage)
    }

    /// All items, ordered the way the stock listing presents them.
    pub async fn list(&self) -> Result<Vec<item::Model>, ServiceError> {
        Item::find()
            .order_by_asc(item::Column::Setor)
            .order_by_asc(item::Column::CodigoGce)
            .all(self.db.as_ref())
            .await
            .map_err(ServiceError::storage)
    }

    /// Items carrying at least one active alert, with their computed alert
    /// lists. The alert engine itself is pure; this is the only place the
    /// service layer pairs it with storage.
    pub async fn list_alerting(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<(item::Model, Vec<Alert>)>, ServiceError> {
        let items = self.list().await?;

        Ok(items
            .into_iter()
            .filter_map(|item| {
                let item_alerts = alerts::compute_alerts(&item, now);
                if item_alerts.is_empty() {
                    None
                } else {
                    Some((item, item_alerts))
                }
            })
            .collect())
    }
}

fn unwrap_txn_err(e: TransactionError<ServiceError>) -> ServiceError {
    match e {
        TransactionError::Connection(db_err) => ServiceError::storage(db_err),
        TransactionError::Transaction(service_err) => service_err,
    }
}
