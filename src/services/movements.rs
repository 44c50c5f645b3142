use crate::{
    db::DbPool,
    domain::{movement, status},
    entities::{
        item::{self, Entity as Item},
        movimento::{self, Entity as Movimento, MovementType},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, QueryTrait,
    Set, TransactionError, TransactionTrait,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, instrument};
use uuid::Uuid;

/// A requested movement, as translated by the HTTP boundary. `tipo` stays a
/// raw string until the processor parses it, so an unknown type surfaces as
/// a typed rejection instead of a deserialization failure.
#[derive(Debug, Clone, Default)]
pub struct NewMovement {
    pub item_id: Uuid,
    pub tipo: String,
    pub quantidade: i32,
    pub numero_chamado: Option<String>,
    pub setor: Option<String>,
    pub responsavel: Option<String>,
    pub ata: Option<String>,
    pub validade_ata: Option<DateTime<Utc>>,
    pub validade_valor_referencia: Option<DateTime<Utc>>,
    pub usuario_ad: Option<String>,
    pub observacoes: Option<String>,
    pub data_movimento: Option<DateTime<Utc>>,
}

/// Filters for the movement search endpoint.
#[derive(Debug, Clone, Default)]
pub struct MovementFilters {
    pub item_id: Option<Uuid>,
    pub tipo: Option<String>,
    pub setor: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub limit: Option<u64>,
}

/// The movement processor: validates a requested movement against its
/// type-specific preconditions, computes the balance effect, and commits
/// movement + item update as one atomic unit.
///
/// Serialization per item is enforced twice over: a per-item async lock held
/// across read-validate-write, and a version-guarded UPDATE inside the
/// transaction as the backstop. Requests against different items never
/// contend.
#[derive(Clone)]
pub struct MovementService {
    db: Arc<DbPool>,
    event_sender: EventSender,
    item_locks: Arc<DashMap<Uuid, Arc<Mutex<()>>>>,
}

impl MovementService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            db,
            event_sender,
            item_locks: Arc::new(DashMap::new()),
        }
    }

    fn item_lock(&self, item_id: Uuid) -> Arc<Mutex<()>> {
        self.item_locks
            .entry(item_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Submits a movement. On success the returned row is already durable
    /// together with the item's updated balances, status and metadata; on
    /// any failure nothing was written.
    #[instrument(skip(self, request), fields(item_id = %request.item_id, tipo = %request.tipo))]
    pub async fn submit(&self, request: NewMovement) -> Result<movimento::Model, ServiceError> {
        let tipo: MovementType = request
            .tipo
            .parse()
            .map_err(|_| ServiceError::UnknownMovementType(request.tipo.clone()))?;

        if request.quantidade == 0 {
            return Err(ServiceError::ZeroQuantity);
        }
        let qty = request.quantidade.saturating_abs();

        validate_required_fields(tipo, &request)?;

        let lock = self.item_lock(request.item_id);
        let _guard = lock.lock().await;

        let now = Utc::now();
        let item_id = request.item_id;
        let req = request.clone();

        let (committed, new_estoque, estoque_minimo, ativo) = self
            .db
            .transaction::<_, (movimento::Model, i32, i32, bool), ServiceError>(move |txn| {
                Box::pin(async move {
                    let current = Item::find_by_id(item_id)
                        .one(txn)
                        .await
                        .map_err(ServiceError::storage)?
                        .ok_or(ServiceError::ItemNotFound(item_id))?;

                    movement::check_balances(
                        tipo,
                        qty,
                        current.estoque_atual,
                        current.patrimonio_atual,
                    )?;

                    let delta = movement::balance_delta(tipo, qty);
                    let new_estoque = current.estoque_atual + delta.estoque;
                    let new_patrimonio = current.patrimonio_atual + delta.patrimonio;

                    let movement_row = movimento::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        item_id: Set(item_id),
                        tipo: Set(tipo.as_str().to_string()),
                        quantidade: Set(qty),
                        numero_chamado: Set(req.numero_chamado.clone()),
                        setor: Set(req.setor.clone()),
                        responsavel: Set(req.responsavel.clone()),
                        ata: Set(req.ata.clone()),
                        validade_ata: Set(req.validade_ata),
                        validade_valor_referencia: Set(req.validade_valor_referencia),
                        usuario_ad: Set(req.usuario_ad.clone()),
                        observacoes: Set(req.observacoes.clone()),
                        data_movimento: Set(req.data_movimento.unwrap_or(now)),
                        ..Default::default()
                    };
                    let committed = movement_row.insert(txn).await.map_err(ServiceError::storage)?;

                    let new_status = status::derive_status(
                        new_estoque,
                        current.estoque_minimo,
                        current.ativo,
                    );

                    let mut update = item::ActiveModel {
                        estoque_atual: Set(new_estoque),
                        patrimonio_atual: Set(new_patrimonio),
                        status_estoque: Set(new_status.as_str().to_string()),
                        data_atualizacao: Set(now),
                        version: Set(current.version + 1),
                        ..Default::default()
                    };

                    // Asset intake may carry procurement metadata which
                    // overwrites the item's fields in the same commit.
                    if tipo == MovementType::EntradaPatrimonio {
                        if let Some(ata) = req.ata.clone() {
                            update.ata = Set(Some(ata));
                        }
                        if let Some(validade) = req.validade_ata {
                            update.validade_ata = Set(Some(validade));
                        }
                        if let Some(validade) = req.validade_valor_referencia {
                            update.validade_valor_referencia = Set(Some(validade));
                        }
                    }

                    let result = Item::update_many()
                        .set(update)
                        .filter(item::Column::Id.eq(item_id))
                        .filter(item::Column::Version.eq(current.version))
                        .exec(txn)
                        .await
                        .map_err(ServiceError::storage)?;

                    if result.rows_affected != 1 {
                        return Err(ServiceError::ConcurrentModification(item_id));
                    }

                    Ok((committed, new_estoque, current.estoque_minimo, current.ativo))
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(db_err) => ServiceError::storage(db_err),
                TransactionError::Transaction(service_err) => service_err,
            })?;

        info!(
            movement_id = %committed.id,
            item_id = %committed.item_id,
            tipo = %committed.tipo,
            quantidade = committed.quantidade,
            "Movement committed"
        );

        self.event_sender
            .send(Event::MovementCommitted {
                movement_id: committed.id,
                item_id: committed.item_id,
                tipo: committed.tipo.clone(),
                quantidade: committed.quantidade,
            })
            .await;

        if ativo && new_estoque <= estoque_minimo {
            self.event_sender
                .send(Event::LowStockDetected {
                    item_id: committed.item_id,
                    estoque_atual: new_estoque,
                    estoque_minimo,
                })
                .await;
        }

        Ok(committed)
    }

    /// Ledger of a single item, newest first.
    pub async fn list_for_item(&self, item_id: Uuid) -> Result<Vec<movimento::Model>, ServiceError> {
        Movimento::find()
            .filter(movimento::Column::ItemId.eq(item_id))
            .order_by_desc(movimento::Column::DataMovimento)
            .all(self.db.as_ref())
            .await
            .map_err(ServiceError::storage)
    }

    /// Most recent movements across all items.
    pub async fn recent(&self, limit: u64) -> Result<Vec<movimento::Model>, ServiceError> {
        Movimento::find()
            .order_by_desc(movimento::Column::DataMovimento)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(ServiceError::storage)
    }

    /// Filtered movement search for reports.
    pub async fn search(
        &self,
        filters: MovementFilters,
    ) -> Result<Vec<movimento::Model>, ServiceError> {
        let tipo = filters
            .tipo
            .map(|raw| {
                raw.parse::<MovementType>()
                    .map_err(|_| ServiceError::UnknownMovementType(raw))
            })
            .transpose()?;

        Movimento::find()
            .apply_if(filters.item_id, |q, v| {
                q.filter(movimento::Column::ItemId.eq(v))
            })
            .apply_if(tipo, |q, v| q.filter(movimento::Column::Tipo.eq(v.as_str())))
            .apply_if(filters.setor, |q, v| {
                q.filter(movimento::Column::Setor.eq(v))
            })
            .apply_if(filters.start_date, |q, v| {
                q.filter(movimento::Column::DataMovimento.gte(v))
            })
            .apply_if(filters.end_date, |q, v| {
                q.filter(movimento::Column::DataMovimento.lte(v))
            })
            .order_by_desc(movimento::Column::DataMovimento)
            .apply_if(filters.limit, |q, v| q.limit(v))
            .all(self.db.as_ref())
            .await
            .map_err(ServiceError::storage)
    }
}

fn validate_required_fields(tipo: MovementType, req: &NewMovement) -> Result<(), ServiceError> {
    for &name in movement::required_fields(tipo) {
        let value = match name {
            "numero_chamado" => req.numero_chamado.as_deref(),
            "setor" => req.setor.as_deref(),
            "responsavel" => req.responsavel.as_deref(),
            _ => None,
        };
        if value.map(str::trim).filter(|v| !v.is_empty()).is_none() {
            return Err(ServiceError::MissingField(name));
        }
    }
    Ok(())
}
