use almoxarifado_api::{
    db::{self, DbConfig},
    events::{self, EventSender},
    services::{
        items::{ItemService, NewItem},
        movements::MovementService,
    },
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tokio::sync::mpsc;

pub struct TestApp {
    pub db: Arc<DatabaseConnection>,
    pub items: ItemService,
    pub movements: MovementService,
}

/// Boots an isolated in-memory database with migrations applied and the
/// services wired over it. One connection only: every pooled connection to
/// `sqlite::memory:` would otherwise see its own empty database.
pub async fn spawn_app() -> TestApp {
    let db_cfg = DbConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        ..Default::default()
    };
    let pool = db::establish_connection_with_config(&db_cfg)
        .await
        .expect("db connect");
    db::run_migrations(&pool).await.expect("migrations");

    let db = Arc::new(pool);
    let (tx, rx) = mpsc::channel(64);
    let sender = EventSender::new(tx);
    tokio::spawn(events::process_events(rx));

    TestApp {
        items: ItemService::new(db.clone(), sender.clone()),
        movements: MovementService::new(db.clone(), sender),
        db,
    }
}

/// A plain active item with the given balances.
pub fn item_fixture(codigo: &str, nome: &str, estoque: i32, patrimonio: i32) -> NewItem {
    NewItem {
        setor: "ELETRICA".to_string(),
        codigo_gce: codigo.to_string(),
        item_nome: nome.to_string(),
        estoque_minimo: 0,
        estoque_atual: estoque,
        patrimonio_atual: patrimonio,
        valor_referencia: None,
        ata: None,
        numero_pedido: None,
        validade_valor_referencia: None,
        validade_ata: None,
        observacoes: None,
        ativo: true,
    }
}
