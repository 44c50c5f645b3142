mod common;

use almoxarifado_api::domain::movement;
use almoxarifado_api::errors::ServiceError;
use almoxarifado_api::services::movements::NewMovement;
use assert_matches::assert_matches;
use chrono::{TimeZone, Utc};
use uuid::Uuid;

fn withdrawal(item_id: Uuid, qty: i32) -> NewMovement {
    NewMovement {
        item_id,
        tipo: "RETIRADA_MANUTENCAO".into(),
        quantidade: qty,
        numero_chamado: Some("123456".into()),
        setor: Some("ELETRICA".into()),
        responsavel: Some("Silva".into()),
        ..Default::default()
    }
}

#[tokio::test]
async fn maintenance_withdrawal_decrements_stock() {
    let app = common::spawn_app().await;
    let item = app
        .items
        .create(common::item_fixture("GCE-1", "Disjuntor 20A", 10, 0))
        .await
        .unwrap();

    let movement = app.movements.submit(withdrawal(item.id, 3)).await.unwrap();

    assert_eq!(movement.quantidade, 3);
    assert_eq!(movement.tipo, "RETIRADA_MANUTENCAO");

    let reloaded = app.items.get(item.id).await.unwrap();
    assert_eq!(reloaded.estoque_atual, 7);
    assert_eq!(reloaded.patrimonio_atual, 0);
}

#[tokio::test]
async fn quantity_is_stored_as_magnitude_even_when_negative() {
    let app = common::spawn_app().await;
    let item = app
        .items
        .create(common::item_fixture("GCE-2", "Tomada 2P+T", 10, 0))
        .await
        .unwrap();

    // A caller sending a signed quantity still gets the direction from
    // the movement type, never from the sign.
    let movement = app.movements.submit(withdrawal(item.id, -4)).await.unwrap();

    assert_eq!(movement.quantidade, 4);
    let reloaded = app.items.get(item.id).await.unwrap();
    assert_eq!(reloaded.estoque_atual, 6);
}

#[tokio::test]
async fn withdrawal_beyond_stock_is_rejected_without_side_effects() {
    let app = common::spawn_app().await;
    let item = app
        .items
        .create(common::item_fixture("GCE-3", "Cabo 2.5mm", 5, 0))
        .await
        .unwrap();

    let err = app.movements.submit(withdrawal(item.id, 6)).await.unwrap_err();
    assert_matches!(
        err,
        ServiceError::InsufficientStock {
            available: 5,
            requested: 6
        }
    );

    let reloaded = app.items.get(item.id).await.unwrap();
    assert_eq!(reloaded.estoque_atual, 5);
    assert!(app.movements.list_for_item(item.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn maintenance_return_requires_ticket_and_increments() {
    let app = common::spawn_app().await;
    let item = app
        .items
        .create(common::item_fixture("GCE-4", "Lampada LED", 2, 0))
        .await
        .unwrap();

    let err = app
        .movements
        .submit(NewMovement {
            item_id: item.id,
            tipo: "RETORNO_MANUTENCAO".into(),
            quantidade: 1,
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::MissingField("numero_chamado"));

    app.movements
        .submit(NewMovement {
            item_id: item.id,
            tipo: "RETORNO_MANUTENCAO".into(),
            quantidade: 1,
            numero_chamado: Some("654321".into()),
            ..Default::default()
        })
        .await
        .unwrap();

    let reloaded = app.items.get(item.id).await.unwrap();
    assert_eq!(reloaded.estoque_atual, 3);
}

#[tokio::test]
async fn asset_intake_merges_procurement_metadata_in_same_commit() {
    let app = common::spawn_app().await;
    let item = app
        .items
        .create(common::item_fixture("GCE-5", "Bancada", 0, 2))
        .await
        .unwrap();
    assert_eq!(item.ata, None);

    let validade = Utc.with_ymd_and_hms(2027, 6, 30, 0, 0, 0).unwrap();
    app.movements
        .submit(NewMovement {
            item_id: item.id,
            tipo: "ENTRADA_PATRIMONIO".into(),
            quantidade: 5,
            ata: Some("A123".into()),
            validade_ata: Some(validade),
            ..Default::default()
        })
        .await
        .unwrap();

    let reloaded = app.items.get(item.id).await.unwrap();
    assert_eq!(reloaded.patrimonio_atual, 7);
    assert_eq!(reloaded.estoque_atual, 0);
    assert_eq!(reloaded.ata.as_deref(), Some("A123"));
    assert_eq!(reloaded.validade_ata, Some(validade));
}

#[tokio::test]
async fn asset_intake_without_metadata_leaves_item_fields_alone() {
    let app = common::spawn_app().await;
    let mut fixture = common::item_fixture("GCE-6", "Estante", 0, 0);
    fixture.ata = Some("A-OLD".into());
    let item = app.items.create(fixture).await.unwrap();

    app.movements
        .submit(NewMovement {
            item_id: item.id,
            tipo: "ENTRADA_PATRIMONIO".into(),
            quantidade: 1,
            ..Default::default()
        })
        .await
        .unwrap();

    let reloaded = app.items.get(item.id).await.unwrap();
    assert_eq!(reloaded.ata.as_deref(), Some("A-OLD"));
}

#[tokio::test]
async fn asset_transfer_moves_reserve_into_stock() {
    let app = common::spawn_app().await;
    let item = app
        .items
        .create(common::item_fixture("GCE-7", "Furadeira", 1, 4))
        .await
        .unwrap();

    app.movements
        .submit(NewMovement {
            item_id: item.id,
            tipo: "PEDIDO_PATRIMONIO".into(),
            quantidade: 3,
            ..Default::default()
        })
        .await
        .unwrap();

    let reloaded = app.items.get(item.id).await.unwrap();
    assert_eq!(reloaded.estoque_atual, 4);
    assert_eq!(reloaded.patrimonio_atual, 1);
}

#[tokio::test]
async fn asset_transfer_beyond_reserve_is_rejected_without_side_effects() {
    let app = common::spawn_app().await;
    let item = app
        .items
        .create(common::item_fixture("GCE-8", "Serra", 0, 2))
        .await
        .unwrap();

    let err = app
        .movements
        .submit(NewMovement {
            item_id: item.id,
            tipo: "PEDIDO_PATRIMONIO".into(),
            quantidade: 3,
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_matches!(
        err,
        ServiceError::InsufficientAssetStock {
            available: 2,
            requested: 3
        }
    );

    let reloaded = app.items.get(item.id).await.unwrap();
    assert_eq!(reloaded.estoque_atual, 0);
    assert_eq!(reloaded.patrimonio_atual, 2);
}

#[tokio::test]
async fn advance_adds_directly_to_stock() {
    let app = common::spawn_app().await;
    let item = app
        .items
        .create(common::item_fixture("ADIANTAMENTO", "Material avulso", 0, 0))
        .await
        .unwrap();

    app.movements
        .submit(NewMovement {
            item_id: item.id,
            tipo: "ADIANTAMENTO_MANUTENCAO".into(),
            quantidade: 8,
            ..Default::default()
        })
        .await
        .unwrap();

    let reloaded = app.items.get(item.id).await.unwrap();
    assert_eq!(reloaded.estoque_atual, 8);
    assert_eq!(reloaded.patrimonio_atual, 0);
}

#[tokio::test]
async fn conservation_withdrawal_needs_only_responsavel() {
    let app = common::spawn_app().await;
    let item = app
        .items
        .create(common::item_fixture("GCE-9", "Vassoura", 6, 0))
        .await
        .unwrap();

    let err = app
        .movements
        .submit(NewMovement {
            item_id: item.id,
            tipo: "RETIRADA_CONSERVACAO".into(),
            quantidade: 2,
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::MissingField("responsavel"));

    app.movements
        .submit(NewMovement {
            item_id: item.id,
            tipo: "RETIRADA_CONSERVACAO".into(),
            quantidade: 2,
            responsavel: Some("Souza".into()),
            ..Default::default()
        })
        .await
        .unwrap();

    let reloaded = app.items.get(item.id).await.unwrap();
    assert_eq!(reloaded.estoque_atual, 4);
}

#[tokio::test]
async fn zero_quantity_and_unknown_type_are_rejected() {
    let app = common::spawn_app().await;
    let item = app
        .items
        .create(common::item_fixture("GCE-10", "Parafuso", 1, 0))
        .await
        .unwrap();

    let err = app
        .movements
        .submit(NewMovement {
            item_id: item.id,
            tipo: "RETORNO_MANUTENCAO".into(),
            quantidade: 0,
            numero_chamado: Some("1".into()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ZeroQuantity);

    let err = app
        .movements
        .submit(NewMovement {
            item_id: item.id,
            tipo: "AJUSTE".into(),
            quantidade: 1,
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::UnknownMovementType(ref t) if t == "AJUSTE");
}

#[tokio::test]
async fn unknown_item_is_rejected() {
    let app = common::spawn_app().await;
    let ghost = Uuid::new_v4();

    let err = app.movements.submit(withdrawal(ghost, 1)).await.unwrap_err();
    assert_matches!(err, ServiceError::ItemNotFound(id) if id == ghost);
}

#[tokio::test]
async fn status_is_recomputed_on_every_commit() {
    let app = common::spawn_app().await;
    let mut fixture = common::item_fixture("GCE-11", "Fita isolante", 5, 0);
    fixture.estoque_minimo = 2;
    let item = app.items.create(fixture).await.unwrap();
    assert_eq!(item.status_estoque, "Estoque OK");

    app.movements.submit(withdrawal(item.id, 3)).await.unwrap();

    let reloaded = app.items.get(item.id).await.unwrap();
    assert_eq!(reloaded.estoque_atual, 2);
    assert_eq!(reloaded.status_estoque, "Baixo Estoque");
}

#[tokio::test]
async fn movement_timestamp_can_be_backdated() {
    let app = common::spawn_app().await;
    let item = app
        .items
        .create(common::item_fixture("GCE-12", "Tinta", 0, 0))
        .await
        .unwrap();

    let past = Utc.with_ymd_and_hms(2023, 5, 10, 12, 0, 0).unwrap();
    let movement = app
        .movements
        .submit(NewMovement {
            item_id: item.id,
            tipo: "ADIANTAMENTO_MANUTENCAO".into(),
            quantidade: 1,
            data_movimento: Some(past),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(movement.data_movimento, past);
}

#[tokio::test]
async fn ledger_replays_to_current_balances() {
    let app = common::spawn_app().await;
    let item = app
        .items
        .create(common::item_fixture("GCE-13", "Abraçadeira", 10, 5))
        .await
        .unwrap();

    app.movements
        .submit(NewMovement {
            item_id: item.id,
            tipo: "ENTRADA_PATRIMONIO".into(),
            quantidade: 4,
            ..Default::default()
        })
        .await
        .unwrap();
    app.movements
        .submit(NewMovement {
            item_id: item.id,
            tipo: "PEDIDO_PATRIMONIO".into(),
            quantidade: 6,
            ..Default::default()
        })
        .await
        .unwrap();
    app.movements.submit(withdrawal(item.id, 9)).await.unwrap();
    app.movements
        .submit(NewMovement {
            item_id: item.id,
            tipo: "RETORNO_MANUTENCAO".into(),
            quantidade: 2,
            numero_chamado: Some("777".into()),
            ..Default::default()
        })
        .await
        .unwrap();

    let (mut estoque, mut patrimonio) = (item.estoque_atual, item.patrimonio_atual);
    for m in app.movements.list_for_item(item.id).await.unwrap() {
        let tipo = m.movement_type().expect("persisted rows carry known types");
        let delta = movement::balance_delta(tipo, m.quantidade);
        estoque += delta.estoque;
        patrimonio += delta.patrimonio;
    }

    let reloaded = app.items.get(item.id).await.unwrap();
    assert_eq!(estoque, reloaded.estoque_atual);
    assert_eq!(patrimonio, reloaded.patrimonio_atual);
    assert!(reloaded.estoque_atual >= 0);
    assert!(reloaded.patrimonio_atual >= 0);
}

#[tokio::test]
async fn ledger_lists_newest_first_and_search_filters_apply() {
    let app = common::spawn_app().await;
    let item = app
        .items
        .create(common::item_fixture("GCE-14", "Mangueira", 10, 0))
        .await
        .unwrap();

    app.movements.submit(withdrawal(item.id, 1)).await.unwrap();
    app.movements
        .submit(NewMovement {
            item_id: item.id,
            tipo: "RETORNO_MANUTENCAO".into(),
            quantidade: 1,
            numero_chamado: Some("42".into()),
            ..Default::default()
        })
        .await
        .unwrap();

    let all = app.movements.list_for_item(item.id).await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all[0].data_movimento >= all[1].data_movimento);

    let withdrawals = app
        .movements
        .search(almoxarifado_api::services::movements::MovementFilters {
            item_id: Some(item.id),
            tipo: Some("RETIRADA_MANUTENCAO".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(withdrawals.len(), 1);
    assert_eq!(withdrawals[0].tipo, "RETIRADA_MANUTENCAO");

    let err = app
        .movements
        .search(almoxarifado_api::services::movements::MovementFilters {
            tipo: Some("INVALIDO".into()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::UnknownMovementType(_));
}
