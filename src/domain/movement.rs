use crate::entities::movimento::MovementType;
use crate::errors::ServiceError;

/// Signed effect of a movement on the two balances of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceDelta {
    pub estoque: i32,
    pub patrimonio: i32,
}

/// Maps a movement type and magnitude to its signed balance effect.
/// `qty` must already be a positive magnitude.
pub fn balance_delta(tipo: MovementType, qty: i32) -> BalanceDelta {
    match tipo {
        MovementType::RetiradaManutencao | MovementType::RetiradaConservacao => BalanceDelta {
            estoque: -qty,
            patrimonio: 0,
        },
        MovementType::RetornoManutencao | MovementType::AdiantamentoManutencao => BalanceDelta {
            estoque: qty,
            patrimonio: 0,
        },
        MovementType::EntradaPatrimonio => BalanceDelta {
            estoque: 0,
            patrimonio: qty,
        },
        MovementType::PedidoPatrimonio => BalanceDelta {
            estoque: qty,
            patrimonio: -qty,
        },
    }
}

/// Checks the type-specific balance precondition before a movement may be
/// applied. On violation the movement must be aborted with no side effects.
pub fn check_balances(
    tipo: MovementType,
    qty: i32,
    estoque_atual: i32,
    patrimonio_atual: i32,
) -> Result<(), ServiceError> {
    match tipo {
        MovementType::RetiradaManutencao | MovementType::RetiradaConservacao => {
            if estoque_atual < qty {
                return Err(ServiceError::InsufficientStock {
                    available: estoque_atual,
                    requested: qty,
                });
            }
        }
        MovementType::PedidoPatrimonio => {
            if patrimonio_atual < qty {
                return Err(ServiceError::InsufficientAssetStock {
                    available: patrimonio_atual,
                    requested: qty,
                });
            }
        }
        MovementType::RetornoManutencao
        | MovementType::EntradaPatrimonio
        | MovementType::AdiantamentoManutencao => {}
    }
    Ok(())
}

/// Fields a movement request must carry for a given type, beyond the
/// universal item/quantity pair.
pub fn required_fields(tipo: MovementType) -> &'static [&'static str] {
    match tipo {
        MovementType::RetiradaManutencao => &["numero_chamado", "setor", "responsavel"],
        MovementType::RetornoManutencao => &["numero_chamado"],
        MovementType::RetiradaConservacao => &["responsavel"],
        MovementType::EntradaPatrimonio
        | MovementType::PedidoPatrimonio
        | MovementType::AdiantamentoManutencao => &[],
    }
}
