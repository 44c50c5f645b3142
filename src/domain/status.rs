use serde::{Deserialize, Serialize};

/// Display status summarizing an item's stock health. Persisted on the item
/// row so listings never recompute it; must be refreshed on every mutation
/// of the stock fields or the active flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockStatus {
    Desativado,
    BaixoEstoque,
    EstoqueOk,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::Desativado => "Desativado",
            StockStatus::BaixoEstoque => "Baixo Estoque",
            StockStatus::EstoqueOk => "Estoque OK",
        }
    }
}

/// Derives the display status. The disabled flag wins over everything;
/// a balance at or below the reorder threshold reads as low stock.
pub fn derive_status(estoque_atual: i32, estoque_minimo: i32, ativo: bool) -> StockStatus {
    if !ativo {
        return StockStatus::Desativado;
    }
    if estoque_atual <= estoque_minimo {
        return StockStatus::BaixoEstoque;
    }
    StockStatus::EstoqueOk
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_threshold_is_low_stock() {
        assert_eq!(derive_status(5, 5, true), StockStatus::BaixoEstoque);
    }

    #[test]
    fn above_threshold_is_ok() {
        assert_eq!(derive_status(5, 4, true), StockStatus::EstoqueOk);
    }

    #[test]
    fn disabled_wins_over_stock_level() {
        assert_eq!(derive_status(5, 4, false), StockStatus::Desativado);
        assert_eq!(derive_status(0, 10, false), StockStatus::Desativado);
    }

    #[test]
    fn zero_on_zero_threshold_is_low() {
        assert_eq!(derive_status(0, 0, true), StockStatus::BaixoEstoque);
    }

    #[test]
    fn labels_match_display_contract() {
        assert_eq!(StockStatus::Desativado.as_str(), "Desativado");
        assert_eq!(StockStatus::BaixoEstoque.as_str(), "Baixo Estoque");
        assert_eq!(StockStatus::EstoqueOk.as_str(), "Estoque OK");
    }
}
