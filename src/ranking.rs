use bigdecimal::BigDecimal;
use confluence_metrics::AlignmentOutput;
use serde_derive::*;

/// Expected outcome of a trade, simulated before entering it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeSimulation {
    pub expected_profit_usd: BigDecimal,
    pub expected_usdt_time_ratio: BigDecimal,
    pub projected_exit_ts: i64,
}

/// Ranking dossier of one symbol, handed to trade decisioning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolRankingMetrics {
    pub symbol: String,
    pub topsis_score: BigDecimal,
    /// rescaled score shown on the dashboard
    pub display_score: f64,
    pub rank_position: Option<usize>,
    pub alignment: AlignmentOutput,
    pub pre_trade_simulation: TradeSimulation,
}

impl SymbolRankingMetrics {
    pub fn new(symbol: impl Into<String>) -> Self {
        let symbol = symbol.into();
        SymbolRankingMetrics {
            alignment: AlignmentOutput::new(symbol.clone()),
            symbol,
            ..Default::default()
        }
    }
}

/// Order by descending topsis score and assign 1-based rank positions.
///
/// Equal scores keep their input order.
pub fn assign_ranks(dossiers: &mut [SymbolRankingMetrics]) {
    dossiers.sort_by(|a, b| b.topsis_score.cmp(&a.topsis_score));
    for (i, d) in dossiers.iter_mut().enumerate() {
        d.rank_position = Some(i + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dossier(symbol: &str, topsis: &str) -> SymbolRankingMetrics {
        let mut d = SymbolRankingMetrics::new(symbol);
        d.topsis_score = BigDecimal::from_str(topsis).unwrap();
        d
    }

    #[test]
    fn test_assign_ranks() {
        let mut ds = vec![
            dossier("A", "0.31"),
            dossier("B", "0.87"),
            dossier("C", "0.31"),
            dossier("D", "-0.2"),
        ];
        assign_ranks(&mut ds);
        let order: Vec<(&str, Option<usize>)> = ds
            .iter()
            .map(|d| (d.symbol.as_str(), d.rank_position))
            .collect();
        assert_eq!(
            vec![("B", Some(1)), ("A", Some(2)), ("C", Some(3)), ("D", Some(4))],
            order
        );
    }

    #[test]
    fn test_new_dossier_unranked() {
        let d = SymbolRankingMetrics::new("ETH-USDT");
        assert_eq!(None, d.rank_position);
        assert_eq!("ETH-USDT", d.alignment.symbol);
        assert_eq!(TradeSimulation::default(), d.pre_trade_simulation);
    }
}
